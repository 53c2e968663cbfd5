//! TOML-driven country registry.
//!
//! `CountryRegistry` loads a `RegistryConfig` from a TOML string or file,
//! compiles every ID format once, and answers two questions for the intake
//! layer: is this country allowed to sign, and does this ID number have the
//! country's format.

use std::{collections::BTreeMap, path::Path};

use regex::{Regex, RegexBuilder};
use tracing::debug;

use petition_contracts::error::{PetitionError, PetitionResult};

use crate::country::{CountryRule, RegistryConfig};

const EU_REGISTRY: &str = include_str!("../registry/eu.toml");

/// A country rule with its compiled ID pattern.
#[derive(Debug, Clone)]
pub struct Country {
    pub rule: CountryRule,
    pattern: Regex,
}

impl Country {
    /// True when `id_number` has this country's ID format.
    pub fn accepts(&self, id_number: &str) -> bool {
        self.pattern.is_match(id_number)
    }
}

/// The set of countries whose citizens may sign, keyed by country code.
///
/// ```rust,ignore
/// use petition_registry::CountryRegistry;
///
/// let registry = CountryRegistry::eu_default()?;
/// registry.validate_id("PT", "12345678")?;
/// ```
#[derive(Debug, Clone)]
pub struct CountryRegistry {
    countries: BTreeMap<String, Country>,
}

impl CountryRegistry {
    /// The 27 EU member states and their national ID formats.
    pub fn eu_default() -> PetitionResult<Self> {
        Self::from_toml_str(EU_REGISTRY)
    }

    /// Parse `s` as TOML and build a registry.
    ///
    /// Returns `PetitionError::ConfigError` if the TOML is malformed, a
    /// pattern does not compile, or a country code appears twice.
    pub fn from_toml_str(s: &str) -> PetitionResult<Self> {
        let config: RegistryConfig = toml::from_str(s).map_err(|e| PetitionError::ConfigError {
            reason: format!("failed to parse country registry TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a country registry.
    pub fn from_file(path: &Path) -> PetitionResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PetitionError::ConfigError {
            reason: format!("failed to read country registry '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_config(config: RegistryConfig) -> PetitionResult<Self> {
        let mut countries = BTreeMap::new();

        for rule in config.countries {
            // ASCII classes only: `\d` must not accept other scripts' digits.
            let pattern = RegexBuilder::new(&rule.format)
                .unicode(false)
                .build()
                .map_err(|e| PetitionError::ConfigError {
                    reason: format!("invalid ID format for country '{}': {}", rule.code, e),
                })?;

            let code = rule.code.clone();
            if countries.insert(code.clone(), Country { rule, pattern }).is_some() {
                return Err(PetitionError::ConfigError {
                    reason: format!("country '{}' is listed more than once", code),
                });
            }
        }

        debug!(countries = countries.len(), "country registry loaded");
        Ok(Self { countries })
    }

    pub fn get(&self, code: &str) -> Option<&Country> {
        self.countries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.countries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// All countries, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.values()
    }

    /// The country's display name, or the code itself when unknown.
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map_or(code, |c| c.rule.name.as_str())
    }

    /// Check that `code` is registered and `id_number` has its format.
    pub fn validate_id(&self, code: &str, id_number: &str) -> PetitionResult<()> {
        let country = self.get(code).ok_or_else(|| PetitionError::UnknownCountry {
            code: code.to_string(),
        })?;

        if !country.accepts(id_number) {
            return Err(PetitionError::InvalidIdFormat {
                country: code.to_string(),
                label: country.rule.id_label.clone(),
            });
        }
        Ok(())
    }
}
