//! Country rule types and registry configuration schema.
//!
//! A `RegistryConfig` is deserialized from TOML and holds one `CountryRule`
//! per country that may sign. The rule's `format` is the regular expression
//! an ID number must match before a signature is accepted.
//!
//! Example in TOML:
//! ```toml
//! [[countries]]
//! code = "PT"
//! name = "Portugal"
//! id_label = "Cartão Cidadão"
//! format = '^\d{8}$'
//! ```

use serde::{Deserialize, Serialize};

/// A single country entry loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRule {
    /// ISO-3166 alpha-2 code, e.g. `"PT"`.
    pub code: String,

    /// English display name.
    pub name: String,

    /// What the national ID is called, shown next to the ID field and in
    /// validation errors.
    pub id_label: String,

    /// Regular expression for a valid ID number. Matched with
    /// `Regex::is_match`, so patterns should be anchored.
    pub format: String,
}

/// The top-level registry document: a list of `[[countries]]` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub countries: Vec<CountryRule>,
}
