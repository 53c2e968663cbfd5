//! Command-line configuration, read from TOML.
//!
//! Every section is optional:
//!
//! ```toml
//! [ledger]
//! path = "data/eci-signatures.json"
//!
//! [registry]
//! path = "registry/eu.toml"   # built-in EU registry when absent
//!
//! [display]
//! goal = 1000000
//! top = 10
//!
//! [logging]
//! filter = "info"             # RUST_LOG takes precedence
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use petition_contracts::error::{PetitionError, PetitionResult};
use petition_ledger::{DEFAULT_GOAL, DEFAULT_STORAGE_KEY};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "petition.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub ledger: LedgerSection,
    pub registry: RegistrySection,
    pub display: DisplaySection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    /// JSON file holding the ledger state.
    pub path: PathBuf,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(format!("{}.json", DEFAULT_STORAGE_KEY)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Country registry TOML; the built-in EU registry when `None`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Signature goal for the progress display.
    pub goal: u64,
    /// How many countries the stats breakdown lists.
    pub top: usize,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            goal: DEFAULT_GOAL,
            top: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl CliConfig {
    pub fn from_toml_str(s: &str) -> PetitionResult<Self> {
        toml::from_str(s).map_err(|e| PetitionError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> PetitionResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PetitionError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `explicit` if given (it must exist), else `petition.toml` in the
    /// working directory if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> PetitionResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
