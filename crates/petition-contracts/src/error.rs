//! Error types for the signature ledger and its collaborators.
//!
//! All fallible operations in the workspace return `PetitionResult<T>`.
//! Integrity problems found by verification are not errors: they are
//! reported as data in an `IntegrityReport`.

use thiserror::Error;

/// The unified error type for the signature ledger.
#[derive(Debug, Error)]
pub enum PetitionError {
    /// A signature request is missing a required field or is malformed.
    #[error("invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// The country code is not present in the country registry.
    #[error("unknown country '{code}'")]
    UnknownCountry { code: String },

    /// The ID number does not match the country's ID format.
    #[error("invalid {label} format for country '{country}'")]
    InvalidIdFormat { country: String, label: String },

    /// The signer did not give consent to data processing.
    #[error("consent to data processing is required")]
    ConsentMissing,

    /// The persistence adapter could not load or save ledger state.
    ///
    /// The ledger recovers from this locally: an unreadable store yields an
    /// empty ledger and a failed save is logged.
    #[error("persistence error: {reason}")]
    Persistence { reason: String },

    /// The hash provider cannot produce digests.
    ///
    /// This is fatal: the whole integrity model depends on a working hash.
    #[error("hash provider unavailable: {reason}")]
    HashUnavailable { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A record could not be encoded or decoded as JSON.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// The ledger's internal lock was poisoned by a panicking writer.
    #[error("ledger unavailable: {reason}")]
    LedgerUnavailable { reason: String },
}

impl From<serde_json::Error> for PetitionError {
    fn from(e: serde_json::Error) -> Self {
        PetitionError::Serialization {
            reason: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the petition crates.
pub type PetitionResult<T> = Result<T, PetitionError>;
