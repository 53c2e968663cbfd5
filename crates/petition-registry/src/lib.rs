//! # petition-registry
//!
//! Country registry and form intake for the signature ledger.
//!
//! ## Overview
//!
//! [`CountryRegistry`] is loaded from a TOML document listing every country
//! whose citizens may sign, with the regular expression its national ID
//! numbers must match. A built-in registry covers the 27 EU member states.
//!
//! [`FormIntake`] is the caller the ledger expects: it checks consent and
//! the ID format before `SignatureLedger::add_signature` runs.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use petition_registry::{CountryRegistry, FormIntake, SignatureForm};
//!
//! let intake = FormIntake::new(CountryRegistry::eu_default()?);
//! let entry = intake.submit(&ledger, &form)?;
//! ```

pub mod country;
pub mod intake;
pub mod registry;

pub use country::{CountryRule, RegistryConfig};
pub use intake::{FormIntake, SignatureForm};
pub use registry::{Country, CountryRegistry};

// ── Tests ─────────────────────────────────────────────────────────────────────
