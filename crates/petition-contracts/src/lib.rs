//! # petition-contracts
//!
//! Shared types and contracts for the citizens' initiative signature ledger.
//!
//! Every crate in the workspace imports from here. No ledger logic lives in
//! this crate, only data definitions, their JSON shape and the error type.

pub mod entry;
pub mod error;
pub mod report;
