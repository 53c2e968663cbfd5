//! Query results produced by the ledger for a rendering layer.
//!
//! `IntegrityReport` is the outcome of chain verification,
//! `VerificationExport` is the privacy-preserving snapshot handed to
//! external verifiers, and `LedgerStats` feeds the progress display.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::AuditLogEntry;

/// The class of problem verification found on an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// The stored `hash` does not match the entry's current fields.
    HashMismatch,
    /// The stored `previousHash` does not match the predecessor's digest.
    ChainBroken,
    /// The stored `sequence` does not match the entry's position.
    SequenceMismatch,
}

impl IssueKind {
    /// The tag this kind is serialized as, e.g. `"HASH_MISMATCH"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::HashMismatch => "HASH_MISMATCH",
            IssueKind::ChainBroken => "CHAIN_BROKEN",
            IssueKind::SequenceMismatch => "SEQUENCE_MISMATCH",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem found by `verify_integrity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub signature_id: String,
    pub sequence: u64,
}

/// Result of verifying every entry in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// True when `issues` is empty.
    pub valid: bool,
    pub issues: Vec<IntegrityIssue>,
    pub total_signatures: u64,
    /// `None` for an empty ledger.
    pub merkle_root: Option<String>,
}

impl IntegrityReport {
    /// Issues of one kind, in ledger order.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &IntegrityIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }
}

/// Per-entry row of a verification export. Identity fields are reduced to
/// `personal_data_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedSignature {
    pub id: String,
    pub country: String,
    pub timestamp: String,
    pub hash: String,
    pub personal_data_hash: String,
}

/// Privacy-preserving snapshot of the ledger for external verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationExport {
    pub export_date: String,
    pub total_signatures: u64,
    pub by_country: BTreeMap<String, u64>,
    pub merkle_root: Option<String>,
    pub integrity_valid: bool,
    pub audit_log: Vec<AuditLogEntry>,
    pub signatures: Vec<ExportedSignature>,
}

/// One row of the per-country breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

/// Progress figures for the initiative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    pub total: u64,
    pub goal: u64,
    /// Percentage of `goal` reached, capped at 100.
    pub percentage: f64,
    /// Countries with the most signatures, highest count first.
    pub top_countries: Vec<CountryCount>,
}
