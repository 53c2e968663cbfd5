//! Hash-chain primitives: entry hashing and chain integrity verification.
//!
//! Two digests are involved for every entry:
//!
//!   1. the entry hash, `content_hash` over every field except `hash`,
//!      stored in the entry's own `hash` field;
//!   2. the link hash, `record_digest` over the entry as stored (its `hash`
//!      included), stored in the successor's `previousHash`.
//!
//! Verification recomputes both from current field values, so editing any
//! stored field is detected on the edited entry and on its successor.

use petition_contracts::{
    entry::SignatureEntry,
    error::PetitionResult,
    report::{IntegrityIssue, IssueKind},
};
use petition_core::{content_hash, record_digest, HashProvider};

/// The value an entry's `hash` field must hold.
pub fn entry_hash(hasher: &dyn HashProvider, entry: &SignatureEntry) -> PetitionResult<String> {
    content_hash(hasher, entry)
}

/// The value the next entry's `previousHash` must hold.
pub fn link_hash(hasher: &dyn HashProvider, entry: &SignatureEntry) -> PetitionResult<String> {
    record_digest(hasher, entry)
}

/// Verify every entry and collect the issues found, in ledger order.
///
/// Per entry, in this order:
///
/// 1. **Hash correctness**: the stored `hash` must equal `entry_hash`,
///    otherwise `HashMismatch`.
/// 2. **Linkage**: `previous_hash` must equal `link_hash` of the
///    predecessor, or `genesis` for the first entry, otherwise
///    `ChainBroken`.
/// 3. **Position**: `sequence` must equal the 1-based index, otherwise
///    `SequenceMismatch`.
///
/// An empty slice yields no issues. Errors only come from the hash provider.
pub fn verify_chain(
    hasher: &dyn HashProvider,
    entries: &[SignatureEntry],
    genesis: &str,
) -> PetitionResult<Vec<IntegrityIssue>> {
    let mut issues = Vec::new();
    let mut expected_prev = genesis.to_string();

    for (index, entry) in entries.iter().enumerate() {
        let issue = |kind| IntegrityIssue {
            kind,
            signature_id: entry.id.clone(),
            sequence: entry.sequence,
        };

        if entry_hash(hasher, entry)? != entry.hash {
            issues.push(issue(IssueKind::HashMismatch));
        }

        if entry.previous_hash != expected_prev {
            issues.push(issue(IssueKind::ChainBroken));
        }

        if entry.sequence != index as u64 + 1 {
            issues.push(issue(IssueKind::SequenceMismatch));
        }

        // Link the successor to this entry as it is stored now, not as it
        // was when appended.
        expected_prev = link_hash(hasher, entry)?;
    }

    Ok(issues)
}
