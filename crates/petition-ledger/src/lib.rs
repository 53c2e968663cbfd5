//! # petition-ledger
//!
//! Append-only, SHA-256 hash-chained ledger of citizens' initiative
//! signatures with Merkle-root verification.
//!
//! ## Overview
//!
//! Every signature is stored as a `SignatureEntry` whose `hash` commits to
//! its own fields and whose `previousHash` commits to the full predecessor.
//! Editing any stored field, even a single byte, is reported by
//! `verify_integrity`. A Merkle root summarizes the whole ledger, and
//! `export_for_verification` produces a snapshot with identity fields
//! reduced to digests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use petition_contracts::entry::SignatureRequest;
//! use petition_ledger::{JsonFileStore, SignatureLedger};
//!
//! let ledger = SignatureLedger::open(Box::new(JsonFileStore::new("eci-signatures.json")))?;
//! ledger.add_signature(SignatureRequest::new("Ana", "Silva", "PT", "12345678")?)?;
//!
//! assert!(ledger.verify_integrity()?.valid);
//! let export = ledger.export_for_verification()?;
//! ```

pub mod chain;
pub mod ledger;
pub mod merkle;
pub mod store;

pub use chain::{entry_hash, link_hash, verify_chain};
pub use ledger::{SignatureLedger, DEFAULT_GOAL};
pub use merkle::merkle_root;
pub use store::{JsonFileStore, MemoryStore, DEFAULT_STORAGE_KEY};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};

    use petition_contracts::{
        entry::{LedgerSnapshot, SignatureRequest},
        error::{PetitionError, PetitionResult},
        report::IssueKind,
    };
    use petition_core::{Clock, FixedClock, HashProvider, LedgerStore, Sha256Hasher};

    use super::{merkle, MemoryStore, SignatureLedger};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn request(country: &str, id_number: &str) -> SignatureRequest {
        SignatureRequest::new("Ana", "Silva", country, id_number).unwrap()
    }

    /// A ledger on a fresh in-memory store with a fixed clock.
    fn ledger_with_clock() -> (SignatureLedger, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let ledger = SignatureLedger::open_with(
            Box::new(MemoryStore::new()),
            Arc::new(Sha256Hasher),
            Box::new(SharedClock(clock.clone())),
        )
        .unwrap();
        (ledger, clock)
    }

    fn ledger_with(n: usize) -> SignatureLedger {
        let (ledger, clock) = ledger_with_clock();
        for i in 0..n {
            ledger
                .add_signature(request("PT", &format!("{:08}", i)))
                .unwrap();
            clock.advance(Duration::milliseconds(250));
        }
        ledger
    }

    struct SharedClock(Arc<FixedClock>);

    impl Clock for SharedClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            self.0.now()
        }
    }

    /// A store that refuses every write.
    struct ReadOnlyStore;

    impl LedgerStore for ReadOnlyStore {
        fn load(&self) -> PetitionResult<Option<LedgerSnapshot>> {
            Ok(None)
        }

        fn save(&self, _snapshot: &LedgerSnapshot) -> PetitionResult<()> {
            Err(PetitionError::Persistence {
                reason: "storage quota exceeded".to_string(),
            })
        }
    }

    /// A hash provider that is not available in this environment.
    struct UnsupportedHasher;

    impl HashProvider for UnsupportedHasher {
        fn algorithm(&self) -> &str {
            "SHA-256"
        }

        fn digest(&self, _data: &[u8]) -> PetitionResult<String> {
            Err(PetitionError::HashUnavailable {
                reason: "digest algorithm not supported".to_string(),
            })
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_genesis_hash() {
        let ledger = ledger_with(1);
        let entries = ledger.entries().unwrap();
        assert_eq!(entries[0].previous_hash, "0".repeat(64));
        assert_eq!(ledger.genesis_hash(), entries[0].previous_hash);
    }

    #[test]
    fn test_entries_link_to_predecessor_digest() {
        let ledger = ledger_with(3);
        let entries = ledger.entries().unwrap();
        for pair in entries.windows(2) {
            assert_eq!(
                pair[1].previous_hash,
                super::link_hash(&Sha256Hasher, &pair[0]).unwrap(),
                "entry {} must link to the full digest of entry {}",
                pair[1].sequence,
                pair[0].sequence
            );
        }
    }

    #[test]
    fn test_entry_hash_excludes_own_hash() {
        let ledger = ledger_with(1);
        let entry = ledger.entries().unwrap().remove(0);
        assert_eq!(entry.hash.len(), 64);
        assert_eq!(entry.hash, ledger.content_hash(&entry).unwrap());
    }

    #[test]
    fn test_audit_log_tracks_appends() {
        let ledger = ledger_with(3);
        let entries = ledger.entries().unwrap();
        let audit = ledger.audit_log().unwrap();

        assert_eq!(audit.len(), entries.len());
        for (record, entry) in audit.iter().zip(&entries) {
            assert_eq!(record.signature_id, entry.id);
            assert_eq!(record.hash, entry.hash);
            assert_eq!(record.timestamp, entry.timestamp);
            assert_eq!(record.country, entry.country);
        }
    }

    #[test]
    fn test_tamper_detection_cascades_to_successor() {
        let ledger = ledger_with(3);

        // Directly mutate the internal state to simulate an edited store.
        {
            let mut state = ledger.state.write().unwrap();
            state.signatures[1].country = "ES".to_string();
        }

        let report = ledger.verify_integrity().unwrap();
        assert!(!report.valid);

        let mismatched: Vec<u64> = report
            .issues_of(IssueKind::HashMismatch)
            .map(|i| i.sequence)
            .collect();
        let broken: Vec<u64> = report
            .issues_of(IssueKind::ChainBroken)
            .map(|i| i.sequence)
            .collect();
        assert_eq!(mismatched, vec![2]);
        assert_eq!(broken, vec![3]);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_tamper_on_last_entry_has_no_successor() {
        let ledger = ledger_with(3);
        {
            let mut state = ledger.state.write().unwrap();
            state.signatures[2].id_number = "99999999".to_string();
        }

        let report = ledger.verify_integrity().unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::HashMismatch);
        assert_eq!(report.issues[0].sequence, 3);
    }

    /// Rewriting an entry's hash to match its edited fields still breaks the
    /// successor's link.
    #[test]
    fn test_resealed_entry_still_breaks_chain() {
        let ledger = ledger_with(2);
        {
            let mut state = ledger.state.write().unwrap();
            state.signatures[0].last_name = "Forged".to_string();
            let resealed = super::entry_hash(&Sha256Hasher, &state.signatures[0]).unwrap();
            state.signatures[0].hash = resealed;
        }

        let report = ledger.verify_integrity().unwrap();
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::ChainBroken);
        assert_eq!(report.issues[0].sequence, 2);
    }

    #[test]
    fn test_sequence_edit_is_reported() {
        let ledger = ledger_with(2);
        {
            let mut state = ledger.state.write().unwrap();
            state.signatures[1].sequence = 7;
        }

        let report = ledger.verify_integrity().unwrap();
        assert!(report
            .issues_of(IssueKind::SequenceMismatch)
            .any(|i| i.sequence == 7));
        assert!(report.issues_of(IssueKind::HashMismatch).any(|i| i.sequence == 7));
    }

    #[test]
    fn test_verify_empty() {
        let ledger = ledger_with(0);
        let report = ledger.verify_integrity().unwrap();
        assert!(report.valid, "an empty ledger must be considered valid");
        assert_eq!(report.total_signatures, 0);
        assert_eq!(report.merkle_root, None);
    }

    #[test]
    fn test_merkle_odd_layer_pairs_last_with_itself() {
        let leaves: Vec<String> = ["a", "b", "c"].iter().map(|s| s.repeat(64)).collect();
        let root = merkle::reduce(&Sha256Hasher, leaves.clone()).unwrap().unwrap();

        let pair = |l: &str, r: &str| {
            petition_core::record_digest(&Sha256Hasher, &format!("{}{}", l, r)).unwrap()
        };
        let ab = pair(leaves[0].as_str(), leaves[1].as_str());
        let cc = pair(leaves[2].as_str(), leaves[2].as_str());
        assert_eq!(root, pair(ab.as_str(), cc.as_str()));
    }

    #[test]
    fn test_merkle_reduce_empty_and_single() {
        assert_eq!(merkle::reduce(&Sha256Hasher, Vec::new()).unwrap(), None);
        assert_eq!(
            merkle::reduce(&Sha256Hasher, vec!["f".repeat(64)]).unwrap(),
            Some("f".repeat(64))
        );
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let (ledger, clock) = ledger_with_clock();
        ledger.add_signature(request("PT", "00000001")).unwrap();
        clock.advance(Duration::seconds(-30));
        ledger.add_signature(request("PT", "00000002")).unwrap();

        let entries = ledger.entries().unwrap();
        assert_eq!(entries[0].timestamp, "2024-05-01T12:00:00.000Z");
        assert_eq!(entries[1].timestamp, entries[0].timestamp);
        assert!(ledger.verify_integrity().unwrap().valid);
    }

    #[test]
    fn test_save_failure_keeps_append() {
        let ledger = SignatureLedger::open(Box::new(ReadOnlyStore)).unwrap();
        let entry = ledger.add_signature(request("PT", "12345678")).unwrap();
        assert_eq!(entry.sequence, 1);
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn test_unsupported_hash_is_fatal() {
        let result = SignatureLedger::open_with(
            Box::new(MemoryStore::new()),
            Arc::new(UnsupportedHasher),
            Box::new(petition_core::SystemClock),
        );
        assert!(matches!(result, Err(PetitionError::HashUnavailable { .. })));
    }

    #[test]
    fn test_stats_caps_percentage_and_orders_countries() {
        let (ledger, _clock) = ledger_with_clock();
        for country in ["PT", "ES", "PT", "DE", "ES", "PT", "AT"] {
            ledger.add_signature(request(country, "12345678")).unwrap();
        }

        let stats = ledger.stats(4, 3).unwrap();
        assert_eq!(stats.total, 7);
        assert_eq!(stats.percentage, 100.0);
        let top: Vec<(&str, u64)> = stats
            .top_countries
            .iter()
            .map(|c| (c.country.as_str(), c.count))
            .collect();
        assert_eq!(top, vec![("PT", 3), ("ES", 2), ("AT", 1)]);

        let stats = ledger.stats(super::DEFAULT_GOAL, 10).unwrap();
        assert!((stats.percentage - 0.0007).abs() < 1e-9);
        assert_eq!(stats.top_countries.len(), 4);
    }

    #[test]
    fn test_matches_root() {
        let ledger = ledger_with(3);
        let root = ledger.merkle_root().unwrap().unwrap();
        assert!(ledger.matches_root(&root).unwrap());
        assert!(!ledger.matches_root(&"0".repeat(64)).unwrap());
    }
}
