//! # petition-core
//!
//! Hashing primitives and environment seams for the signature ledger.
//!
//! This crate provides:
//! - The `HashProvider`, `LedgerStore` and `Clock` traits
//! - `Sha256Hasher`, the default hash provider
//! - `content_hash` / `record_digest`, the two record digests the ledger uses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use petition_core::{content_hash, Sha256Hasher};
//!
//! let hash = content_hash(&Sha256Hasher, &entry)?;
//! ```

pub mod clock;
pub mod hash;
pub mod traits;

pub use clock::{FixedClock, SystemClock};
pub use hash::{content_hash, probe, record_digest, zero_hash, Sha256Hasher};
pub use traits::{Clock, HashProvider, LedgerStore};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use serde::Serialize;

    use petition_contracts::error::{PetitionError, PetitionResult};

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Sealed {
        id: String,
        sequence: u64,
        hash: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Unsealed {
        id: String,
        sequence: u64,
    }

    /// A provider whose backend is missing.
    struct BrokenHasher;

    impl HashProvider for BrokenHasher {
        fn algorithm(&self) -> &str {
            "broken"
        }

        fn digest(&self, _data: &[u8]) -> PetitionResult<String> {
            Err(PetitionError::HashUnavailable {
                reason: "algorithm not supported".to_string(),
            })
        }
    }

    /// A provider that returns uppercase hex.
    struct ShoutingHasher;

    impl HashProvider for ShoutingHasher {
        fn algorithm(&self) -> &str {
            "shouting"
        }

        fn digest(&self, data: &[u8]) -> PetitionResult<String> {
            Ok(Sha256Hasher.digest(data)?.to_uppercase())
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            Sha256Hasher.digest(b"").unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    /// A `hash` field is removed, not blanked: the digest equals that of a
    /// record that never had the field.
    #[test]
    fn content_hash_ignores_hash_field() {
        let sealed = Sealed {
            id: "a".to_string(),
            sequence: 1,
            hash: "deadbeef".to_string(),
        };
        let unsealed = Unsealed {
            id: "a".to_string(),
            sequence: 1,
        };

        assert_eq!(
            content_hash(&Sha256Hasher, &sealed).unwrap(),
            content_hash(&Sha256Hasher, &unsealed).unwrap()
        );
        assert_eq!(
            content_hash(&Sha256Hasher, &unsealed).unwrap(),
            Sha256Hasher.digest(br#"{"id":"a","sequence":1}"#).unwrap()
        );
    }

    #[test]
    fn record_digest_includes_hash_field() {
        let sealed = Sealed {
            id: "a".to_string(),
            sequence: 1,
            hash: "deadbeef".to_string(),
        };

        let full = record_digest(&Sha256Hasher, &sealed).unwrap();
        let content = content_hash(&Sha256Hasher, &sealed).unwrap();
        assert_ne!(full, content);
        assert_eq!(
            full,
            Sha256Hasher
                .digest(br#"{"id":"a","sequence":1,"hash":"deadbeef"}"#)
                .unwrap()
        );
    }

    #[test]
    fn strings_hash_as_json_literals() {
        assert_eq!(
            record_digest(&Sha256Hasher, "abc").unwrap(),
            Sha256Hasher.digest(b"\"abc\"").unwrap()
        );
    }

    #[test]
    fn zero_hash_has_requested_length() {
        let zero = zero_hash(64);
        assert_eq!(zero.len(), 64);
        assert!(zero.chars().all(|c| c == '0'));
    }

    #[test]
    fn probe_reports_digest_length() {
        assert_eq!(probe(&Sha256Hasher).unwrap(), 64);
    }

    #[test]
    fn probe_rejects_failing_provider() {
        assert!(matches!(
            probe(&BrokenHasher),
            Err(PetitionError::HashUnavailable { .. })
        ));
    }

    #[test]
    fn probe_rejects_uppercase_hex() {
        match probe(&ShoutingHasher) {
            Err(PetitionError::HashUnavailable { reason }) => {
                assert!(reason.contains("lowercase"), "unexpected reason: {reason}");
            }
            other => panic!("expected HashUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn fixed_clock_advances_only_when_told() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now(), start + Duration::seconds(5));
    }
}
