//! Hashing primitives: content hashes, record digests and the zero sentinel.
//!
//! Records are hashed over their JSON form with field order preserved, so a
//! struct hashes exactly as it is stored. Two digests exist:
//!
//!   - `content_hash` drops a top-level `hash` key before digesting. An entry
//!     hashes identically whether or not its own `hash` was filled in.
//!   - `record_digest` digests the record as stored, `hash` included. Chain
//!     links and Merkle leaves use this one.
//!
//! A bare string is hashed as its JSON literal (quotes included), which is
//! how concatenated digest pairs enter the Merkle reduction.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use petition_contracts::error::{PetitionError, PetitionResult};

use crate::traits::HashProvider;

/// SHA-256 via `sha2`, hex-encoded (64 characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl HashProvider for Sha256Hasher {
    fn algorithm(&self) -> &str {
        "SHA-256"
    }

    fn digest(&self, data: &[u8]) -> PetitionResult<String> {
        Ok(hex::encode(Sha256::digest(data)))
    }
}

/// Digest `record` with any top-level field named `hash` removed.
pub fn content_hash<T: Serialize + ?Sized>(
    hasher: &dyn HashProvider,
    record: &T,
) -> PetitionResult<String> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.shift_remove("hash");
    }
    hasher.digest(&serde_json::to_vec(&value)?)
}

/// Digest `record` exactly as serialized.
pub fn record_digest<T: Serialize + ?Sized>(
    hasher: &dyn HashProvider,
    record: &T,
) -> PetitionResult<String> {
    hasher.digest(&serde_json::to_vec(record)?)
}

/// The `previousHash` of the first entry: `len` ASCII zeros.
pub fn zero_hash(len: usize) -> String {
    "0".repeat(len)
}

/// Check that `hasher` works and return its digest length in hex chars.
///
/// The provider must produce a non-empty lowercase hex digest and return
/// the same digest for the same input.
pub fn probe(hasher: &dyn HashProvider) -> PetitionResult<usize> {
    let first = hasher.digest(b"")?;
    let second = hasher.digest(b"")?;

    if first.is_empty() {
        return Err(PetitionError::HashUnavailable {
            reason: format!("{} produced an empty digest", hasher.algorithm()),
        });
    }
    if !first.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
        return Err(PetitionError::HashUnavailable {
            reason: format!("{} digest is not lowercase hex", hasher.algorithm()),
        });
    }
    if first != second {
        return Err(PetitionError::HashUnavailable {
            reason: format!("{} is not deterministic", hasher.algorithm()),
        });
    }

    Ok(first.len())
}
