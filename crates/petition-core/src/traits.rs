//! Seams between the ledger and its environment.
//!
//! - `HashProvider`: the one-way digest every integrity check depends on
//! - `LedgerStore`: durable storage for the serialized ledger state
//! - `Clock`: source of entry timestamps
//!
//! The ledger receives all three at construction, so tests can run
//! independent ledgers with in-memory storage and a fixed clock.

use chrono::{DateTime, Utc};

use petition_contracts::{entry::LedgerSnapshot, error::PetitionResult};

/// A one-way hash function producing lowercase hexadecimal digests.
///
/// Implementations must be deterministic and produce digests of a fixed
/// length. A provider that cannot hash returns `HashUnavailable`; the ledger
/// treats that as fatal.
pub trait HashProvider: Send + Sync {
    /// Human-readable algorithm name, e.g. `"SHA-256"`.
    fn algorithm(&self) -> &str;

    /// Digest `data` and return the lowercase hex encoding.
    fn digest(&self, data: &[u8]) -> PetitionResult<String>;
}

/// Durable storage for ledger state.
///
/// The ledger loads once at construction and saves the full snapshot after
/// every append. Implementations store the snapshot as a single JSON blob.
pub trait LedgerStore: Send + Sync {
    /// Load the persisted snapshot, or `None` when nothing has been stored.
    ///
    /// Return `Persistence` for unreadable or corrupt state; the ledger
    /// recovers by starting empty.
    fn load(&self) -> PetitionResult<Option<LedgerSnapshot>>;

    /// Replace the persisted snapshot.
    fn save(&self, snapshot: &LedgerSnapshot) -> PetitionResult<()>;
}

/// Source of the current time for entry timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
