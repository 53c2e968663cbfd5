//! The signature ledger.
//!
//! `SignatureLedger` owns the append-only entry list and its companion audit
//! log. Appends take the write lock for the whole operation (hashing, push
//! and save), so mutations are serialized and readers only ever observe
//! completed appends. Verification, Merkle root, export and stats take the
//! read lock and may run concurrently with each other.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use petition_contracts::{
    entry::{format_timestamp, AuditLogEntry, LedgerSnapshot, SignatureEntry, SignatureRequest},
    error::{PetitionError, PetitionResult},
    report::{CountryCount, ExportedSignature, IntegrityReport, LedgerStats, VerificationExport},
};
use petition_core::{
    content_hash, probe, zero_hash, Clock, HashProvider, LedgerStore, Sha256Hasher, SystemClock,
};

use crate::{
    chain::{entry_hash, link_hash, verify_chain},
    merkle::merkle_root,
};

/// The signature goal of a European Citizens' Initiative.
pub const DEFAULT_GOAL: u64 = 1_000_000;

/// An append-only, hash-chained ledger of initiative signatures.
///
/// # Thread safety
///
/// `SignatureLedger` is `Send + Sync`. Share it behind an `Arc`; appends
/// are serialized internally.
pub struct SignatureLedger {
    hasher: Arc<dyn HashProvider>,
    store: Box<dyn LedgerStore>,
    clock: Box<dyn Clock>,
    /// `previousHash` of the first entry, as long as one digest.
    genesis: String,
    /// Why persisted state was discarded at open, if it was.
    load_error: Option<String>,
    pub(crate) state: RwLock<LedgerSnapshot>,
}

impl SignatureLedger {
    /// Open a ledger on `store` with SHA-256 and the system clock.
    pub fn open(store: Box<dyn LedgerStore>) -> PetitionResult<Self> {
        Self::open_with(store, Arc::new(Sha256Hasher), Box::new(SystemClock))
    }

    /// Open a ledger with explicit collaborators.
    ///
    /// The hash provider is probed first; a provider that cannot hash is a
    /// fatal `HashUnavailable` error. Persisted state is then loaded. An
    /// unreadable or corrupt store is logged and the ledger starts empty.
    pub fn open_with(
        store: Box<dyn LedgerStore>,
        hasher: Arc<dyn HashProvider>,
        clock: Box<dyn Clock>,
    ) -> PetitionResult<Self> {
        let digest_len = probe(hasher.as_ref())?;

        let (snapshot, load_error) = match store.load() {
            Ok(Some(snapshot)) => (snapshot, None),
            Ok(None) => (LedgerSnapshot::default(), None),
            Err(e) => {
                warn!(error = %e, "failed to load ledger state; starting with an empty ledger");
                (LedgerSnapshot::default(), Some(e.to_string()))
            }
        };

        info!(
            algorithm = hasher.algorithm(),
            signatures = snapshot.signatures.len(),
            audit_records = snapshot.audit_log.len(),
            "signature ledger opened"
        );

        Ok(Self {
            hasher,
            store,
            clock,
            genesis: zero_hash(digest_len),
            load_error,
            state: RwLock::new(snapshot),
        })
    }

    /// The sentinel stored as the first entry's `previousHash`.
    pub fn genesis_hash(&self) -> &str {
        &self.genesis
    }

    /// The load failure this ledger recovered from by starting empty.
    ///
    /// `Some` means the stored state was unreadable, so an empty ledger that
    /// verifies cleanly says nothing about what was stored. The next append
    /// overwrites the stored state.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn hash_algorithm(&self) -> &str {
        self.hasher.algorithm()
    }

    /// Digest any record with its top-level `hash` field excluded.
    pub fn content_hash<T: serde::Serialize + ?Sized>(&self, record: &T) -> PetitionResult<String> {
        content_hash(self.hasher.as_ref(), record)
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    /// Append a signature and persist the ledger.
    ///
    /// Assigns the id, timestamp, sequence and both hashes, appends the entry
    /// and its audit record, then saves the full snapshot. The ID number is
    /// not checked against the country's format here; see
    /// `petition_registry::FormIntake`.
    ///
    /// A failed save is logged and does not undo the append: the entry stays
    /// in memory and is written with the next successful save.
    pub fn add_signature(&self, request: SignatureRequest) -> PetitionResult<SignatureEntry> {
        let mut state = self.write()?;
        let hasher = self.hasher.as_ref();

        let previous_hash = match state.signatures.last() {
            Some(last) => link_hash(hasher, last)?,
            None => self.genesis.clone(),
        };

        let mut entry = SignatureEntry {
            id: Uuid::new_v4().to_string(),
            first_name: request.first_name().to_string(),
            last_name: request.last_name().to_string(),
            country: request.country().to_string(),
            id_number: request.id_number().to_string(),
            timestamp: format_timestamp(self.next_timestamp(state.signatures.last())),
            previous_hash,
            sequence: state.signatures.len() as u64 + 1,
            hash: String::new(),
        };
        entry.hash = entry_hash(hasher, &entry)?;

        state.signatures.push(entry.clone());
        state.audit_log.push(AuditLogEntry::signature_added(&entry));

        if let Err(e) = self.store.save(&state) {
            error!(
                signature_id = %entry.id,
                sequence = entry.sequence,
                error = %e,
                "failed to persist ledger state"
            );
        }

        info!(
            signature_id = %entry.id,
            sequence = entry.sequence,
            country = %entry.country,
            hash = %entry.hash,
            "signature added"
        );

        Ok(entry)
    }

    /// The clock's time, held back to the previous entry's timestamp if the
    /// clock has stepped backwards.
    fn next_timestamp(&self, last: Option<&SignatureEntry>) -> DateTime<Utc> {
        let now = self.clock.now();
        let previous = last
            .and_then(|entry| DateTime::parse_from_rfc3339(&entry.timestamp).ok())
            .map(|at| at.with_timezone(&Utc));

        match previous {
            Some(previous) if previous > now => {
                debug!(%now, %previous, "clock behind last entry; reusing its timestamp");
                previous
            }
            _ => now,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Recompute every entry's hash and link and report what does not match.
    ///
    /// Read-only: issues are reported, never repaired.
    pub fn verify_integrity(&self) -> PetitionResult<IntegrityReport> {
        let state = self.read()?;
        self.integrity_of(&state)
    }

    /// The Merkle root of the current entries, `None` when empty.
    pub fn merkle_root(&self) -> PetitionResult<Option<String>> {
        let state = self.read()?;
        merkle_root(self.hasher.as_ref(), &state.signatures)
    }

    /// True when `claimed` equals the current Merkle root.
    pub fn matches_root(&self, claimed: &str) -> PetitionResult<bool> {
        Ok(self.merkle_root()?.as_deref() == Some(claimed))
    }

    /// Build the privacy-preserving export.
    ///
    /// Names and ID numbers only appear as `personalDataHash`, the content
    /// hash of `{firstName, lastName, idNumber}`.
    pub fn export_for_verification(&self) -> PetitionResult<VerificationExport> {
        let state = self.read()?;
        let integrity = self.integrity_of(&state)?;

        let signatures = state
            .signatures
            .iter()
            .map(|entry| {
                Ok(ExportedSignature {
                    id: entry.id.clone(),
                    country: entry.country.clone(),
                    timestamp: entry.timestamp.clone(),
                    hash: entry.hash.clone(),
                    personal_data_hash: content_hash(
                        self.hasher.as_ref(),
                        &entry.personal_data(),
                    )?,
                })
            })
            .collect::<PetitionResult<Vec<_>>>()?;

        info!(
            signatures = signatures.len(),
            integrity_valid = integrity.valid,
            "ledger exported for verification"
        );

        Ok(VerificationExport {
            export_date: format_timestamp(self.clock.now()),
            total_signatures: state.signatures.len() as u64,
            by_country: count_by_country(&state.signatures),
            merkle_root: integrity.merkle_root,
            integrity_valid: integrity.valid,
            audit_log: state.audit_log.clone(),
            signatures,
        })
    }

    /// Number of signatures per country code.
    pub fn country_stats(&self) -> PetitionResult<BTreeMap<String, u64>> {
        let state = self.read()?;
        Ok(count_by_country(&state.signatures))
    }

    /// Progress toward `goal` and the `top` countries by signature count.
    pub fn stats(&self, goal: u64, top: usize) -> PetitionResult<LedgerStats> {
        let state = self.read()?;
        let total = state.signatures.len() as u64;

        let percentage = if goal == 0 {
            100.0
        } else {
            (total as f64 / goal as f64 * 100.0).min(100.0)
        };

        let mut top_countries: Vec<CountryCount> = count_by_country(&state.signatures)
            .into_iter()
            .map(|(country, count)| CountryCount { country, count })
            .collect();
        // BTreeMap order already breaks ties by code; the sort is stable.
        top_countries.sort_by(|a, b| b.count.cmp(&a.count));
        top_countries.truncate(top);

        Ok(LedgerStats {
            total,
            goal,
            percentage,
            top_countries,
        })
    }

    pub fn len(&self) -> PetitionResult<usize> {
        Ok(self.read()?.signatures.len())
    }

    pub fn is_empty(&self) -> PetitionResult<bool> {
        Ok(self.len()? == 0)
    }

    /// A copy of every entry, in sequence order.
    pub fn entries(&self) -> PetitionResult<Vec<SignatureEntry>> {
        Ok(self.read()?.signatures.clone())
    }

    /// A copy of the audit log.
    pub fn audit_log(&self) -> PetitionResult<Vec<AuditLogEntry>> {
        Ok(self.read()?.audit_log.clone())
    }

    /// A copy of the full persisted state.
    pub fn snapshot(&self) -> PetitionResult<LedgerSnapshot> {
        Ok(self.read()?.clone())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn integrity_of(&self, state: &LedgerSnapshot) -> PetitionResult<IntegrityReport> {
        let hasher = self.hasher.as_ref();
        let issues = verify_chain(hasher, &state.signatures, &self.genesis)?;
        let merkle_root = merkle_root(hasher, &state.signatures)?;

        for issue in &issues {
            warn!(
                kind = ?issue.kind,
                signature_id = %issue.signature_id,
                sequence = issue.sequence,
                "ledger integrity issue"
            );
        }
        debug!(
            signatures = state.signatures.len(),
            issues = issues.len(),
            "ledger integrity verified"
        );

        Ok(IntegrityReport {
            valid: issues.is_empty(),
            issues,
            total_signatures: state.signatures.len() as u64,
            merkle_root,
        })
    }

    fn read(&self) -> PetitionResult<RwLockReadGuard<'_, LedgerSnapshot>> {
        self.state.read().map_err(|e| PetitionError::LedgerUnavailable {
            reason: format!("ledger lock poisoned: {}", e),
        })
    }

    fn write(&self) -> PetitionResult<RwLockWriteGuard<'_, LedgerSnapshot>> {
        self.state.write().map_err(|e| PetitionError::LedgerUnavailable {
            reason: format!("ledger lock poisoned: {}", e),
        })
    }
}

fn count_by_country(entries: &[SignatureEntry]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.country.clone()).or_insert(0) += 1;
    }
    counts
}
