//! Signature entries, audit records and the persisted ledger snapshot.
//!
//! Field order on every serialized type is part of the hash input: struct
//! fields are declared in the order they are serialized and digested, and
//! the JSON names are camelCase so persisted state stays readable by the
//! web front end.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PetitionError, PetitionResult};

/// Format a UTC instant the way entries store it: RFC 3339 with
/// millisecond precision and a `Z` suffix (`2024-05-01T12:00:00.000Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The input to `SignatureLedger::add_signature`.
///
/// Construct through [`SignatureRequest::new`], which trims every field and
/// rejects empty values and malformed country codes. The ID number is
/// checked against the country's format by the registry, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest {
    first_name: String,
    last_name: String,
    country: String,
    id_number: String,
}

impl SignatureRequest {
    /// Build a request, returning `InvalidSignature` for missing fields or a
    /// country code that is not two ASCII uppercase letters.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        country: impl Into<String>,
        id_number: impl Into<String>,
    ) -> PetitionResult<Self> {
        let first_name = required("firstName", first_name.into())?;
        let last_name = required("lastName", last_name.into())?;
        let country = required("country", country.into())?;
        let id_number = required("idNumber", id_number.into())?;

        if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(PetitionError::InvalidSignature {
                reason: format!("country '{}' is not an ISO-3166 alpha-2 code", country),
            });
        }

        Ok(Self {
            first_name,
            last_name,
            country,
            id_number,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn id_number(&self) -> &str {
        &self.id_number
    }
}

fn required(field: &str, value: String) -> PetitionResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PetitionError::InvalidSignature {
            reason: format!("{} is required", field),
        });
    }
    Ok(trimmed.to_string())
}

/// One recorded signature with its integrity metadata.
///
/// Entries are immutable once appended. `hash` is the content hash of every
/// other field; `previous_hash` is the full digest (including `hash`) of the
/// entry before it, or the zero sentinel for the first entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    /// Globally unique identifier (UUID v4 in string form).
    pub id: String,

    pub first_name: String,

    pub last_name: String,

    /// ISO-3166 alpha-2 country code.
    pub country: String,

    pub id_number: String,

    /// Creation time, see [`format_timestamp`].
    pub timestamp: String,

    /// Full digest of the preceding entry, or the zero sentinel.
    pub previous_hash: String,

    /// 1-based position in the ledger.
    pub sequence: u64,

    /// Content hash of this entry's other fields.
    pub hash: String,
}

impl SignatureEntry {
    /// The identity fields of this entry, in export order.
    pub fn personal_data(&self) -> PersonalData<'_> {
        PersonalData {
            first_name: &self.first_name,
            last_name: &self.last_name,
            id_number: &self.id_number,
        }
    }
}

/// The personally identifying fields of an entry.
///
/// Only ever leaves the ledger as a digest.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub id_number: &'a str,
}

/// The kind of mutation an audit record describes.
///
/// The ledger only ever appends, so there is a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    SignatureAdded,
}

/// Side record of one append, kept in lockstep with the entry list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub action: AuditAction,
    pub signature_id: String,
    pub timestamp: String,
    pub country: String,
    pub hash: String,
}

impl AuditLogEntry {
    /// The audit record for a freshly appended entry.
    pub fn signature_added(entry: &SignatureEntry) -> Self {
        Self {
            action: AuditAction::SignatureAdded,
            signature_id: entry.id.clone(),
            timestamp: entry.timestamp.clone(),
            country: entry.country.clone(),
            hash: entry.hash.clone(),
        }
    }
}

/// The persisted ledger state: `{ signatures, auditLog }`.
///
/// Either list may be absent in stored JSON and is then treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub signatures: Vec<SignatureEntry>,

    #[serde(default)]
    pub audit_log: Vec<AuditLogEntry>,
}
