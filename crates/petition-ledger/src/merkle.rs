//! Merkle root over the ledger's entries.
//!
//! Leaves are the link hashes of the stored entries (each entry's own
//! `hash` field included). Each layer hashes the string concatenation
//! `left‖right` of adjacent digests; when a layer has an odd count the last
//! digest is paired with itself. Verifiers that recompute the root rely on
//! that self-pairing rule, so an unpaired digest is never promoted as is.

use petition_contracts::{entry::SignatureEntry, error::PetitionResult};
use petition_core::{record_digest, HashProvider};

use crate::chain::link_hash;

/// Compute the Merkle root of `entries`, or `None` when there are none.
pub fn merkle_root(
    hasher: &dyn HashProvider,
    entries: &[SignatureEntry],
) -> PetitionResult<Option<String>> {
    let leaves = entries
        .iter()
        .map(|entry| link_hash(hasher, entry))
        .collect::<PetitionResult<Vec<_>>>()?;
    reduce(hasher, leaves)
}

/// Reduce a leaf layer to its root.
pub fn reduce(hasher: &dyn HashProvider, leaves: Vec<String>) -> PetitionResult<Option<String>> {
    let mut layer = leaves;

    while layer.len() > 1 {
        layer = layer
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                record_digest(hasher, &format!("{}{}", left, right))
            })
            .collect::<PetitionResult<Vec<_>>>()?;
    }

    Ok(layer.pop())
}
