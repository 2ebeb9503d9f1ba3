//! Hash-chain primitives for the invocation journal.
//!
//! Hash input layout (bytes, in order):
//!   1. session_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the invocation record

use sha2::{Digest, Sha256};

use medlens_contracts::{error::MedlensResult, journal::InvocationRecord};

use crate::entry::JournalEntry;

/// Compute the SHA-256 hash of one journal entry as lowercase hex.
pub fn hash_entry(
    session_id: &str,
    sequence: u64,
    record: &InvocationRecord,
    prev_hash: &str,
) -> MedlensResult<String> {
    let record_json = serde_json::to_vec(record)?;

    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Check that every entry links to its predecessor and that every stored
/// hash matches a recomputation. An empty chain is valid.
pub fn verify_chain(entries: &[JournalEntry]) -> bool {
    verify_chain_from(JournalEntry::GENESIS_HASH, entries)
}

/// Like `verify_chain`, but the first entry must link to `anchor` instead of
/// the genesis hash. Used once older entries have been evicted.
pub fn verify_chain_from<'a>(
    anchor: &str,
    entries: impl IntoIterator<Item = &'a JournalEntry>,
) -> bool {
    let mut expected_prev = anchor.to_string();

    for entry in entries {
        if entry.prev_hash != expected_prev {
            return false;
        }

        match hash_entry(&entry.session_id, entry.sequence, &entry.record, &entry.prev_hash) {
            Ok(recomputed) if recomputed == entry.this_hash => {}
            _ => return false,
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}
