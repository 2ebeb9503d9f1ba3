//! Journal entry and export types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medlens_contracts::journal::InvocationRecord;

/// One tool invocation in the session's hash chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the chain, starting at 0. Not reset by eviction.
    pub sequence: u64,
    pub session_id: String,
    pub record: InvocationRecord,
    /// Hash of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,
    pub this_hash: String,
}

impl JournalEntry {
    /// `prev_hash` of the first entry in every chain.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Snapshot of a session's journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalExport {
    pub session_id: String,
    pub entries: Vec<JournalEntry>,
    pub exported_at: DateTime<Utc>,
    /// `prev_hash` of the first exported entry: `GENESIS_HASH` until the
    /// journal starts evicting.
    pub anchor_hash: String,
    /// Entries dropped from the front of the chain.
    #[serde(default)]
    pub evicted: u64,
    /// `this_hash` of the last entry; empty when nothing was recorded.
    pub terminal_hash: String,
}

impl JournalExport {
    /// Number of entries whose outcome was a success.
    pub fn succeeded(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.record.outcome.is_success())
            .count()
    }
}
