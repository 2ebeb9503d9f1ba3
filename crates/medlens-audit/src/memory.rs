//! In-memory implementation of `InvocationJournal`.
//!
//! Entries live for the session and are dropped with it. The journal keeps
//! at most `capacity` entries; once full, the oldest entry is evicted and its
//! hash becomes the anchor the retained chain is verified from. Use
//! `export()` for a snapshot and `verify_integrity()` to confirm nothing was
//! altered.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use tracing::debug;

use medlens_contracts::{
    error::{MedlensError, MedlensResult},
    journal::InvocationRecord,
};
use medlens_core::traits::InvocationJournal;

use crate::{
    chain::{hash_entry, verify_chain_from},
    entry::{JournalEntry, JournalExport},
};

/// Entries retained per session unless configured otherwise.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 4096;

pub(crate) struct JournalState {
    pub(crate) entries: VecDeque<JournalEntry>,
    pub(crate) last_hash: String,
    /// `prev_hash` of the oldest retained entry.
    pub(crate) anchor_hash: String,
    pub(crate) next_sequence: u64,
    pub(crate) evicted: u64,
}

/// Append-only, hash-chained journal of one session's tool calls.
pub struct InMemoryJournal {
    session_id: String,
    capacity: usize,
    pub(crate) state: Arc<Mutex<JournalState>>,
}

impl InMemoryJournal {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_capacity(session_id, DEFAULT_JOURNAL_CAPACITY)
    }

    /// `capacity` is clamped to at least 1.
    pub fn with_capacity(session_id: impl Into<String>, capacity: usize) -> Self {
        Self {
            session_id: session_id.into(),
            capacity: capacity.max(1),
            state: Arc::new(Mutex::new(JournalState {
                entries: VecDeque::new(),
                last_hash: JournalEntry::GENESIS_HASH.to_string(),
                anchor_hash: JournalEntry::GENESIS_HASH.to_string(),
                next_sequence: 0,
                evicted: 0,
            })),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries currently retained.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot the retained entries.
    pub fn export(&self) -> MedlensResult<JournalExport> {
        let state = self.lock()?;
        Ok(JournalExport {
            session_id: self.session_id.clone(),
            entries: state.entries.iter().cloned().collect(),
            exported_at: Utc::now(),
            anchor_hash: state.anchor_hash.clone(),
            evicted: state.evicted,
            terminal_hash: state
                .entries
                .back()
                .map(|e| e.this_hash.clone())
                .unwrap_or_default(),
        })
    }

    /// True when the retained chain still verifies from its anchor. A
    /// poisoned lock counts as invalid.
    pub fn verify_integrity(&self) -> bool {
        self.state
            .lock()
            .map(|state| verify_chain_from(&state.anchor_hash, state.entries.iter()))
            .unwrap_or(false)
    }

    fn lock(&self) -> MedlensResult<std::sync::MutexGuard<'_, JournalState>> {
        self.state.lock().map_err(|e| MedlensError::JournalWriteFailed {
            reason: format!("journal state lock poisoned: {e}"),
        })
    }
}

impl InvocationJournal for InMemoryJournal {
    fn record(&self, record: &InvocationRecord) -> MedlensResult<()> {
        let mut state = self.lock()?;

        let sequence = state.next_sequence;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(&self.session_id, sequence, record, &prev_hash)?;

        debug!(
            session_id = %self.session_id,
            sequence,
            tool = %record.tool,
            "journal entry appended"
        );

        state.entries.push_back(JournalEntry {
            sequence,
            session_id: self.session_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;
        state.next_sequence += 1;

        while state.entries.len() > self.capacity {
            if let Some(oldest) = state.entries.pop_front() {
                state.anchor_hash = oldest.this_hash;
                state.evicted += 1;
            }
        }

        Ok(())
    }
}
