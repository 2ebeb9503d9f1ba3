//! # medlens-audit
//!
//! Hash-chained journal of every tool call the model makes during a session.
//!
//! Each `InvocationRecord` the dispatcher produces is wrapped in a
//! `JournalEntry` that commits to the previous entry's SHA-256 hash, so any
//! later edit to a recorded call is detectable with `verify_chain`.
//!
//! The journal is bounded (`DEFAULT_JOURNAL_CAPACITY` entries unless built
//! with `InMemoryJournal::with_capacity`). Evicted entries are gone; the
//! retained tail is verified from the hash of the last evicted entry.
//!
//! ```rust,ignore
//! use medlens_audit::InMemoryJournal;
//!
//! let journal = Arc::new(InMemoryJournal::new(session_id.to_string()));
//! let dispatcher = Dispatcher::new(registry, Box::new(verifier), journal.clone());
//! // ... session runs ...
//! assert!(journal.verify_integrity());
//! ```

pub mod chain;
pub mod entry;
pub mod memory;

pub use chain::{hash_entry, verify_chain, verify_chain_from};
pub use entry::{JournalEntry, JournalExport};
pub use memory::{InMemoryJournal, DEFAULT_JOURNAL_CAPACITY};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use medlens_contracts::journal::{InvocationOutcome, InvocationRecord};
    use medlens_core::traits::InvocationJournal;

    use super::{InMemoryJournal, JournalEntry};

    fn make_record(tool: &str, ok: bool) -> InvocationRecord {
        InvocationRecord {
            tool: tool.to_string(),
            arguments: json!({ "category": "RED" }),
            outcome: if ok {
                InvocationOutcome::Succeeded {
                    result: json!({ "message": "Triage: RED." }),
                }
            } else {
                InvocationOutcome::Failed {
                    reason: "unknown tool".to_string(),
                }
            },
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_chain_verifies_after_writes() {
        let journal = InMemoryJournal::new("session-a");
        journal.record(&make_record("classify_triage", true)).unwrap();
        journal.record(&make_record("log_incident", true)).unwrap();
        journal.record(&make_record("nope", false)).unwrap();

        assert_eq!(journal.len(), 3);
        assert!(journal.verify_integrity());
    }

    #[test]
    fn test_tampering_breaks_chain() {
        let journal = InMemoryJournal::new("session-b");
        journal.record(&make_record("classify_triage", true)).unwrap();
        journal.record(&make_record("log_incident", true)).unwrap();

        {
            let mut state = journal.state.lock().unwrap();
            state.entries[0].record.arguments = json!({ "category": "GREEN" });
        }

        assert!(!journal.verify_integrity(), "edited entry must be detected");
    }

    #[test]
    fn test_first_entry_links_to_genesis() {
        let journal = InMemoryJournal::new("session-c");
        journal.record(&make_record("classify_triage", true)).unwrap();

        let export = journal.export().unwrap();
        assert_eq!(export.entries[0].prev_hash, JournalEntry::GENESIS_HASH);
        assert_eq!(export.entries[0].sequence, 0);
    }

    #[test]
    fn test_export_counts_and_terminal_hash() {
        let journal = InMemoryJournal::new("session-d");
        journal.record(&make_record("classify_triage", true)).unwrap();
        journal.record(&make_record("nope", false)).unwrap();

        let export = journal.export().unwrap();
        assert_eq!(export.session_id, "session-d");
        assert_eq!(export.entries.len(), 2);
        assert_eq!(export.succeeded(), 1);
        assert_eq!(export.terminal_hash, export.entries[1].this_hash);
        assert!(super::verify_chain(&export.entries));
    }

    #[test]
    fn test_empty_journal() {
        let journal = InMemoryJournal::new("session-e");
        assert!(journal.is_empty());
        assert!(journal.verify_integrity());
        assert!(journal.export().unwrap().terminal_hash.is_empty());
        assert!(super::verify_chain(&[]));
    }

    #[test]
    fn test_capacity_evicts_oldest_and_chain_still_verifies() {
        let journal = InMemoryJournal::with_capacity("session-f", 3);
        for i in 0..5 {
            journal.record(&make_record(&format!("tool_{i}"), true)).unwrap();
        }

        assert_eq!(journal.len(), 3);
        assert!(journal.verify_integrity());

        let export = journal.export().unwrap();
        assert_eq!(export.evicted, 2);
        let sequences: Vec<u64> = export.entries.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![2, 3, 4]);
        assert_eq!(export.entries[0].record.tool, "tool_2");
        assert_eq!(export.anchor_hash, export.entries[0].prev_hash);
        assert_ne!(export.anchor_hash, JournalEntry::GENESIS_HASH);
        assert!(super::verify_chain_from(&export.anchor_hash, &export.entries));
        assert!(!super::verify_chain(&export.entries));
    }

    #[test]
    fn test_tampering_after_eviction_is_detected() {
        let journal = InMemoryJournal::with_capacity("session-g", 2);
        for i in 0..4 {
            journal.record(&make_record(&format!("tool_{i}"), true)).unwrap();
        }

        {
            let mut state = journal.state.lock().unwrap();
            state.entries[1].record.arguments = json!({ "category": "BLACK" });
        }

        assert!(!journal.verify_integrity());
    }

    #[test]
    fn test_default_capacity() {
        let journal = InMemoryJournal::new("session-h");
        assert_eq!(journal.capacity(), super::DEFAULT_JOURNAL_CAPACITY);
        assert_eq!(InMemoryJournal::with_capacity("session-i", 0).capacity(), 1);
    }
}
