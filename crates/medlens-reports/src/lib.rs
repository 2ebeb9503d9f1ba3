//! # medlens-reports
//!
//! Incident report persistence for the MedLens agent.
//!
//! [`FileReportStore`] implements [`medlens_core::traits::ReportSink`]: a
//! report is stamped from the store's clock, written as JSON, rendered as
//! Markdown, and never read back.
//!
//! ```rust,ignore
//! use medlens_reports::FileReportStore;
//!
//! let store = FileReportStore::open("reports")?;
//! let saved = store.persist(details)?;
//! println!("{}", saved.json_path.display());
//! ```

pub mod markdown;
pub mod store;

pub use store::{FileReportStore, DEFAULT_REPORTS_DIR};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use chrono::{NaiveDate, NaiveDateTime};

    use medlens_contracts::{
        error::MedlensError,
        report::{IncidentDetails, IncidentReport},
    };
    use medlens_core::traits::{FixedClock, ReportSink};

    use super::FileReportStore;

    fn at(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 14)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    fn details(outcome: &str) -> IncidentDetails {
        IncidentDetails {
            patient_description: "woman in her 60s, conscious".to_string(),
            triage_category: "YELLOW".to_string(),
            injuries_observed: "suspected wrist fracture\nabrasion on left knee".to_string(),
            first_aid_provided: "splinted wrist with magazine".to_string(),
            outcome: outcome.to_string(),
            additional_notes: "patient declined ambulance".to_string(),
        }
    }

    // ── JSON + Markdown pair ──────────────────────────────────────────────────

    /// The JSON file holds exactly the inputs plus report_id and timestamp.
    #[test]
    fn test_json_file_matches_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::new(at(9, 5, 7, 250_000)));
        let store = FileReportStore::with_clock(dir.path().join("reports"), clock).unwrap();

        let saved = store.persist(details("referred to urgent care")).unwrap();

        assert_eq!(saved.report.report_id, "20250614_090507");
        assert_eq!(
            saved.json_path,
            dir.path().join("reports").join("incident_20250614_090507.json")
        );

        let raw = fs::read_to_string(&saved.json_path).unwrap();
        let parsed: IncidentReport = serde_json::from_str(&raw).unwrap();
        let expected = details("referred to urgent care");

        assert_eq!(parsed.report_id, "20250614_090507");
        assert_eq!(parsed.timestamp, "2025-06-14T09:05:07.250000");
        assert_eq!(parsed.patient_description, expected.patient_description);
        assert_eq!(parsed.triage_category, expected.triage_category);
        assert_eq!(parsed.injuries_observed, expected.injuries_observed);
        assert_eq!(parsed.first_aid_provided, expected.first_aid_provided);
        assert_eq!(parsed.outcome, expected.outcome);
        assert_eq!(parsed.additional_notes, expected.additional_notes);

        // Exactly eight keys, indented by two spaces.
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 8);
        assert!(raw.starts_with("{\n  \"report_id\": \"20250614_090507\""), "got: {raw}");
    }

    /// The Markdown sibling carries the table and all four section bodies.
    #[test]
    fn test_markdown_file_contains_sections_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::new(at(9, 5, 7, 0)));
        let store = FileReportStore::with_clock(dir.path(), clock).unwrap();

        let saved = store.persist(details("stable on departure")).unwrap();
        assert_eq!(saved.markdown_path, dir.path().join("incident_20250614_090507.md"));

        let md = fs::read_to_string(&saved.markdown_path).unwrap();
        let d = details("stable on departure");

        assert!(md.starts_with("# Incident Report — 20250614_090507\n"));
        assert!(md.contains("| **Time** | 2025-06-14 09:05:07 |"));
        assert!(md.contains("| **Triage** | YELLOW |"));
        assert!(md.contains("| **Patient** | woman in her 60s, conscious |"));
        assert!(md.contains(&format!("## Injuries Observed\n{}\n", d.injuries_observed)));
        assert!(md.contains(&format!("## First Aid Provided\n{}\n", d.first_aid_provided)));
        assert!(md.contains(&format!("## Outcome\n{}\n", d.outcome)));
        assert!(md.contains(&format!("## Notes\n{}\n", d.additional_notes)));

        let order: Vec<usize> = ["## Injuries Observed", "## First Aid Provided", "## Outcome", "## Notes"]
            .iter()
            .map(|h| md.find(h).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    // ── Same-second collision ─────────────────────────────────────────────────

    /// Two reports within one second share a stem; the second overwrites the
    /// first and only one pair of files remains.
    #[test]
    fn test_same_second_reports_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::new(at(12, 0, 0, 100)));
        let store = FileReportStore::with_clock(dir.path(), clock.clone()).unwrap();

        let first = store.persist(details("first outcome")).unwrap();
        clock.set(at(12, 0, 0, 900_000));
        let second = store.persist(details("second outcome")).unwrap();

        assert_eq!(first.report.report_id, second.report.report_id);
        assert_eq!(first.json_path, second.json_path);

        let parsed: IncidentReport =
            serde_json::from_str(&fs::read_to_string(&second.json_path).unwrap()).unwrap();
        assert_eq!(parsed.outcome, "second outcome");
        assert_eq!(parsed.timestamp, "2025-06-14T12:00:00.900000");

        let md = fs::read_to_string(&second.markdown_path).unwrap();
        assert!(md.contains("second outcome"));
        assert!(!md.contains("first outcome"));

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_next_second_gets_new_files() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::new(at(12, 0, 0, 0)));
        let store = FileReportStore::with_clock(dir.path(), clock.clone()).unwrap();

        store.persist(details("a")).unwrap();
        clock.set(at(12, 0, 1, 0));
        store.persist(details("b")).unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 4);
    }

    // ── Failures ──────────────────────────────────────────────────────────────

    #[test]
    fn test_open_fails_when_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("reports");
        fs::write(&blocker, "not a directory").unwrap();

        match FileReportStore::open(&blocker) {
            Err(MedlensError::ReportWriteFailed { path, .. }) => {
                assert!(path.contains("reports"));
            }
            Ok(_) => panic!("expected ReportWriteFailed, got a store"),
            Err(other) => panic!("expected ReportWriteFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_write_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let clock = Arc::new(FixedClock::new(at(8, 0, 0, 0)));
        let store = FileReportStore::with_clock(&reports, clock).unwrap();

        // Pull the directory out from under the store.
        fs::remove_dir_all(&reports).unwrap();

        let err = store.persist(details("x")).unwrap_err();
        match err {
            MedlensError::ReportWriteFailed { path, .. } => assert!(path.ends_with(".json")),
            other => panic!("expected ReportWriteFailed, got {:?}", other),
        }
    }
}
