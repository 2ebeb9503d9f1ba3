//! Incident report records.
//!
//! `IncidentReport` is the only entity MedLens persists. One is created per
//! `generate_incident_report` call, written to disk immediately, and never
//! touched again.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// `strftime` pattern for report ids, e.g. `20250301_142233`.
pub const REPORT_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// ISO-8601 pattern for the report `timestamp` field.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Derive the report id for a creation instant.
///
/// Second granularity: two reports created within the same second share an id.
pub fn report_id_for(at: &NaiveDateTime) -> String {
    at.format(REPORT_ID_FORMAT).to_string()
}

/// The free-text fields the model supplies for a report.
///
/// Nothing here is validated. `triage_category` is nominally one of
/// GREEN / YELLOW / RED / BLACK but any string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentDetails {
    pub patient_description: String,
    pub triage_category: String,
    pub injuries_observed: String,
    pub first_aid_provided: String,
    pub outcome: String,
    pub additional_notes: String,
}

/// A persisted incident report. Field order matches the JSON file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub report_id: String,
    pub timestamp: String,
    pub patient_description: String,
    pub triage_category: String,
    pub injuries_observed: String,
    pub first_aid_provided: String,
    pub outcome: String,
    pub additional_notes: String,
}

impl IncidentReport {
    /// Build a report created at `at`.
    pub fn new(at: &NaiveDateTime, details: IncidentDetails) -> Self {
        Self {
            report_id: report_id_for(at),
            timestamp: at.format(REPORT_TIMESTAMP_FORMAT).to_string(),
            patient_description: details.patient_description,
            triage_category: details.triage_category,
            injuries_observed: details.injuries_observed,
            first_aid_provided: details.first_aid_provided,
            outcome: details.outcome,
            additional_notes: details.additional_notes,
        }
    }

    /// The file stem shared by the JSON and Markdown renderings.
    pub fn file_stem(&self) -> String {
        format!("incident_{}", self.report_id)
    }
}

/// Where a report ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReport {
    pub report: IncidentReport,
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
}
