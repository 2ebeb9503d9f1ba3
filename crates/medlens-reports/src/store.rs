//! Filesystem report store.
//!
//! Each report becomes two sibling files in the reports directory:
//!
//!   incident_<report_id>.json   pretty-printed JSON, 2-space indent
//!   incident_<report_id>.md     fixed Markdown template
//!
//! The files are written one after the other with no lock and no temp-file
//! rename. Two reports created in the same second share a stem, and the
//! later one overwrites the earlier.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::info;

use medlens_contracts::{
    error::{MedlensError, MedlensResult},
    report::{IncidentDetails, IncidentReport, PersistedReport},
};
use medlens_core::traits::{Clock, ReportSink, SystemClock};

use crate::markdown;

/// Default reports directory, relative to the working directory.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Writes incident reports under a single directory.
pub struct FileReportStore {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileReportStore {
    /// Open a store at `dir` using the system clock, creating the directory
    /// if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> MedlensResult<Self> {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    /// Open a store with an explicit clock.
    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> MedlensResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| MedlensError::ReportWriteFailed {
            path: dir.display().to_string(),
            reason: format!("cannot create reports directory: {e}"),
        })?;
        Ok(Self { dir, clock })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the JSON file for a given report id.
    pub fn json_path(&self, report_id: &str) -> PathBuf {
        self.dir.join(format!("incident_{report_id}.json"))
    }

    /// Path of the Markdown file for a given report id.
    pub fn markdown_path(&self, report_id: &str) -> PathBuf {
        self.dir.join(format!("incident_{report_id}.md"))
    }

    fn write(path: &Path, contents: &str) -> MedlensResult<()> {
        fs::write(path, contents).map_err(|e| MedlensError::ReportWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl ReportSink for FileReportStore {
    fn persist(&self, details: IncidentDetails) -> MedlensResult<PersistedReport> {
        let created_at = self.clock.now();
        let report = IncidentReport::new(&created_at, details);

        let json_path = self.json_path(&report.report_id);
        Self::write(&json_path, &serde_json::to_string_pretty(&report)?)?;

        let markdown_path = self.markdown_path(&report.report_id);
        Self::write(&markdown_path, &markdown::render(&report, &created_at))?;

        info!(
            report_id = %report.report_id,
            path = %json_path.display(),
            "incident report saved"
        );

        Ok(PersistedReport {
            report,
            json_path,
            markdown_path,
        })
    }
}
