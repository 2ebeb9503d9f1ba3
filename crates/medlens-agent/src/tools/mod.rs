//! The five MedLens tools.
//!
//! Each tool is a [`TypedTool`](medlens_core::traits::TypedTool) with its own
//! input and output structs. Handlers check nothing beyond argument types:
//! empty strings, negative counts, out-of-range scores and unknown triage
//! categories all pass through to the result unchanged.

pub mod cpr;
pub mod emergency;
pub mod incident_log;
pub mod report;
pub mod triage;

use std::sync::Arc;

use medlens_core::{
    registry::ToolRegistry,
    traits::{Clock, ReportSink, Typed},
};

pub use cpr::CprFormTool;
pub use emergency::EmergencyServicesTool;
pub use incident_log::IncidentLogTool;
pub use report::IncidentReportTool;
pub use triage::TriageTool;

/// Registry holding all five tools in the order the model is shown them.
pub fn build_registry(reports: Arc<dyn ReportSink>, clock: Arc<dyn Clock>) -> ToolRegistry {
    ToolRegistry::new()
        .with(Typed::shared(EmergencyServicesTool))
        .with(Typed::shared(TriageTool))
        .with(Typed::shared(IncidentLogTool::new(clock)))
        .with(Typed::shared(IncidentReportTool::new(reports)))
        .with(Typed::shared(CprFormTool))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
