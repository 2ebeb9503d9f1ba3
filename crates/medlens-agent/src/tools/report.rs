//! `generate_incident_report`: the only tool with a side effect that can fail.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use medlens_contracts::{error::MedlensResult, report::IncidentDetails, tool::ToolDescriptor};
use medlens_core::traits::{ReportSink, TypedTool};

pub const NAME: &str = "generate_incident_report";

const DESCRIPTION: &str = "Generate a structured incident report summarizing the triage session. \
Call this when the user asks for a report, or when the session is ending. \
Include all relevant details about what was observed and actions taken.";

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub patient_description: String,
    pub triage_category: String,
    pub injuries_observed: String,
    pub first_aid_provided: String,
    pub outcome: String,
    pub additional_notes: String,
}

impl From<ReportRequest> for IncidentDetails {
    fn from(r: ReportRequest) -> Self {
        IncidentDetails {
            patient_description: r.patient_description,
            triage_category: r.triage_category,
            injuries_observed: r.injuries_observed,
            first_aid_provided: r.first_aid_provided,
            outcome: r.outcome,
            additional_notes: r.additional_notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportSaved {
    pub status: String,
    pub report_id: String,
    /// Path of the JSON file.
    pub file: String,
    pub message: String,
}

pub struct IncidentReportTool {
    sink: Arc<dyn ReportSink>,
}

impl IncidentReportTool {
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl TypedTool for IncidentReportTool {
    type Input = ReportRequest;
    type Output = ReportSaved;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(NAME, DESCRIPTION)
            .string_param("patient_description")
            .string_param("triage_category")
            .string_param("injuries_observed")
            .string_param("first_aid_provided")
            .string_param("outcome")
            .string_param("additional_notes")
    }

    async fn run(&self, input: ReportRequest) -> MedlensResult<ReportSaved> {
        let saved = self.sink.persist(input.into())?;
        let report_id = saved.report.report_id;

        Ok(ReportSaved {
            status: "report_generated".to_string(),
            message: format!("Incident report {report_id} has been saved."),
            file: saved.json_path.display().to_string(),
            report_id,
        })
    }
}
