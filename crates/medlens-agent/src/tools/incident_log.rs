//! `log_incident`: a timestamped log line, nothing persisted.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use medlens_contracts::{error::MedlensResult, report::REPORT_TIMESTAMP_FORMAT, tool::ToolDescriptor};
use medlens_core::traits::{Clock, TypedTool};

pub const NAME: &str = "log_incident";

const DESCRIPTION: &str = "Log an incident for record keeping. \
Use after assessing a situation to create a structured record.";

#[derive(Debug, Deserialize)]
pub struct IncidentEntry {
    pub incident_type: String,
    pub severity: String,
    pub description: String,
    pub actions_taken: String,
}

#[derive(Debug, Serialize)]
pub struct IncidentLogged {
    pub status: String,
    pub timestamp: String,
    pub incident_type: String,
    pub severity: String,
    pub message: String,
}

pub struct IncidentLogTool {
    clock: Arc<dyn Clock>,
}

impl IncidentLogTool {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl TypedTool for IncidentLogTool {
    type Input = IncidentEntry;
    type Output = IncidentLogged;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(NAME, DESCRIPTION)
            .string_param("incident_type")
            .string_param("severity")
            .string_param("description")
            .string_param("actions_taken")
    }

    async fn run(&self, input: IncidentEntry) -> MedlensResult<IncidentLogged> {
        let timestamp = self.clock.now().format(REPORT_TIMESTAMP_FORMAT).to_string();
        info!(
            %timestamp,
            severity = %input.severity,
            incident_type = %input.incident_type,
            description = %input.description,
            actions_taken = %input.actions_taken,
            "incident logged"
        );

        Ok(IncidentLogged {
            status: "logged".to_string(),
            message: format!("Incident logged at {timestamp}."),
            timestamp,
            incident_type: input.incident_type,
            severity: input.severity,
        })
    }
}
