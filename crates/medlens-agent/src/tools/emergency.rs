//! `call_emergency_services`: emergency briefing.
//!
//! No real dispatch happens. The call is logged at warn level so it stands
//! out in the session log, and the model is told help is on the way.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use medlens_contracts::{error::MedlensResult, tool::ToolDescriptor};
use medlens_core::traits::TypedTool;

pub const NAME: &str = "call_emergency_services";

const DESCRIPTION: &str = "Call emergency services (911) with a situation briefing. \
Use ONLY for genuinely life-threatening emergencies: \
cardiac arrest, severe bleeding, anaphylaxis, stroke, \
unconscious person not breathing, severe burns.";

#[derive(Debug, Deserialize)]
pub struct EmergencyBriefing {
    pub situation_summary: String,
    pub severity: String,
    pub number_of_injured: i64,
    pub injuries_detected: String,
}

#[derive(Debug, Serialize)]
pub struct EmergencyAck {
    pub status: String,
    pub severity: String,
    pub situation: String,
    pub injuries: String,
    pub injured_count: i64,
    pub message: String,
}

pub struct EmergencyServicesTool;

#[async_trait]
impl TypedTool for EmergencyServicesTool {
    type Input = EmergencyBriefing;
    type Output = EmergencyAck;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(NAME, DESCRIPTION)
            .string_param("situation_summary")
            .string_param("severity")
            .integer_param("number_of_injured")
            .string_param("injuries_detected")
    }

    async fn run(&self, input: EmergencyBriefing) -> MedlensResult<EmergencyAck> {
        warn!(
            severity = %input.severity,
            injured = input.number_of_injured,
            situation = %input.situation_summary,
            "EMERGENCY"
        );

        Ok(EmergencyAck {
            status: "emergency_services_notified".to_string(),
            message: format!(
                "Emergency services notified. Severity: {}. Continue first aid until help arrives.",
                input.severity
            ),
            severity: input.severity,
            situation: input.situation_summary,
            injuries: input.injuries_detected,
            injured_count: input.number_of_injured,
        })
    }
}
