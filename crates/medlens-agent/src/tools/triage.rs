//! `classify_triage`: records the model's severity classification.
//!
//! The category is passed through as-is; GREEN/YELLOW/RED/BLACK is guidance
//! for the model, not a check.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use medlens_contracts::{error::MedlensResult, tool::ToolDescriptor};
use medlens_core::traits::TypedTool;

pub const NAME: &str = "classify_triage";

const DESCRIPTION: &str = "Classify triage severity. Categories: \
GREEN (minor), YELLOW (needs attention, stable), \
RED (life-threatening, urgent), BLACK (beyond first-aid help). \
Call this early in your assessment.";

#[derive(Debug, Deserialize)]
pub struct TriageInput {
    pub category: String,
    pub reasoning: String,
    pub recommended_action: String,
}

#[derive(Debug, Serialize)]
pub struct TriageOutcome {
    pub triage_category: String,
    pub reasoning: String,
    pub recommended_action: String,
    pub message: String,
}

pub struct TriageTool;

#[async_trait]
impl TypedTool for TriageTool {
    type Input = TriageInput;
    type Output = TriageOutcome;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(NAME, DESCRIPTION)
            .string_param("category")
            .string_param("reasoning")
            .string_param("recommended_action")
    }

    async fn run(&self, input: TriageInput) -> MedlensResult<TriageOutcome> {
        info!(category = %input.category, reasoning = %input.reasoning, "triage classified");

        Ok(TriageOutcome {
            message: format!("Triage: {}. {}", input.category, input.recommended_action),
            triage_category: input.category,
            reasoning: input.reasoning,
            recommended_action: input.recommended_action,
        })
    }
}
