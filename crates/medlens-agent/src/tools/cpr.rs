//! `evaluate_cpr_form`: CPR coaching feedback built from pose keypoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use medlens_contracts::{error::MedlensResult, tool::ToolDescriptor};
use medlens_core::traits::TypedTool;

pub const NAME: &str = "evaluate_cpr_form";

const DESCRIPTION: &str = "Evaluate CPR technique based on YOLO pose keypoints. \
Call this when the user is practicing CPR and you can see their body position. \
Analyze: hand placement (center of chest), arm position (elbows locked straight), \
compression depth (estimated from shoulder-wrist distance changes), \
and rhythm (target 100-120 compressions per minute). \
Provide specific, actionable feedback.";

#[derive(Debug, Deserialize)]
pub struct CprObservation {
    pub hand_position: String,
    pub arm_alignment: String,
    pub compression_depth_estimate: String,
    pub rhythm_assessment: String,
    /// Nominally 0-10, not enforced.
    pub overall_score: i64,
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct CprEvaluation {
    pub hand_position: String,
    pub arm_alignment: String,
    pub compression_depth: String,
    pub rhythm: String,
    pub score: i64,
    pub feedback: String,
    pub message: String,
}

pub struct CprFormTool;

#[async_trait]
impl TypedTool for CprFormTool {
    type Input = CprObservation;
    type Output = CprEvaluation;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(NAME, DESCRIPTION)
            .string_param("hand_position")
            .string_param("arm_alignment")
            .string_param("compression_depth_estimate")
            .string_param("rhythm_assessment")
            .integer_param("overall_score")
            .string_param("feedback")
    }

    async fn run(&self, input: CprObservation) -> MedlensResult<CprEvaluation> {
        info!(score = input.overall_score, feedback = %input.feedback, "CPR evaluated");

        Ok(CprEvaluation {
            message: format!("CPR score: {}/10. {}", input.overall_score, input.feedback),
            hand_position: input.hand_position,
            arm_alignment: input.arm_alignment,
            compression_depth: input.compression_depth_estimate,
            rhythm: input.rhythm_assessment,
            score: input.overall_score,
            feedback: input.feedback,
        })
    }
}
