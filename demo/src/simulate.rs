//! Scripted session for `demo simulate`.
//!
//! Walks through what a typical call produces:
//!   1. A user joins and is greeted
//!   2. The model classifies triage and coaches CPR
//!   3. An incident report is written to the reports directory
//!   4. The user leaves; the invocation journal is verified

use serde_json::json;

use medlens_agent::MedLensAgent;
use medlens_contracts::{
    error::MedlensResult,
    session::{Participant, SessionEvent},
    tool::ToolCall,
};

pub async fn run_session(agent: &MedLensAgent) -> MedlensResult<()> {
    println!();
    println!("MedLens — simulated session {}", agent.session_id());
    println!("Backend: {}", agent.backend().describe());
    println!("==========================================");

    let joined = SessionEvent::ParticipantJoined {
        participant: Participant::new("demo-user"),
    };
    println!("[join]    {:?}", agent.handle_event(&joined).await?);

    let script = [
        ToolCall::new(
            "classify_triage",
            json!({
                "category": "RED",
                "reasoning": "Adult collapsed, unresponsive, not breathing normally.",
                "recommended_action": "Call emergency services and start CPR."
            }),
        ),
        ToolCall::new(
            "call_emergency_services",
            json!({
                "situation_summary": "Adult collapsed in office, no normal breathing.",
                "severity": "critical",
                "number_of_injured": 1,
                "injuries_detected": "suspected cardiac arrest"
            }),
        ),
        ToolCall::new(
            "evaluate_cpr_form",
            json!({
                "hand_position": "center of chest",
                "arm_alignment": "elbows slightly bent",
                "compression_depth_estimate": "about 4 cm",
                "rhythm_assessment": "around 100 per minute",
                "overall_score": 6,
                "feedback": "Lock your elbows and push a little deeper."
            }),
        ),
        ToolCall::new(
            "generate_incident_report",
            json!({
                "patient_description": "Adult male, approx. 55, collapsed at desk",
                "triage_category": "RED",
                "injuries_observed": "No injuries; suspected cardiac arrest",
                "first_aid_provided": "CPR by coworker with live coaching",
                "outcome": "Paramedics took over care",
                "additional_notes": "Simulated session"
            }),
        ),
    ];

    for call in &script {
        let result = agent.dispatch(call).await?;
        println!("[tool]    {:<26} {}", call.name, result.message());
    }

    let left = SessionEvent::ParticipantLeft {
        participant: Participant::new("demo-user"),
    };
    println!("[leave]   {:?}", agent.handle_event(&left).await?);

    let export = agent.journal().export()?;
    println!();
    println!(
        "Journal: {} entries, {} succeeded, chain {}",
        export.entries.len(),
        export.succeeded(),
        if agent.journal().verify_integrity() { "intact" } else { "BROKEN" }
    );
    println!("Terminal hash: {}", export.terminal_hash);
    println!();
    Ok(())
}
