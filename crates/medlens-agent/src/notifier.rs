//! Reactions to call lifecycle events.
//!
//! Provider events only exist for the realtime vision backend; with the text
//! backend they are ignored. A participant joining triggers a spoken
//! greeting, a participant leaving is only logged, and anything about the
//! agent's own user is dropped.

use std::sync::Arc;

use tracing::{error, info};

use medlens_contracts::{error::MedlensResult, session::SessionEvent};
use medlens_core::traits::ResponseTrigger;

/// Instruction sent to the model when a user joins.
pub const GREETING_PROMPT: &str = "A user just joined the call. \
Greet them warmly, introduce yourself as MedLens AI, \
and mention you can see their camera, hear them, and help with \
emergency first aid, triage assessment, and CPR training. \
Ask how you can help. Keep it to 2-3 sentences.";

/// What the notifier did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A greeting was requested for this user.
    Greeted { user_id: String },
    /// The event was logged and nothing else.
    Logged,
    /// The event was not relevant.
    Ignored,
}

pub struct LifecycleNotifier {
    agent_user_id: String,
    provider_events: bool,
    trigger: Arc<dyn ResponseTrigger>,
}

impl LifecycleNotifier {
    /// `provider_events` should be true only for the vision backend.
    pub fn new(
        agent_user_id: impl Into<String>,
        provider_events: bool,
        trigger: Arc<dyn ResponseTrigger>,
    ) -> Self {
        Self {
            agent_user_id: agent_user_id.into(),
            provider_events,
            trigger,
        }
    }

    /// Handle one event. Only a failed greeting is an error.
    pub async fn handle(&self, event: &SessionEvent) -> MedlensResult<Notification> {
        match event {
            SessionEvent::ProviderConnected { model } if self.provider_events => {
                info!(%model, "connected to realtime model");
                Ok(Notification::Logged)
            }
            SessionEvent::ProviderError { error } if self.provider_events => {
                error!(%error, "realtime model error");
                Ok(Notification::Logged)
            }
            SessionEvent::ProviderConnected { .. } | SessionEvent::ProviderError { .. } => {
                Ok(Notification::Ignored)
            }
            SessionEvent::ParticipantJoined { participant } => {
                if participant.user_id == self.agent_user_id {
                    return Ok(Notification::Ignored);
                }
                info!(user_id = %participant.user_id, "participant joined");
                self.trigger.simple_response(GREETING_PROMPT).await?;
                Ok(Notification::Greeted {
                    user_id: participant.user_id.clone(),
                })
            }
            SessionEvent::ParticipantLeft { participant } => {
                if participant.user_id == self.agent_user_id {
                    return Ok(Notification::Ignored);
                }
                info!(user_id = %participant.user_id, "participant left");
                Ok(Notification::Logged)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
