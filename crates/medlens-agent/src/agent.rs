//! `MedLensAgent`: everything one call session needs, built from an
//! [`AgentConfig`].

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use medlens_audit::InMemoryJournal;
use medlens_config::{AgentConfig, LlmBackend};
use medlens_contracts::{
    error::MedlensResult,
    session::{SessionEvent, SessionId},
    tool::{ToolCall, ToolDescriptor, ToolInvocationResult},
};
use medlens_core::{
    dispatcher::Dispatcher,
    traits::{ChatSource, Clock, ResponseTrigger, SystemClock},
};
use medlens_reports::FileReportStore;
use medlens_verify::SchemaArgumentVerifier;

use crate::{
    chat::{ChatMentionWatcher, StreamChatSource, WatcherHandle},
    notifier::{LifecycleNotifier, Notification},
    tools,
};

pub struct MedLensAgent {
    session_id: SessionId,
    config: AgentConfig,
    dispatcher: Dispatcher,
    journal: Arc<InMemoryJournal>,
    notifier: LifecycleNotifier,
    trigger: Arc<dyn ResponseTrigger>,
}

impl MedLensAgent {
    /// Assemble an agent using the system clock. Creates the reports
    /// directory.
    pub fn new(config: AgentConfig, trigger: Arc<dyn ResponseTrigger>) -> MedlensResult<Self> {
        Self::with_clock(config, trigger, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: AgentConfig,
        trigger: Arc<dyn ResponseTrigger>,
        clock: Arc<dyn Clock>,
    ) -> MedlensResult<Self> {
        let session_id = SessionId::new();
        let store = FileReportStore::with_clock(&config.reports_dir, clock.clone())?;
        let journal = Arc::new(InMemoryJournal::new(session_id.to_string()));

        let dispatcher = Dispatcher::new(
            tools::build_registry(Arc::new(store), clock),
            Box::new(SchemaArgumentVerifier::new()),
            journal.clone(),
        );
        let notifier = LifecycleNotifier::new(
            config.agent_user.id.clone(),
            config.backend.supports_vision(),
            trigger.clone(),
        );

        info!(
            session_id = %session_id,
            agent = %config.agent_user.name,
            backend = %config.backend.describe(),
            tools = dispatcher.registry().len(),
            "agent assembled"
        );

        Ok(Self {
            session_id,
            config,
            dispatcher,
            journal,
            notifier,
            trigger,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.config.backend
    }

    /// Descriptors of the five tools.
    pub fn tools(&self) -> Vec<ToolDescriptor> {
        self.dispatcher.descriptors()
    }

    /// Tool declarations in OpenAI function format.
    pub fn tool_declarations(&self) -> Vec<Value> {
        self.tools().iter().map(ToolDescriptor::function_declaration).collect()
    }

    pub async fn dispatch(&self, call: &ToolCall) -> MedlensResult<ToolInvocationResult> {
        self.dispatcher.dispatch(call).await
    }

    pub async fn handle_event(&self, event: &SessionEvent) -> MedlensResult<Notification> {
        self.notifier.handle(event).await
    }

    pub fn journal(&self) -> &InMemoryJournal {
        &self.journal
    }

    /// Watch `call_id`'s chat channel through `source`.
    pub fn spawn_chat_watcher(&self, call_id: &str, source: Arc<dyn ChatSource>) -> WatcherHandle {
        ChatMentionWatcher::new(
            call_id,
            self.config.agent_user.id.clone(),
            source,
            self.trigger.clone(),
            &self.config.watcher,
        )
        .spawn()
    }

    /// Watch `call_id`'s chat channel on Stream. Fails with `ConfigError`
    /// when Stream credentials are missing.
    pub fn spawn_stream_chat_watcher(&self, call_id: &str) -> MedlensResult<WatcherHandle> {
        let source = StreamChatSource::from_config(&self.config)?;
        Ok(self.spawn_chat_watcher(call_id, Arc::new(source)))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;

    use medlens_config::{AgentConfig, CredentialChain, MapSource, Settings};
    use medlens_contracts::{
        error::{MedlensError, MedlensResult},
        session::{ChatMessage, Participant, SessionEvent},
        tool::ToolCall,
    };
    use medlens_core::traits::{ChatSource, FixedClock, ResponseTrigger};

    use super::MedLensAgent;
    use crate::{chat::WatcherHealth, notifier::Notification};

    #[derive(Default)]
    struct RecordingTrigger {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ResponseTrigger for RecordingTrigger {
        async fn simple_response(&self, text: &str) -> MedlensResult<()> {
            self.prompts.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct OneMessage;

    #[async_trait]
    impl ChatSource for OneMessage {
        async fn recent_messages(&self, _channel_id: &str) -> MedlensResult<Vec<ChatMessage>> {
            Ok(vec![ChatMessage::new("c1", "@Agent how do I do CPR?", "alice")])
        }
    }

    fn config(dir: &std::path::Path, credentials: MapSource) -> AgentConfig {
        let settings = Settings {
            reports_dir: dir.join("reports"),
            watcher: medlens_config::WatcherSettings {
                poll_interval_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        AgentConfig::resolve(settings, &CredentialChain::new().push(credentials))
    }

    fn agent(dir: &std::path::Path, credentials: MapSource) -> (MedLensAgent, Arc<RecordingTrigger>) {
        let trigger = Arc::new(RecordingTrigger::default());
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(14, 0, 0).unwrap(),
        ));
        let agent = MedLensAgent::with_clock(config(dir, credentials), trigger.clone(), clock).unwrap();
        (agent, trigger)
    }

    #[test]
    fn test_tool_declarations() {
        let dir = tempfile::tempdir().unwrap();
        let (agent, _) = agent(dir.path(), MapSource::new("none"));

        let declarations = agent.tool_declarations();
        assert_eq!(declarations.len(), 5);
        assert_eq!(declarations[0]["function"]["name"], json!("call_emergency_services"));
        assert_eq!(
            declarations[4]["function"]["parameters"]["properties"]["overall_score"],
            json!({ "type": "integer" })
        );
        assert!(dir.path().join("reports").is_dir());
    }

    #[tokio::test]
    async fn test_provider_logging_follows_backend() {
        let dir = tempfile::tempdir().unwrap();
        let connected = SessionEvent::ProviderConnected {
            model: "gemini".to_string(),
        };

        let (text_agent, _) = agent(dir.path(), MapSource::new("none"));
        assert!(!text_agent.backend().supports_vision());
        assert_eq!(text_agent.handle_event(&connected).await.unwrap(), Notification::Ignored);

        let (vision_agent, _) = agent(dir.path(), MapSource::new("keys").with("GOOGLE_API_KEY", "g"));
        assert!(vision_agent.backend().supports_vision());
        assert_eq!(vision_agent.handle_event(&connected).await.unwrap(), Notification::Logged);
    }

    #[tokio::test]
    async fn test_stream_watcher_needs_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let (agent, _) = agent(dir.path(), MapSource::new("none"));
        assert!(matches!(
            agent.spawn_stream_chat_watcher("call-1"),
            Err(MedlensError::ConfigError { .. })
        ));
    }

    /// A whole session: greet, triage, CPR, report, chat mention, leave.
    #[tokio::test]
    async fn test_session_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let (agent, trigger) = agent(dir.path(), MapSource::new("none"));

        let joined = SessionEvent::ParticipantJoined {
            participant: Participant::new("alice"),
        };
        assert!(matches!(agent.handle_event(&joined).await.unwrap(), Notification::Greeted { .. }));

        agent
            .dispatch(&ToolCall::new(
                "classify_triage",
                json!({ "category": "RED", "reasoning": "not breathing", "recommended_action": "Start CPR now." }),
            ))
            .await
            .unwrap();
        agent
            .dispatch(&ToolCall::new(
                "evaluate_cpr_form",
                json!({
                    "hand_position": "good",
                    "arm_alignment": "good",
                    "compression_depth_estimate": "adequate",
                    "rhythm_assessment": "slightly fast",
                    "overall_score": 7,
                    "feedback": "Slow down a little."
                }),
            ))
            .await
            .unwrap();
        let report = agent
            .dispatch(&ToolCall::new(
                "generate_incident_report",
                json!({
                    "patient_description": "man, 70s",
                    "triage_category": "RED",
                    "injuries_observed": "cardiac arrest",
                    "first_aid_provided": "CPR",
                    "outcome": "handed over to paramedics",
                    "additional_notes": ""
                }),
            ))
            .await
            .unwrap();
        assert_eq!(report.get("report_id"), Some(&json!("20250701_140000")));

        let bad = agent.dispatch(&ToolCall::new("order_pizza", json!({}))).await;
        assert!(matches!(bad, Err(MedlensError::UnknownTool { .. })));
        let wrong_type = agent
            .dispatch(&ToolCall::new(
                "evaluate_cpr_form",
                json!({
                    "hand_position": "x",
                    "arm_alignment": "x",
                    "compression_depth_estimate": "x",
                    "rhythm_assessment": "x",
                    "overall_score": "seven",
                    "feedback": "x"
                }),
            ))
            .await;
        assert!(matches!(wrong_type, Err(MedlensError::InvalidArguments { .. })));

        let handle = agent.spawn_chat_watcher("call-1", Arc::new(OneMessage));
        let mut rx = handle.subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|h| *h == WatcherHealth::Healthy))
            .await
            .unwrap()
            .unwrap();
        handle.shutdown().await.unwrap();

        let left = SessionEvent::ParticipantLeft {
            participant: Participant::new("alice"),
        };
        assert_eq!(agent.handle_event(&left).await.unwrap(), Notification::Logged);

        let prompts = trigger.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].starts_with("A user just joined the call."));
        assert_eq!(prompts[1], "The user typed this in chat: 'how do I do CPR?'. Respond helpfully.");

        let export = agent.journal().export().unwrap();
        assert_eq!(export.entries.len(), 5);
        assert_eq!(export.succeeded(), 3);
        assert!(agent.journal().verify_integrity());
    }
}
