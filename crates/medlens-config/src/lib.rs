//! # medlens-config
//!
//! Startup configuration for the MedLens agent.
//!
//! Settings come from `medlens.toml`; secrets come from a prioritized
//! [`CredentialChain`]. Both are folded into one [`AgentConfig`] that is
//! built once and passed down explicitly, so nothing downstream reads the
//! environment.
//!
//! ```rust,ignore
//! let config = AgentConfig::load(None, None)?;
//! tracing::info!(backend = %config.backend.describe(), "configuration resolved");
//! ```

pub mod backend;
pub mod credentials;
pub mod settings;

use std::path::{Path, PathBuf};

use tracing::info;

use medlens_contracts::error::MedlensResult;

pub use backend::{BackendKind, LlmBackend};
pub use credentials::{CredentialChain, CredentialSource, DotenvSource, EnvSource, MapSource};
pub use settings::{
    AgentUser, PoseSettings, Settings, SpeechSettings, WatcherSettings, DEFAULT_SETTINGS_PATH,
};

/// Dotenv file looked for in the working directory when none is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Stream Chat credentials for the mention watcher.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for ChatCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Everything the agent needs, resolved once.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub backend: LlmBackend,
    pub agent_user: AgentUser,
    pub reports_dir: PathBuf,
    pub instructions_path: PathBuf,
    pub speech: SpeechSettings,
    pub pose: PoseSettings,
    pub watcher: WatcherSettings,
    /// `None` when either Stream credential is missing.
    pub chat: Option<ChatCredentials>,
}

impl AgentConfig {
    /// Fold settings and credentials into a config.
    pub fn resolve(settings: Settings, credentials: &CredentialChain) -> Self {
        let backend = LlmBackend::select(credentials, &settings.gemini, &settings.mistral);

        let chat = match (
            credentials.get(credentials::STREAM_API_KEY),
            credentials.get(credentials::STREAM_API_SECRET),
        ) {
            (Some(api_key), Some(api_secret)) => Some(ChatCredentials {
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Self {
            backend,
            agent_user: settings.agent,
            reports_dir: settings.reports_dir,
            instructions_path: settings.instructions_path,
            speech: settings.speech,
            pose: settings.pose,
            watcher: settings.watcher,
            chat,
        }
    }

    /// Load settings and build the standard chain: settings `[credentials]`,
    /// then the process environment, then the env file.
    ///
    /// `env_file` must exist when given; the default `.env` is optional.
    pub fn load(settings_path: Option<&Path>, env_file: Option<&Path>) -> MedlensResult<Self> {
        let (settings, source) = Settings::load_or_default(settings_path)?;

        let mut chain = CredentialChain::new()
            .push(MapSource::from_table("settings", &settings.credentials))
            .push(EnvSource);
        let dotenv = match env_file {
            Some(path) => Some(DotenvSource::load(path)?),
            None => DotenvSource::load_optional(Path::new(DEFAULT_ENV_FILE))?,
        };
        if let Some(dotenv) = dotenv {
            chain = chain.push(dotenv);
        }

        let config = Self::resolve(settings, &chain);
        info!(
            settings = %source.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".to_string()),
            backend = %config.backend.describe(),
            chat_enabled = config.chat.is_some(),
            "configuration resolved"
        );
        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use medlens_contracts::error::MedlensError;

    use super::*;
    use crate::credentials::{GOOGLE_API_KEY, MISTRAL_API_KEY, STREAM_API_KEY, STREAM_API_SECRET};

    fn chain(source: MapSource) -> CredentialChain {
        CredentialChain::new().push(source)
    }

    // ── Backend selection ─────────────────────────────────────────────────────

    #[test]
    fn test_no_keys_selects_text_backend() {
        let config = AgentConfig::resolve(Settings::default(), &chain(MapSource::new("empty")));

        assert_eq!(config.backend.kind(), BackendKind::TextOnly);
        assert!(!config.backend.supports_vision());
        match &config.backend {
            LlmBackend::Mistral { model, base_url, api_key } => {
                assert_eq!(model, "mistral-small-latest");
                assert_eq!(base_url, "https://api.mistral.ai/v1");
                assert!(api_key.is_none());
            }
            other => panic!("expected Mistral, got {:?}", other),
        }
    }

    #[test]
    fn test_google_key_selects_vision_backend() {
        let source = MapSource::new("test")
            .with(GOOGLE_API_KEY, "g-key")
            .with(MISTRAL_API_KEY, "m-key");
        let config = AgentConfig::resolve(Settings::default(), &chain(source));

        assert_eq!(config.backend.kind(), BackendKind::VisionRealtime);
        assert!(config.backend.supports_vision());
        assert_eq!(
            config.backend,
            LlmBackend::GeminiRealtime {
                api_key: "g-key".to_string(),
                fps: 3
            }
        );
    }

    #[test]
    fn test_blank_google_key_is_ignored() {
        let source = MapSource::new("test")
            .with(GOOGLE_API_KEY, "  ")
            .with(MISTRAL_API_KEY, "m-key");
        let config = AgentConfig::resolve(Settings::default(), &chain(source));

        match config.backend {
            LlmBackend::Mistral { api_key, .. } => assert_eq!(api_key.as_deref(), Some("m-key")),
            other => panic!("expected Mistral, got {:?}", other),
        }
    }

    #[test]
    fn test_backend_debug_redacts_keys() {
        let backend = LlmBackend::GeminiRealtime {
            api_key: "super-secret".to_string(),
            fps: 3,
        };
        let rendered = format!("{:?}", backend);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("redacted"));
    }

    // ── Credential priority ───────────────────────────────────────────────────

    #[test]
    fn test_first_source_wins() {
        let chain = CredentialChain::new()
            .push(MapSource::new("high").with(MISTRAL_API_KEY, "from-high"))
            .push(MapSource::new("low").with(MISTRAL_API_KEY, "from-low").with(GOOGLE_API_KEY, "g"));

        assert_eq!(chain.get(MISTRAL_API_KEY).as_deref(), Some("from-high"));
        assert_eq!(chain.get(GOOGLE_API_KEY).as_deref(), Some("g"));
        assert_eq!(chain.source_names(), vec!["high", "low"]);
    }

    #[test]
    fn test_empty_value_falls_through() {
        let chain = CredentialChain::new()
            .push(MapSource::new("high").with(MISTRAL_API_KEY, ""))
            .push(MapSource::new("low").with(MISTRAL_API_KEY, "from-low"));
        assert_eq!(chain.get(MISTRAL_API_KEY).as_deref(), Some("from-low"));
    }

    #[test]
    fn test_chat_credentials_need_both_values() {
        let only_key = MapSource::new("t").with(STREAM_API_KEY, "k");
        assert!(AgentConfig::resolve(Settings::default(), &chain(only_key)).chat.is_none());

        let both = MapSource::new("t")
            .with(STREAM_API_KEY, "k")
            .with(STREAM_API_SECRET, "s");
        let chat = AgentConfig::resolve(Settings::default(), &chain(both)).chat.unwrap();
        assert_eq!(chat.api_key, "k");
        assert!(!format!("{:?}", chat).contains("\"s\""));
    }

    #[test]
    fn test_dotenv_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "MEDLENS_TEST_ONLY_KEY=from-file\n# comment\n").unwrap();

        let source = DotenvSource::load(&path).unwrap();
        assert_eq!(source.get("MEDLENS_TEST_ONLY_KEY").as_deref(), Some("from-file"));
        assert_eq!(source.name(), "dotenv");

        assert!(DotenvSource::load_optional(&dir.path().join("missing.env"))
            .unwrap()
            .is_none());
        assert!(matches!(
            DotenvSource::load(&dir.path().join("missing.env")),
            Err(MedlensError::ConfigError { .. })
        ));
    }

    // ── Settings ──────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_settings_are_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.reports_dir, PathBuf::from("reports"));
        assert_eq!(settings.agent.id, "medlens-agent");
        assert_eq!(settings.watcher.poll_interval_secs, 3);
        assert_eq!(settings.watcher.window, 5);
        assert_eq!(settings.pose.model_path, "yolo11n-pose.pt");
    }

    #[test]
    fn test_partial_settings_override_defaults() {
        let toml = r#"
            reports_dir = "/var/lib/medlens/reports"

            [agent]
            name = "Field Medic"

            [watcher]
            seen_capacity = 64

            [credentials]
            GOOGLE_API_KEY = "from-settings"
        "#;
        let settings = Settings::from_toml_str(toml).unwrap();

        assert_eq!(settings.reports_dir, PathBuf::from("/var/lib/medlens/reports"));
        assert_eq!(settings.agent.name, "Field Medic");
        assert_eq!(settings.agent.id, "medlens-agent");
        assert_eq!(settings.watcher.seen_capacity, 64);
        assert_eq!(settings.watcher.poll_interval_secs, 3);

        let credentials = CredentialChain::new()
            .push(MapSource::from_table("settings", &settings.credentials));
        let config = AgentConfig::resolve(settings, &credentials);
        assert!(config.backend.supports_vision());
    }

    #[test]
    fn test_settings_parse_error() {
        match Settings::from_toml_str("reports_dir = [") {
            Err(MedlensError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse settings TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_reads_explicit_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("medlens.toml");
        std::fs::write(&settings_path, "reports_dir = \"out\"\n").unwrap();
        let env_path = dir.path().join("test.env");
        std::fs::write(&env_path, "MEDLENS_UNUSED=1\n").unwrap();

        let config = AgentConfig::load(Some(&settings_path), Some(&env_path)).unwrap();
        assert_eq!(config.reports_dir, PathBuf::from("out"));
    }
}
