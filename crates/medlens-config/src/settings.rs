//! Non-secret settings loaded from `medlens.toml`.
//!
//! Every field has a default, so an absent file and an empty file mean the
//! same thing. Example:
//!
//! ```toml
//! reports_dir = "reports"
//!
//! [agent]
//! id = "medlens-agent"
//! name = "MedLens AI"
//!
//! [mistral]
//! model = "mistral-small-latest"
//!
//! [watcher]
//! poll_interval_secs = 3
//! seen_capacity = 512
//!
//! [credentials]
//! MISTRAL_API_KEY = "..."
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use medlens_contracts::error::{MedlensError, MedlensResult};

/// Settings file looked for in the working directory when none is given.
pub const DEFAULT_SETTINGS_PATH: &str = "medlens.toml";

/// The identity the agent joins calls as.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentUser {
    pub id: String,
    pub name: String,
}

impl Default for AgentUser {
    fn default() -> Self {
        Self {
            id: "medlens-agent".to_string(),
            name: "MedLens AI".to_string(),
        }
    }
}

/// Vision backend tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// Video frames per second forwarded to the model.
    pub fps: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self { fps: 3 }
    }
}

/// Text backend tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MistralSettings {
    pub model: String,
    pub base_url: String,
}

impl Default for MistralSettings {
    fn default() -> Self {
        Self {
            model: "mistral-small-latest".to_string(),
            base_url: "https://api.mistral.ai/v1".to_string(),
        }
    }
}

/// Speech collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub tts_model: String,
    pub eager_turn_detection: bool,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            tts_model: "eleven_flash_v2_5".to_string(),
            eager_turn_detection: true,
        }
    }
}

/// Pose-estimation processor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PoseSettings {
    pub model_path: String,
    pub fps: u32,
    pub conf_threshold: f32,
}

impl Default for PoseSettings {
    fn default() -> Self {
        Self {
            model_path: "yolo11n-pose.pt".to_string(),
            fps: 5,
            conf_threshold: 0.5,
        }
    }
}

/// Chat mention watcher tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatcherSettings {
    pub poll_interval_secs: u64,
    /// How many of the newest messages are inspected per poll.
    pub window: usize,
    pub seen_capacity: usize,
    pub seen_ttl_secs: u64,
    /// Consecutive failed polls before the watcher reports itself degraded.
    pub max_consecutive_failures: u32,
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
    pub backoff_multiplier: f64,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3,
            window: 5,
            seen_capacity: 512,
            seen_ttl_secs: 600,
            max_consecutive_failures: 5,
            initial_backoff_secs: 3,
            max_backoff_secs: 60,
            backoff_multiplier: 2.0,
        }
    }
}

/// Top-level structure deserialized from `medlens.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reports_dir: PathBuf,
    pub instructions_path: PathBuf,
    pub agent: AgentUser,
    pub gemini: GeminiSettings,
    pub mistral: MistralSettings,
    pub speech: SpeechSettings,
    pub pose: PoseSettings,
    pub watcher: WatcherSettings,
    /// Highest-priority credential source.
    pub credentials: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            instructions_path: PathBuf::from("agent/medlens_instructions.md"),
            agent: AgentUser::default(),
            gemini: GeminiSettings::default(),
            mistral: MistralSettings::default(),
            speech: SpeechSettings::default(),
            pose: PoseSettings::default(),
            watcher: WatcherSettings::default(),
            credentials: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string.
    pub fn from_toml_str(s: &str) -> MedlensResult<Self> {
        toml::from_str(s).map_err(|e| MedlensError::ConfigError {
            reason: format!("failed to parse settings TOML: {e}"),
        })
    }

    /// Read and parse the settings file at `path`.
    pub fn from_file(path: &Path) -> MedlensResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedlensError::ConfigError {
            reason: format!("failed to read settings file '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if given, otherwise `medlens.toml` if it exists, otherwise
    /// defaults. Returns the path actually read, if any.
    pub fn load_or_default(path: Option<&Path>) -> MedlensResult<(Self, Option<PathBuf>)> {
        if let Some(path) = path {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }
        let default_path = PathBuf::from(DEFAULT_SETTINGS_PATH);
        if default_path.exists() {
            let settings = Self::from_file(&default_path)?;
            Ok((settings, Some(default_path)))
        } else {
            Ok((Self::default(), None))
        }
    }
}
