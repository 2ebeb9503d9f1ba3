//! Language-model backend selection.
//!
//! Resolved exactly once at startup. A Google key selects the realtime vision
//! model, which watches the video stream itself; otherwise the text model is
//! used and only sees pose keypoints.

use crate::{
    credentials::{CredentialChain, GOOGLE_API_KEY, MISTRAL_API_KEY},
    settings::{GeminiSettings, MistralSettings},
};

/// Coarse capability class of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Sees video frames directly.
    VisionRealtime,
    /// Text in, text out.
    TextOnly,
}

/// The configured language-model backend.
#[derive(Clone, PartialEq)]
pub enum LlmBackend {
    /// Gemini Realtime over the Google API.
    GeminiRealtime { api_key: String, fps: u32 },
    /// Mistral through its OpenAI-compatible endpoint. The key may be absent,
    /// in which case the provider rejects requests at call time.
    Mistral {
        model: String,
        base_url: String,
        api_key: Option<String>,
    },
}

impl LlmBackend {
    /// Pick a backend from resolved credentials.
    pub fn select(
        credentials: &CredentialChain,
        gemini: &GeminiSettings,
        mistral: &MistralSettings,
    ) -> Self {
        match credentials.get(GOOGLE_API_KEY) {
            Some(api_key) => LlmBackend::GeminiRealtime {
                api_key,
                fps: gemini.fps,
            },
            None => LlmBackend::Mistral {
                model: mistral.model.clone(),
                base_url: mistral.base_url.clone(),
                api_key: credentials.get(MISTRAL_API_KEY),
            },
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            LlmBackend::GeminiRealtime { .. } => BackendKind::VisionRealtime,
            LlmBackend::Mistral { .. } => BackendKind::TextOnly,
        }
    }

    /// True when the backend emits provider connection/error events.
    pub fn supports_vision(&self) -> bool {
        self.kind() == BackendKind::VisionRealtime
    }

    /// One-line description for startup logs.
    pub fn describe(&self) -> String {
        match self {
            LlmBackend::GeminiRealtime { fps, .. } => {
                format!("Gemini Realtime (vision mode, {fps} fps)")
            }
            LlmBackend::Mistral { model, .. } => {
                format!("Mistral {model} (text mode, pose data only)")
            }
        }
    }
}

impl std::fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmBackend::GeminiRealtime { fps, .. } => f
                .debug_struct("GeminiRealtime")
                .field("api_key", &"<redacted>")
                .field("fps", fps)
                .finish(),
            LlmBackend::Mistral {
                model,
                base_url,
                api_key,
            } => f
                .debug_struct("Mistral")
                .field("model", model)
                .field("base_url", base_url)
                .field("api_key", &api_key.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}
