//! Stream Chat REST implementation of [`ChatSource`].
//!
//! Queries the `messaging` channel whose id is the call id, asking for its
//! state so the response carries the channel's recent messages. Requests are
//! authenticated with a server-side JWT signed by the API secret.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::Sha256;
use tracing::debug;

use medlens_config::{AgentConfig, ChatCredentials};
use medlens_contracts::{
    error::{MedlensError, MedlensResult},
    session::ChatMessage,
};
use medlens_core::traits::ChatSource;

pub const STREAM_CHAT_BASE_URL: &str = "https://chat.stream-io-api.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HS256 token with `{"server": true}` claims.
pub fn server_token(api_secret: &str) -> MedlensResult<String> {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(br#"{"server":true}"#);
    let signing_input = format!("{header}.{claims}");

    let mut mac = Hmac::<Sha256>::new_from_slice(api_secret.as_bytes()).map_err(|e| {
        MedlensError::ConfigError {
            reason: format!("invalid Stream API secret: {e}"),
        }
    })?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

#[derive(Debug, Deserialize)]
struct QueryChannelsResponse {
    #[serde(default)]
    channels: Option<Vec<ChannelState>>,
}

#[derive(Debug, Deserialize)]
struct ChannelState {
    #[serde(default)]
    messages: Option<Vec<StreamMessage>>,
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    user: Option<StreamUser>,
}

#[derive(Debug, Deserialize)]
struct StreamUser {
    id: String,
}

/// Messages of the first channel in a query-channels response, oldest first.
/// Missing or `null` lists count as empty.
pub fn parse_channel_messages(body: Value) -> MedlensResult<Vec<ChatMessage>> {
    let response: QueryChannelsResponse =
        serde_json::from_value(body).map_err(|e| MedlensError::ChatSource {
            reason: format!("unexpected query-channels response: {e}"),
        })?;

    Ok(response
        .channels
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|channel| {
            channel
                .messages
                .unwrap_or_default()
                .into_iter()
                .map(|m| ChatMessage {
                    id: m.id,
                    text: m.text,
                    user_id: m.user.map(|u| u.id),
                })
                .collect()
        })
        .unwrap_or_default())
}

pub struct StreamChatSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    token: String,
}

impl StreamChatSource {
    pub fn new(credentials: &ChatCredentials) -> MedlensResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MedlensError::ConfigError {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: STREAM_CHAT_BASE_URL.to_string(),
            api_key: credentials.api_key.clone(),
            token: server_token(&credentials.api_secret)?,
        })
    }

    /// Build from resolved config. Missing Stream credentials are a
    /// `ConfigError`.
    pub fn from_config(config: &AgentConfig) -> MedlensResult<Self> {
        let credentials = config.chat.as_ref().ok_or_else(|| MedlensError::ConfigError {
            reason: "STREAM_API_KEY and STREAM_API_SECRET are required for the chat watcher"
                .to_string(),
        })?;
        Self::new(credentials)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn query_body(channel_id: &str) -> Value {
        json!({
            "filter_conditions": { "id": channel_id, "type": "messaging" },
            "limit": 1,
            "state": true,
            "watch": false,
            "presence": false
        })
    }
}

#[async_trait]
impl ChatSource for StreamChatSource {
    async fn recent_messages(&self, channel_id: &str) -> MedlensResult<Vec<ChatMessage>> {
        let url = format!("{}/channels", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .header("Authorization", &self.token)
            .header("Stream-Auth-Type", "jwt")
            .json(&Self::query_body(channel_id))
            .send()
            .await
            .map_err(|e| MedlensError::ChatSource {
                reason: format!("query-channels request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MedlensError::ChatSource {
                reason: format!("query-channels returned {status}: {body}"),
            });
        }

        let body: Value = response.json().await.map_err(|e| MedlensError::ChatSource {
            reason: format!("query-channels response was not JSON: {e}"),
        })?;
        let messages = parse_channel_messages(body)?;
        debug!(channel = %channel_id, count = messages.len(), "fetched chat messages");
        Ok(messages)
    }
}
