//! Chat mention watcher.
//!
//! Polls the call's chat channel and turns every new message that mentions
//! `@agent` into a response trigger for the model. Runs as one spawned task
//! per call; the task owns its [`SeenCache`] outright.
//!
//! Health is published on a `watch` channel:
//!
//!   Starting → Healthy ⇄ Degraded → Stopped
//!
//! A failed poll backs off according to the [`RetryPolicy`]; after
//! `max_consecutive_failures` failures in a row the watcher reports
//! `Degraded`, and the next successful poll puts it back to `Healthy`.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::Instant};
use tracing::{debug, error, info, warn};

use medlens_config::WatcherSettings;
use medlens_contracts::error::{MedlensError, MedlensResult};
use medlens_core::traits::{ChatSource, ResponseTrigger};

use super::{retry::RetryPolicy, seen::SeenCache};

/// Mention token, matched case-insensitively.
pub const MENTION: &str = "@agent";

/// Sent when a message is nothing but the mention.
pub const BARE_MENTION_TEXT: &str = "The user mentioned you. Ask how you can help.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherHealth {
    Starting,
    Healthy,
    Degraded,
    Stopped,
}

/// If `text` mentions the agent, return it with every mention removed and
/// surrounding whitespace trimmed. The result may be empty.
pub fn extract_mention(text: &str) -> Option<String> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let needle = MENTION.as_bytes();

    let mut cleaned = String::with_capacity(text.len());
    let mut found = false;
    let mut start = 0;
    let mut i = 0;
    while i + needle.len() <= bytes.len() {
        if bytes[i..i + needle.len()].eq_ignore_ascii_case(needle) {
            // The mention is ASCII, so both ends sit on char boundaries.
            cleaned.push_str(&text[start..i]);
            i += needle.len();
            start = i;
            found = true;
        } else {
            i += 1;
        }
    }
    if !found {
        return None;
    }
    cleaned.push_str(&text[start..]);
    Some(cleaned.trim().to_string())
}

/// The instruction forwarded to the model for a cleaned mention.
pub fn chat_prompt(cleaned: &str) -> String {
    let text = if cleaned.is_empty() {
        BARE_MENTION_TEXT
    } else {
        cleaned
    };
    format!("The user typed this in chat: '{text}'. Respond helpfully.")
}

pub struct ChatMentionWatcher {
    channel_id: String,
    agent_user_id: String,
    source: Arc<dyn ChatSource>,
    trigger: Arc<dyn ResponseTrigger>,
    poll_interval: Duration,
    window: usize,
    max_consecutive_failures: u32,
    retry: RetryPolicy,
    seen: SeenCache,
    consecutive_failures: u32,
    health: Arc<watch::Sender<WatcherHealth>>,
}

impl ChatMentionWatcher {
    pub fn new(
        channel_id: impl Into<String>,
        agent_user_id: impl Into<String>,
        source: Arc<dyn ChatSource>,
        trigger: Arc<dyn ResponseTrigger>,
        settings: &WatcherSettings,
    ) -> Self {
        let (health, _) = watch::channel(WatcherHealth::Starting);
        Self {
            channel_id: channel_id.into(),
            agent_user_id: agent_user_id.into(),
            source,
            trigger,
            poll_interval: Duration::from_secs(settings.poll_interval_secs),
            window: settings.window,
            max_consecutive_failures: settings.max_consecutive_failures.max(1),
            retry: RetryPolicy::from_settings(settings),
            // Smaller than the window, ids in view would evict each other.
            seen: SeenCache::new(
                settings.seen_capacity.max(settings.window),
                Duration::from_secs(settings.seen_ttl_secs),
            ),
            consecutive_failures: 0,
            health: Arc::new(health),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn health(&self) -> WatcherHealth {
        *self.health.borrow()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Fetch the channel once and trigger a response for each new mention.
    /// Returns how many triggers were sent.
    ///
    /// A trigger that fails is logged and skipped; only a failed fetch is
    /// an error.
    pub async fn poll_once(&mut self) -> MedlensResult<usize> {
        let messages = self.source.recent_messages(&self.channel_id).await?;
        let now = Instant::now();
        let start = messages.len().saturating_sub(self.window);

        let mut triggered = 0;
        for message in &messages[start..] {
            if !self.seen.insert(&message.id, now) {
                continue;
            }
            if message.user_id.as_deref() == Some(self.agent_user_id.as_str()) {
                continue;
            }
            let Some(cleaned) = extract_mention(message.text.as_deref().unwrap_or_default()) else {
                continue;
            };

            info!(message_id = %message.id, text = %cleaned, "chat mention received");
            match self.trigger.simple_response(&chat_prompt(&cleaned)).await {
                Ok(()) => triggered += 1,
                Err(e) => warn!(message_id = %message.id, error = %e, "failed to trigger chat response"),
            }
        }
        Ok(triggered)
    }

    /// Run one poll and update health. Returns the delay before the next poll.
    pub async fn tick(&mut self) -> Duration {
        match self.poll_once().await {
            Ok(_) => {
                if self.consecutive_failures > 0 {
                    info!(
                        channel = %self.channel_id,
                        failures = self.consecutive_failures,
                        "chat polling recovered"
                    );
                }
                self.consecutive_failures = 0;
                self.publish(WatcherHealth::Healthy);
                self.poll_interval
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                let delay = self.retry.delay_for(self.consecutive_failures);
                if self.consecutive_failures >= self.max_consecutive_failures {
                    if self.publish(WatcherHealth::Degraded) {
                        error!(
                            channel = %self.channel_id,
                            failures = self.consecutive_failures,
                            error = %e,
                            "chat watcher degraded"
                        );
                    }
                } else {
                    warn!(
                        channel = %self.channel_id,
                        attempt = self.consecutive_failures,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "chat poll failed"
                    );
                }
                delay
            }
        }
    }

    /// Start polling on the current tokio runtime.
    pub fn spawn(self) -> WatcherHandle {
        let health = self.health.clone();
        let channel_id = self.channel_id.clone();
        let task = tokio::spawn(self.run());
        WatcherHandle {
            channel_id,
            task,
            health,
        }
    }

    async fn run(mut self) {
        info!(channel = %self.channel_id, "chat mention watcher started");
        let mut delay = self.poll_interval;
        loop {
            tokio::time::sleep(delay).await;
            delay = self.tick().await;
            debug!(channel = %self.channel_id, next_poll_ms = delay.as_millis() as u64, "chat poll done");
        }
    }

    fn publish(&self, health: WatcherHealth) -> bool {
        publish(&self.health, health)
    }
}

fn publish(sender: &watch::Sender<WatcherHealth>, health: WatcherHealth) -> bool {
    sender.send_if_modified(|current| {
        if *current == health {
            false
        } else {
            *current = health;
            true
        }
    })
}

/// Owner's handle on a running watcher.
pub struct WatcherHandle {
    channel_id: String,
    task: JoinHandle<()>,
    health: Arc<watch::Sender<WatcherHealth>>,
}

impl WatcherHandle {
    pub fn health(&self) -> WatcherHealth {
        *self.health.borrow()
    }

    /// Receiver that sees every health change.
    pub fn subscribe(&self) -> watch::Receiver<WatcherHealth> {
        self.health.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the watcher and publish `Stopped`.
    pub async fn shutdown(self) -> MedlensResult<()> {
        self.task.abort();
        let joined = self.task.await;
        publish(&self.health, WatcherHealth::Stopped);
        info!(channel = %self.channel_id, "chat mention watcher stopped");

        match joined {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(MedlensError::ChatSource {
                reason: format!("chat watcher task failed: {e}"),
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
