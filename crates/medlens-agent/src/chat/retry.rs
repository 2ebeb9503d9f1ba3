//! Exponential backoff for failing chat polls.

use std::time::Duration;

use medlens_config::WatcherSettings;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &WatcherSettings) -> Self {
        Self {
            initial_delay: Duration::from_secs(settings.initial_backoff_secs),
            max_delay: Duration::from_secs(settings.max_backoff_secs),
            multiplier: settings.backoff_multiplier,
        }
    }

    /// Delay before the next poll after `attempt` consecutive failures.
    ///
    /// `initial * multiplier^(attempt-1)`, capped at `max_delay`. Attempt 0
    /// and 1 both give the initial delay.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64();
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay = base * self.multiplier.max(1.0).powi(exponent);
        let capped = delay.min(self.max_delay.as_secs_f64());
        if capped.is_finite() && capped >= 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            self.max_delay
        }
    }
}
