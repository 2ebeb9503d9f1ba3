//! Invocation records written to the session journal.
//!
//! The dispatcher produces exactly one `InvocationRecord` per tool call,
//! whether the call succeeded or not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a tool call ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// The handler returned this result object.
    Succeeded { result: Value },
    /// The call was rejected or the handler failed.
    Failed { reason: String },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Succeeded { .. })
    }
}

/// One tool call as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRecord {
    /// Tool name as requested by the model (may be unknown).
    pub tool: String,
    /// Raw arguments as received.
    pub arguments: Value,
    pub outcome: InvocationOutcome,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}
