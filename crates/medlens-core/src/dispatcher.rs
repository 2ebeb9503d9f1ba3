//! The MedLens dispatcher: runs one tool call from the model.
//!
//!   Lookup → Verify arguments → Handler → Journal
//!
//! Every call produces exactly one journal record, including calls for
//! unknown tools and calls rejected by the argument verifier.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use medlens_contracts::{
    error::{MedlensError, MedlensResult},
    journal::{InvocationOutcome, InvocationRecord},
    tool::{ToolCall, ToolDescriptor, ToolInvocationResult},
};

use crate::{
    registry::ToolRegistry,
    traits::{ArgumentVerifier, InvocationJournal},
};

/// Routes tool calls from the runtime to registered handlers.
///
/// One dispatcher per session. It is `Send + Sync` and is normally shared
/// behind an `Arc`.
pub struct Dispatcher {
    registry: ToolRegistry,
    verifier: Box<dyn ArgumentVerifier>,
    journal: Arc<dyn InvocationJournal>,
}

impl Dispatcher {
    pub fn new(
        registry: ToolRegistry,
        verifier: Box<dyn ArgumentVerifier>,
        journal: Arc<dyn InvocationJournal>,
    ) -> Self {
        Self {
            registry,
            verifier,
            journal,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Descriptors of every registered tool, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Execute one tool call.
    ///
    /// # Errors
    ///
    /// - `UnknownTool` when no handler is registered under `call.name`
    /// - `InvalidArguments` when the arguments fail the type check
    /// - whatever the handler returns (only report persistence can fail)
    /// - `JournalWriteFailed` when the call cannot be recorded
    pub async fn dispatch(&self, call: &ToolCall) -> MedlensResult<ToolInvocationResult> {
        debug!(tool = %call.name, "dispatching tool call");

        let Some(handler) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, "model requested an unknown tool");
            let err = MedlensError::UnknownTool {
                name: call.name.clone(),
            };
            self.record_failure(call, &err)?;
            return Err(err);
        };

        let report = self.verifier.verify(handler.descriptor(), &call.arguments)?;
        if !report.passed {
            let reason = report.failures.join("; ");
            warn!(tool = %call.name, failures = %reason, "tool arguments rejected");
            let err = MedlensError::InvalidArguments {
                tool: call.name.clone(),
                reason,
            };
            self.record_failure(call, &err)?;
            return Err(err);
        }

        match handler.invoke(call.arguments.clone()).await {
            Ok(result) => {
                self.journal.record(&InvocationRecord {
                    tool: call.name.clone(),
                    arguments: call.arguments.clone(),
                    outcome: InvocationOutcome::Succeeded {
                        result: result.clone().into_value(),
                    },
                    timestamp: Utc::now(),
                })?;
                info!(tool = %call.name, "tool call completed");
                Ok(result)
            }
            Err(err) => {
                warn!(tool = %call.name, error = %err, "tool handler failed");
                self.record_failure(call, &err)?;
                Err(err)
            }
        }
    }

    /// Convenience wrapper for callers holding a name and an arguments object.
    pub async fn call(&self, name: &str, arguments: Value) -> MedlensResult<ToolInvocationResult> {
        self.dispatch(&ToolCall::new(name, arguments)).await
    }

    fn record_failure(&self, call: &ToolCall, err: &MedlensError) -> MedlensResult<()> {
        self.journal.record(&InvocationRecord {
            tool: call.name.clone(),
            arguments: call.arguments.clone(),
            outcome: InvocationOutcome::Failed {
                reason: err.to_string(),
            },
            timestamp: Utc::now(),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
