//! Trait seams between MedLens and everything around it.
//!
//! - `ToolHandler`       — one callable tool, type-erased over JSON
//! - `TypedTool`         — the typed form tools are written in
//! - `ArgumentVerifier`  — type check of call arguments before a handler runs
//! - `InvocationJournal` — records every dispatched call
//! - `ReportSink`        — persists incident reports
//! - `Clock`             — wall-clock source for timestamps and report ids
//! - `ResponseTrigger`   — asks the agent runtime to have the model respond
//! - `ChatSource`        — reads recent messages from the call's chat channel
//!
//! The last two are implemented by external collaborators; MedLens only
//! consumes them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use medlens_contracts::{
    error::{MedlensError, MedlensResult},
    journal::InvocationRecord,
    report::{IncidentDetails, PersistedReport},
    session::ChatMessage,
    tool::{ArgumentReport, ParamType, ToolDescriptor, ToolInvocationResult},
};

/// A tool as stored in the registry.
///
/// Handlers receive the raw JSON arguments the model produced and return a
/// result object carrying a `message`. Implementations must not validate
/// argument values beyond their types.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The schema the model sees.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Run the tool.
    async fn invoke(&self, arguments: Value) -> MedlensResult<ToolInvocationResult>;
}

/// A tool written against concrete input and output structs.
///
/// Wrap with [`Typed`] to store it in a registry.
#[async_trait]
pub trait TypedTool: Send + Sync + 'static {
    type Input: DeserializeOwned + Send + 'static;
    type Output: Serialize + Send + 'static;

    /// Build the descriptor. Called once when the tool is wrapped.
    fn descriptor(&self) -> ToolDescriptor;

    async fn run(&self, input: Self::Input) -> MedlensResult<Self::Output>;
}

/// Adapter that erases a [`TypedTool`] into a [`ToolHandler`].
pub struct Typed<T> {
    tool: T,
    descriptor: ToolDescriptor,
}

impl<T: TypedTool> Typed<T> {
    pub fn new(tool: T) -> Self {
        let descriptor = tool.descriptor();
        Self { tool, descriptor }
    }

    /// Wrap and share in one step.
    pub fn shared(tool: T) -> Arc<dyn ToolHandler> {
        Arc::new(Self::new(tool))
    }
}

#[async_trait]
impl<T: TypedTool> ToolHandler for Typed<T> {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, mut arguments: Value) -> MedlensResult<ToolInvocationResult> {
        integral_floats_to_integers(&self.descriptor, &mut arguments);
        let input: T::Input =
            serde_json::from_value(arguments).map_err(|e| MedlensError::InvalidArguments {
                tool: self.descriptor.name.clone(),
                reason: e.to_string(),
            })?;
        let output = self.tool.run(input).await?;
        ToolInvocationResult::from_value(serde_json::to_value(output)?)
    }
}

/// JSON Schema accepts `3.0` as an integer; serde's `i64` does not. Rewrite
/// such values for integer parameters so the two agree. Fractional values
/// are left alone and fail deserialization.
fn integral_floats_to_integers(descriptor: &ToolDescriptor, arguments: &mut Value) {
    let Some(object) = arguments.as_object_mut() else {
        return;
    };
    for param in descriptor
        .parameters
        .iter()
        .filter(|p| p.param_type == ParamType::Integer)
    {
        let Some(value) = object.get_mut(&param.name) else {
            continue;
        };
        let Some(number) = value.as_number() else {
            continue;
        };
        if number.is_i64() || number.is_u64() {
            continue;
        }
        if let Some(f) = number.as_f64() {
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                *value = Value::from(f as i64);
            }
        }
    }
}

/// Checks call arguments against a descriptor before the handler runs.
///
/// Implementations check presence and primitive types only. Values such as
/// an unknown triage category or an out-of-range score must pass.
pub trait ArgumentVerifier: Send + Sync {
    fn verify(&self, descriptor: &ToolDescriptor, arguments: &Value) -> MedlensResult<ArgumentReport>;
}

/// Append-only sink for dispatched calls.
///
/// Every dispatch, successful or not, produces exactly one record.
pub trait InvocationJournal: Send + Sync {
    fn record(&self, record: &InvocationRecord) -> MedlensResult<()>;
}

/// Persists incident reports.
pub trait ReportSink: Send + Sync {
    /// Create a report from `details` stamped with the current time and
    /// write it out. Returns where it was written.
    fn persist(&self, details: IncidentDetails) -> MedlensResult<PersistedReport>;
}

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The process clock in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant until moved with [`FixedClock::set`].
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Asks the agent runtime to have the model produce a response.
///
/// `text` is an instruction to the model, not words to be spoken verbatim.
#[async_trait]
pub trait ResponseTrigger: Send + Sync {
    async fn simple_response(&self, text: &str) -> MedlensResult<()>;
}

/// Reads the chat channel attached to a call.
#[async_trait]
pub trait ChatSource: Send + Sync {
    /// Return the channel's recent messages, oldest first.
    async fn recent_messages(&self, channel_id: &str) -> MedlensResult<Vec<ChatMessage>>;
}
