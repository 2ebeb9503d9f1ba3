//! Tool descriptors, calls, and results.
//!
//! A `ToolDescriptor` is what the language model sees: a name, a
//! natural-language description that steers when the model calls it, and a
//! flat list of required, primitive-typed parameters. The description is
//! never machine-checked.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{MedlensError, MedlensResult};

/// Primitive parameter types a tool may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
}

impl ParamType {
    /// The JSON Schema `type` keyword for this parameter type.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
        }
    }
}

/// One named parameter of a tool. Every parameter is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub param_type: ParamType,
}

/// A named capability exposed to the language model.
///
/// Built once at agent startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name, e.g. "classify_triage".
    pub name: String,
    /// Usage guidance for the model.
    pub description: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ToolParameter>,
}

impl ToolDescriptor {
    /// Start a descriptor with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a string parameter.
    pub fn string_param(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(ToolParameter {
            name: name.into(),
            param_type: ParamType::String,
        });
        self
    }

    /// Append an integer parameter.
    pub fn integer_param(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(ToolParameter {
            name: name.into(),
            param_type: ParamType::Integer,
        });
        self
    }

    /// Render the parameters as a JSON Schema object.
    ///
    /// All parameters are listed under `required` in declaration order and
    /// unknown keys are rejected.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({ "type": param.param_type.json_type() }),
            );
        }
        let required: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }

    /// Render as an OpenAI-style function declaration.
    pub fn function_declaration(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.json_schema()
            }
        })
    }
}

/// A tool invocation as delivered by the agent runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool the model chose.
    pub name: String,
    /// Arguments object produced by the model.
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// The object a tool hands back to the model.
///
/// Always a JSON object with a non-empty `message` string that the model can
/// relay or paraphrase to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolInvocationResult(Map<String, Value>);

impl ToolInvocationResult {
    /// Wrap a JSON value, checking that it is an object with a `message`.
    pub fn from_value(value: Value) -> MedlensResult<Self> {
        match value {
            Value::Object(map) => {
                let has_message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .is_some_and(|m| !m.is_empty());
                if has_message {
                    Ok(Self(map))
                } else {
                    Err(MedlensError::Serialization {
                        reason: "tool result must carry a non-empty 'message' string".to_string(),
                    })
                }
            }
            other => Err(MedlensError::Serialization {
                reason: format!("tool result must be a JSON object, got {other}"),
            }),
        }
    }

    /// The human-readable message for the model.
    pub fn message(&self) -> &str {
        self.0.get("message").and_then(Value::as_str).unwrap_or_default()
    }

    /// Look up any other field of the result.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Outcome of checking call arguments against a descriptor's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentReport {
    /// True only if no failures were found.
    pub passed: bool,
    /// One human-readable line per violation.
    pub failures: Vec<String>,
}

impl ArgumentReport {
    pub fn pass() -> Self {
        Self {
            passed: true,
            failures: Vec::new(),
        }
    }

    pub fn from_failures(failures: Vec<String>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }
}
