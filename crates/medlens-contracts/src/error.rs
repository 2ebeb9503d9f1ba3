//! Error types shared by every MedLens crate.
//!
//! Tool handlers are designed not to fail for well-typed input, so most of
//! these variants describe problems at the seams: the dispatcher, the report
//! files, configuration, and the external chat and runtime collaborators.

use thiserror::Error;

/// The unified error type for MedLens.
#[derive(Debug, Error)]
pub enum MedlensError {
    /// The model asked for a tool that is not in the registry.
    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    /// The call arguments do not match the tool's declared parameter types.
    #[error("invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// One of the two incident report files could not be written.
    #[error("failed to write report file '{path}': {reason}")]
    ReportWriteFailed { path: String, reason: String },

    /// The invocation journal could not record a tool call.
    #[error("journal write failed: {reason}")]
    JournalWriteFailed { reason: String },

    /// A settings file or credential source is missing or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The chat backend could not be queried.
    #[error("chat source error: {reason}")]
    ChatSource { reason: String },

    /// The agent runtime rejected a response request.
    #[error("response trigger failed: {reason}")]
    ResponseTrigger { reason: String },

    /// A value could not be converted to or from JSON.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for MedlensError {
    fn from(err: serde_json::Error) -> Self {
        MedlensError::Serialization {
            reason: err.to_string(),
        }
    }
}

/// Convenience alias used throughout the MedLens crates.
pub type MedlensResult<T> = Result<T, MedlensError>;
