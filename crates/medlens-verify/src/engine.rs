//! Schema-based argument verifier.
//!
//! `SchemaArgumentVerifier` implements the `ArgumentVerifier` trait from
//! `medlens-core`. The arguments object is validated against the JSON Schema
//! rendered from the tool's descriptor: every declared parameter present,
//! each of the declared primitive type, no undeclared keys.
//!
//! Values are never judged. A triage category of "PURPLE" or a CPR score of
//! 42 passes; deciding whether such a call makes sense is the model's job.

use tracing::{debug, warn};

use medlens_contracts::{
    error::MedlensResult,
    tool::{ArgumentReport, ToolDescriptor},
};
use medlens_core::traits::ArgumentVerifier;

/// The MedLens argument verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaArgumentVerifier;

impl SchemaArgumentVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl ArgumentVerifier for SchemaArgumentVerifier {
    /// Collect every violation rather than stopping at the first, so the
    /// journal shows the full picture of a malformed call.
    fn verify(
        &self,
        descriptor: &ToolDescriptor,
        arguments: &serde_json::Value,
    ) -> MedlensResult<ArgumentReport> {
        let schema = descriptor.json_schema();
        let mut failures = Vec::new();

        match jsonschema::validator_for(&schema) {
            Ok(validator) => {
                for error in validator.iter_errors(arguments) {
                    let message = format!("argument violation at '{}': {}", error.instance_path, error);
                    warn!(tool = %descriptor.name, %message, "argument type check failed");
                    failures.push(message);
                }
            }
            Err(e) => {
                // Descriptors are built in code; reaching this is a bug.
                let message = format!("invalid schema for tool '{}': {e}", descriptor.name);
                warn!(tool = %descriptor.name, %message, "schema compilation failure");
                failures.push(message);
            }
        }

        let report = ArgumentReport::from_failures(failures);
        debug!(
            tool = %descriptor.name,
            passed = report.passed,
            failure_count = report.failures.len(),
            "argument verification complete"
        );
        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
