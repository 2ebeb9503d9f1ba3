//! # medlens-verify
//!
//! Type checking of tool-call arguments for the MedLens agent.
//!
//! This crate provides [`engine::SchemaArgumentVerifier`], which implements
//! [`medlens_core::traits::ArgumentVerifier`] by validating the arguments
//! object against the JSON Schema rendered from a `ToolDescriptor`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use medlens_verify::SchemaArgumentVerifier;
//!
//! let report = SchemaArgumentVerifier::new().verify(&descriptor, &arguments)?;
//! if !report.passed {
//!     eprintln!("{}", report.failures.join("; "));
//! }
//! ```

pub mod engine;

pub use engine::SchemaArgumentVerifier;
