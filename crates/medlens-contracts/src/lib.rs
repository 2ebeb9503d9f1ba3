//! # medlens-contracts
//!
//! Shared types for the MedLens agent: tool descriptors and results,
//! incident reports, session events, journal records, and the error type.
//!
//! No behaviour lives here beyond small constructors and renderers.

pub mod error;
pub mod journal;
pub mod report;
pub mod session;
pub mod tool;
