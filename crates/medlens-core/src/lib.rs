//! # medlens-core
//!
//! The tool-calling core of the MedLens agent.
//!
//! This crate provides:
//! - The trait seams (`ToolHandler`, `TypedTool`, `ArgumentVerifier`,
//!   `InvocationJournal`, `ReportSink`, `Clock`, `ResponseTrigger`, `ChatSource`)
//! - The `ToolRegistry` built once at startup
//! - The `Dispatcher` that runs a model's tool call end to end
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medlens_core::{Dispatcher, ToolRegistry, traits::Typed};
//!
//! let registry = ToolRegistry::new().with(Typed::shared(MyTool));
//! let dispatcher = Dispatcher::new(registry, Box::new(verifier), journal);
//! let result = dispatcher.call("my_tool", json!({ "x": 1 })).await?;
//! ```

pub mod dispatcher;
pub mod registry;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use registry::ToolRegistry;
