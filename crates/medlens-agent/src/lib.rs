//! # medlens-agent
//!
//! The MedLens domain layer on top of an external conversational-agent
//! runtime. The runtime owns media, speech and the model; this crate owns
//! what the model can do and how the agent reacts to the call:
//!
//! - **tools**: emergency briefing, triage, incident log, incident report
//!   and CPR coaching, dispatched through `medlens_core::Dispatcher`
//! - **notifier**: greets users who join, logs provider and leave events
//! - **chat**: polls the call's chat channel for `@agent` mentions
//!
//! [`MedLensAgent`] wires these together from a resolved
//! [`medlens_config::AgentConfig`].
//!
//! Runtime profile the agent expects from its host: joins as
//! `medlens-agent` / "MedLens AI", TTS `eleven_flash_v2_5`, STT with eager
//! turn detection, YOLO pose processor `yolo11n-pose.pt` at 5 fps and 0.5
//! confidence. All of it is carried on `AgentConfig` and overridable in
//! `medlens.toml`.

pub mod agent;
pub mod chat;
pub mod notifier;
pub mod tools;

pub use agent::MedLensAgent;
pub use notifier::{LifecycleNotifier, Notification};
