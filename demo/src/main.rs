//! MedLens — Demo CLI
//!
//! Drives the MedLens agent without a call runtime attached. Model prompts
//! that would normally be spoken are written to the log instead.
//!
//! Usage:
//!   cargo run -p demo -- tools
//!   cargo run -p demo -- invoke classify_triage --args '{"category":"RED",...}'
//!   cargo run -p demo -- backend
//!   cargo run -p demo -- simulate
//!   cargo run -p demo -- watch-chat <call_id>

mod simulate;

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use medlens_agent::MedLensAgent;
use medlens_config::AgentConfig;
use medlens_contracts::{
    error::{MedlensError, MedlensResult},
    tool::ToolCall,
};
use medlens_core::traits::ResponseTrigger;

// ── CLI definition ────────────────────────────────────────────────────────────

/// MedLens — emergency triage and first-aid coaching agent.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "MedLens agent demo",
    long_about = "Exercises the MedLens tools, lifecycle handling and chat watcher\n\
                  without a live video call."
)]
struct Cli {
    /// Settings file (defaults to ./medlens.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Env file with credentials (defaults to ./.env when present).
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every tool declaration as JSON.
    Tools,
    /// Dispatch one tool call and print the result.
    Invoke {
        /// Tool name, e.g. classify_triage.
        tool: String,
        /// Arguments object as JSON.
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Show which language-model backend the configuration selects.
    Backend,
    /// Run a scripted session: join, triage, CPR evaluation, report, leave.
    Simulate,
    /// Watch a call's Stream chat channel for @agent mentions until Ctrl-C.
    WatchChat {
        /// Call id, which is also the chat channel id.
        call_id: String,
    },
}

// ── Response trigger ──────────────────────────────────────────────────────────

/// Stands in for the call runtime: logs what the model would be asked to say.
struct LoggingTrigger;

#[async_trait]
impl ResponseTrigger for LoggingTrigger {
    async fn simple_response(&self, text: &str) -> MedlensResult<()> {
        info!(prompt = %text, "model response requested");
        Ok(())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> MedlensResult<()> {
    let config = AgentConfig::load(cli.config.as_deref(), cli.env_file.as_deref())?;

    match cli.command {
        Command::Tools => {
            let agent = MedLensAgent::new(config, Arc::new(LoggingTrigger))?;
            println!("{}", serde_json::to_string_pretty(&agent.tool_declarations())?);
        }
        Command::Invoke { tool, args } => {
            let arguments = serde_json::from_str(&args).map_err(|e| MedlensError::InvalidArguments {
                tool: tool.clone(),
                reason: format!("--args is not valid JSON: {e}"),
            })?;
            let agent = MedLensAgent::new(config, Arc::new(LoggingTrigger))?;
            let result = agent.dispatch(&ToolCall::new(tool, arguments)).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Backend => print_backend(&config),
        Command::Simulate => {
            let agent = MedLensAgent::new(config, Arc::new(LoggingTrigger))?;
            simulate::run_session(&agent).await?;
        }
        Command::WatchChat { call_id } => {
            let agent = MedLensAgent::new(config, Arc::new(LoggingTrigger))?;
            let handle = agent.spawn_stream_chat_watcher(&call_id)?;
            println!("Watching chat for call '{call_id}'. Press Ctrl-C to stop.");

            tokio::signal::ctrl_c().await.map_err(|e| MedlensError::ChatSource {
                reason: format!("failed to listen for Ctrl-C: {e}"),
            })?;
            println!("Last health: {:?}", handle.health());
            handle.shutdown().await?;
        }
    }
    Ok(())
}

fn print_backend(config: &AgentConfig) {
    println!();
    println!("Backend:      {}", config.backend.describe());
    println!("Kind:         {:?}", config.backend.kind());
    println!("Agent user:   {} ({})", config.agent_user.name, config.agent_user.id);
    println!("Instructions: {}", config.instructions_path.display());
    println!("Reports dir:  {}", config.reports_dir.display());
    println!(
        "Speech:       TTS {}, eager turn detection {}",
        config.speech.tts_model,
        if config.speech.eager_turn_detection { "on" } else { "off" }
    );
    println!(
        "Pose:         {} at {} fps, confidence {}",
        config.pose.model_path, config.pose.fps, config.pose.conf_threshold
    );
    println!(
        "Chat watcher: {}",
        if config.chat.is_some() { "available" } else { "missing Stream credentials" }
    );
    println!();
}
