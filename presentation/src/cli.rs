//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Interactive agent for a local Ollama backend
#[derive(Debug, Parser)]
#[command(name = "foreman", version, about)]
pub struct Cli {
    /// One-shot prompt: run a single turn and exit instead of the REPL
    pub prompt: Option<String>,

    /// Model to use (overrides the configured one)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Backend base URL (overrides the configured one)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Working directory to sandbox operations into
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Approve risky operations and recommendations without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Suppress the spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
