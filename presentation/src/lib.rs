//! Presentation layer for ollama-foreman
//!
//! The interactive REPL, operator confirmation prompts, result formatting,
//! and the spinner. Everything here is replaceable chrome around the
//! application layer's ports.

pub mod chat;
pub mod cli;
pub mod confirm;
pub mod output;
pub mod progress;

pub use chat::ChatRepl;
pub use cli::Cli;
pub use confirm::{AutoApprove, ConsoleConfirmation};
pub use output::ConsoleFormatter;
pub use progress::SpinnerProgress;
