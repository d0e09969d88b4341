//! CLI entrypoint for ollama-foreman
//!
//! Wires the layers together with dependency injection: config, gateway,
//! sandboxed tool registry, confirmation prompts, and the REPL.

use anyhow::{bail, Context, Result};
use clap::Parser;
use foreman_application::{AgentTurnUseCase, ConfirmationPort, LlmGateway, NoProgress, ProgressPort};
use foreman_domain::{HeuristicRiskPolicy, SandboxContext};
use foreman_infrastructure::{ForemanConfig, OllamaGateway, ToolRegistry};
use foreman_presentation::{AutoApprove, ChatRepl, Cli, ConsoleConfirmation, SpinnerProgress};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to a file so it never interleaves with the REPL.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _log_guard = init_logging(filter)?;

    info!("Starting ollama-foreman");

    // Load persisted config and apply flag overrides.
    let mut config = ForemanConfig::load().context("failed to load configuration")?;
    let mut config_changed = false;

    if let Some(url) = &cli.backend_url {
        config.backend_url = url.clone();
        config_changed = true;
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
        config_changed = true;
    }
    if let Some(dir) = &cli.dir {
        config.working_dir = Some(dir.clone());
        config_changed = true;
    }

    // === Dependency Injection ===
    let gateway = Arc::new(OllamaGateway::new(&config.backend_url));

    // Verify the backend is reachable and pick a model if none configured.
    let models = gateway.list_models().await?;
    if config.model.is_empty() {
        match models.first() {
            Some(first) => {
                config.model = first.name.clone();
                config_changed = true;
                info!(model = %config.model, "No model configured, using first installed");
            }
            None => bail!(
                "No models installed on the backend. Pull one first (e.g. `ollama pull llama3.2`)."
            ),
        }
    }

    // Sandbox root: configured dir or the current directory.
    let root = match &config.working_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("working directory {} does not exist", root.display()))?;
    let sandbox = SandboxContext::new(root);
    info!(root = %sandbox.root().display(), "Sandbox fixed");

    if config_changed {
        config.save().context("failed to save configuration")?;
    }

    let registry = Arc::new(ToolRegistry::new(sandbox));
    let confirmation: Arc<dyn ConfirmationPort> = if cli.yes {
        Arc::new(AutoApprove)
    } else {
        Arc::new(ConsoleConfirmation::new())
    };
    let progress: Arc<dyn ProgressPort> = if cli.quiet || cli.prompt.is_some() {
        Arc::new(NoProgress)
    } else {
        Arc::new(SpinnerProgress::new())
    };

    let use_case = AgentTurnUseCase::new(
        gateway.clone(),
        registry,
        Arc::new(HeuristicRiskPolicy::new()),
        confirmation,
        progress,
    );

    let mut repl = ChatRepl::new(use_case, gateway, config.model.clone());

    // One-shot mode: a single turn, then exit.
    if let Some(prompt) = &cli.prompt {
        repl.process_line(prompt).await;
        return Ok(());
    }

    repl.run().await
}

/// Route tracing output to a non-blocking file writer under the state dir.
fn init_logging(filter: EnvFilter) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|d| d.join("ollama-foreman"))
        .context("could not determine a log directory")?;
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(log_dir, "foreman.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .with_ansi(false)
        .init();

    Ok(guard)
}
