//! REPL (Read-Eval-Print Loop) for the interactive agent.

use crate::ConsoleFormatter;
use foreman_application::{
    AgentTurnUseCase, LlmGateway, ToolExecutorPort, TurnError, TurnOptions, TurnRequest,
};
use foreman_domain::ConversationHistory;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;
use tracing::warn;

/// Interactive agent REPL
pub struct ChatRepl<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> {
    use_case: AgentTurnUseCase<G, T>,
    gateway: Arc<G>,
    history: ConversationHistory,
    model: String,
}

impl<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> ChatRepl<G, T> {
    pub fn new(use_case: AgentTurnUseCase<G, T>, gateway: Arc<G>, model: String) -> Self {
        Self {
            use_case,
            gateway,
            history: ConversationHistory::default(),
            model,
        }
    }

    /// Run one turn and print the outcome. Used by both the REPL and the
    /// one-shot CLI mode.
    pub async fn process_line(&mut self, line: &str) {
        let request = TurnRequest::new(line, &self.model);
        match self
            .use_case
            .handle_turn(&request, &mut self.history, TurnOptions::default())
            .await
        {
            Ok(outcome) => {
                println!();
                println!("{}", ConsoleFormatter::render(&outcome));
            }
            Err(TurnError::Gateway(e)) => {
                println!();
                eprintln!("{}", e);
            }
        }
    }

    /// Run the interactive REPL until EOF or `/quit`.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("ollama-foreman").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(&line).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(&line);
                    self.process_line(&line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("ollama-foreman - agent for your working directory");
        println!("Model: {}", self.model);
        println!();
        println!("Commands:");
        println!("  /help           - Show this help");
        println!("  /models         - List installed models");
        println!("  /model <name>   - Switch model (clears conversation)");
        println!("  /clear          - Clear conversation history");
        println!("  /quit           - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if the REPL should exit.
    async fn handle_command(&mut self, cmd: &str) -> bool {
        let mut parts = cmd.splitn(2, ' ');
        match parts.next().unwrap_or("") {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                self.print_welcome();
                false
            }
            "/models" => {
                match self.gateway.list_models().await {
                    Ok(models) => println!("{}", ConsoleFormatter::render_models(&models)),
                    Err(e) => eprintln!("{}", e),
                }
                false
            }
            "/model" => {
                match parts.next().map(str::trim).filter(|s| !s.is_empty()) {
                    Some(name) => {
                        self.model = name.to_string();
                        // A fresh model gets a fresh conversation.
                        self.history.clear();
                        println!("Switched to {} (conversation cleared)", self.model);
                    }
                    None => println!("Usage: /model <name>"),
                }
                false
            }
            "/clear" => {
                self.history.clear();
                println!("Conversation cleared.");
                false
            }
            other => {
                warn!(command = other, "Unknown command");
                println!("Unknown command: {} (try /help)", other);
                false
            }
        }
    }
}
