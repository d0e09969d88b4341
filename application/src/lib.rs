//! Application layer for ollama-foreman
//!
//! Use cases orchestrating the per-turn agent flow, and the ports they
//! depend on. Adapters for the ports (Ollama HTTP gateway, builtin tool
//! registry, console prompts) live in the infrastructure and presentation
//! layers.

pub mod ports;
pub mod use_cases;

// Re-export the surface the binary wires together
pub use ports::confirmation::{ConfirmationPort, RecommendationChoice};
pub use ports::llm_gateway::{GatewayError, LlmGateway, ModelInfo};
pub use ports::progress::{NoProgress, ProgressPort};
pub use ports::tool_executor::ToolExecutorPort;
pub use use_cases::agent_turn::{
    AgentTurnUseCase, NestedActionResult, TurnError, TurnOptions, TurnOutcome, TurnRequest,
};
pub use use_cases::execute_actions::{BatchReport, BatchStatus, ExecuteActionsUseCase};
