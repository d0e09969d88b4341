//! Tool Executor port
//!
//! Defines the interface for executing tool calls. The builtin registry
//! adapter lives in the infrastructure layer.

use async_trait::async_trait;
use foreman_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().has(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Execute a tool call. Never fails the caller: every handler failure
    /// is converted into a `ToolResult` carrying an error.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
