//! Tool Registry
//!
//! Routes tool calls to the builtin handlers and implements
//! [`ToolExecutorPort`]. The catalog is fixed at construction; every
//! handler receives the same immutable [`SandboxContext`].

use async_trait::async_trait;
use foreman_application::ports::tool_executor::ToolExecutorPort;
use foreman_domain::tool::{
    entities::{ToolCall, ToolSpec},
    value_objects::{ToolError, ToolResult},
};
use foreman_domain::SandboxContext;
use tracing::debug;

use crate::tools::{command, default_tool_spec, dir, file, info, search, transfer};

/// Builtin tool registry bound to one sandbox
pub struct ToolRegistry {
    spec: ToolSpec,
    ctx: SandboxContext,
}

impl ToolRegistry {
    /// Create the registry with the full builtin catalog.
    pub fn new(ctx: SandboxContext) -> Self {
        Self {
            spec: default_tool_spec(),
            ctx,
        }
    }

    pub fn sandbox(&self) -> &SandboxContext {
        &self.ctx
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        if !self.spec.has(&call.tool_name) {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(format!("Unknown tool: {}", call.tool_name)),
            );
        }

        debug!(tool = %call.tool_name, "Dispatching tool call");

        match call.tool_name.as_str() {
            file::CREATE_FILE => file::execute_create_file(&self.ctx, call),
            file::READ_FILE => file::execute_read_file(&self.ctx, call),
            file::APPEND_FILE => file::execute_append_file(&self.ctx, call),
            file::DELETE_FILE => file::execute_delete_file(&self.ctx, call),
            dir::CREATE_DIRECTORY => dir::execute_create_directory(&self.ctx, call),
            dir::DELETE_DIRECTORY => dir::execute_delete_directory(&self.ctx, call),
            transfer::MOVE_FILE => transfer::execute_move_file(&self.ctx, call),
            transfer::COPY_FILE => transfer::execute_copy_file(&self.ctx, call),
            search::FIND_FILES => search::execute_find_files(&self.ctx, call),
            search::FIND_REPLACE => search::execute_find_replace(&self.ctx, call),
            info::FILE_INFO => info::execute_file_info(&self.ctx, call),
            info::READ_ENV => info::execute_read_env(call),
            command::RUN_COMMAND => command::execute_run_command(&self.ctx, call).await,
            other => ToolResult::failure(
                other,
                ToolError::not_found(format!("Unknown tool: {}", other)),
            ),
        }
    }
}
