//! Command execution tool: run_command
//!
//! Runs a shell command inside the sandbox working directory under a
//! caller-specified timeout, with a bounded capture buffer. Timeouts are
//! reported distinctly from non-zero exits: an expired deadline kills the
//! child and fails the tool, while a non-zero exit is a successful capture
//! carrying the exit code.

use foreman_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
use foreman_domain::SandboxContext;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// Tool name constant
pub const RUN_COMMAND: &str = "run_command";

/// Default timeout for command execution (5 minutes)
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Maximum captured output size (10 MB)
const MAX_OUTPUT_SIZE: usize = 10 * 1024 * 1024;

pub fn run_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_COMMAND,
        "Execute a shell command in the working directory and return its output. Use with caution.",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("command", "The command to execute", true))
    .with_parameter(
        ToolParameter::new("timeout_secs", "Timeout in seconds (default: 300)", false)
            .with_type("number"),
    )
}

/// Execute the run_command tool
pub async fn execute_run_command(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let command_str = match call.require_string_any(&["command", "cmd"]) {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(RUN_COMMAND, ToolError::invalid_argument(e)),
    };

    let timeout_secs = call
        .get_i64("timeout_secs")
        .map(|t| t.max(1) as u64)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    debug!(command = command_str, timeout_secs, "Running shell command");

    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command_str]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command_str]);
        c
    };

    // Color codes would pollute the captured output the model reads back.
    cmd.current_dir(ctx.cwd())
        .env("NO_COLOR", "1")
        .env("TERM", "dumb")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output_future = cmd.output();
    let output = match tokio::time::timeout(Duration::from_secs(timeout_secs), output_future).await
    {
        // Dropping the future kills the child (kill_on_drop).
        Err(_) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::timeout(format!(
                    "command did not finish within {} seconds",
                    timeout_secs
                )),
            );
        }
        Ok(Err(e)) => {
            return ToolResult::failure(
                RUN_COMMAND,
                ToolError::execution_failed(format!("Failed to spawn command: {}", e)),
            );
        }
        Ok(Ok(output)) => output,
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    let exit_code = output.status.code().unwrap_or(-1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut combined = String::new();
    if !stdout.is_empty() {
        combined.push_str(&stdout);
    }
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(&stderr);
    }

    if combined.len() > MAX_OUTPUT_SIZE {
        combined.truncate(MAX_OUTPUT_SIZE);
        combined.push_str("\n... (output truncated)");
    }

    let metadata = ToolResultMetadata {
        duration_ms: Some(duration_ms),
        bytes: Some(combined.len()),
        exit_code: Some(exit_code),
        ..Default::default()
    };

    if output.status.success() {
        ToolResult::success(RUN_COMMAND, combined).with_metadata(metadata)
    } else {
        // A non-zero exit is still a captured result; the exit code is
        // carried distinctly so the caller can decide what to do.
        ToolResult::success(
            RUN_COMMAND,
            format!("Command exited with code {}\n{}", exit_code, combined),
        )
        .with_metadata(metadata)
    }
}
