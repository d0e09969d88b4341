//! Move and copy tools: move_file, copy_file
//!
//! Both tools take an explicit `overwrite` flag and refuse to silently
//! replace an existing destination without it. Directories are accepted as
//! well as files; copies of directories are recursive.

use foreman_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use foreman_domain::SandboxContext;
use std::fs;
use std::path::Path;

/// Tool name constants
pub const MOVE_FILE: &str = "move_file";
pub const COPY_FILE: &str = "copy_file";

/// Accepted aliases for source and destination parameters
const SOURCE_ALIASES: &[&str] = &["source", "src", "from"];
const DEST_ALIASES: &[&str] = &["destination", "dest", "to"];

pub fn move_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        MOVE_FILE,
        "Move or rename a file or directory. Refuses to overwrite unless 'overwrite' is set.",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("source", "Path to move from", true).with_type("path"))
    .with_parameter(ToolParameter::new("destination", "Path to move to", true).with_type("path"))
    .with_parameter(
        ToolParameter::new("overwrite", "Replace an existing destination (default: false)", false)
            .with_type("boolean"),
    )
}

pub fn copy_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        COPY_FILE,
        "Copy a file or directory (directories are copied recursively). Refuses to overwrite unless 'overwrite' is set.",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("source", "Path to copy from", true).with_type("path"))
    .with_parameter(ToolParameter::new("destination", "Path to copy to", true).with_type("path"))
    .with_parameter(
        ToolParameter::new("overwrite", "Replace an existing destination (default: false)", false)
            .with_type("boolean"),
    )
}

/// Resolve and pre-check the source/destination pair shared by both tools.
fn resolve_pair(
    tool: &str,
    ctx: &SandboxContext,
    call: &ToolCall,
) -> Result<(std::path::PathBuf, std::path::PathBuf, String, String), ToolResult> {
    let source_str = match call.require_string_any(SOURCE_ALIASES) {
        Ok(s) => s.to_string(),
        Err(e) => return Err(ToolResult::failure(tool, ToolError::invalid_argument(e))),
    };
    let dest_str = match call.require_string_any(DEST_ALIASES) {
        Ok(d) => d.to_string(),
        Err(e) => return Err(ToolResult::failure(tool, ToolError::invalid_argument(e))),
    };

    let source = match ctx.resolve(Some(&source_str)) {
        Ok(p) => p,
        Err(e) => return Err(ToolResult::failure(tool, ToolError::access_denied(e.to_string()))),
    };
    let dest = match ctx.resolve(Some(&dest_str)) {
        Ok(p) => p,
        Err(e) => return Err(ToolResult::failure(tool, ToolError::access_denied(e.to_string()))),
    };

    if !source.exists() {
        return Err(ToolResult::failure(tool, ToolError::not_found(source_str)));
    }

    let overwrite = call.get_bool("overwrite").unwrap_or(false);
    if dest.exists() && !overwrite {
        return Err(ToolResult::failure(
            tool,
            ToolError::invalid_argument(format!(
                "Destination '{}' already exists; pass overwrite=true to replace it",
                dest_str
            )),
        ));
    }

    Ok((source, dest, source_str, dest_str))
}

/// Execute the move_file tool
pub fn execute_move_file(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let (source, dest, source_str, dest_str) = match resolve_pair(MOVE_FILE, ctx, call) {
        Ok(pair) => pair,
        Err(failure) => return failure,
    };

    // An existing destination was explicitly approved for replacement.
    if dest.exists() {
        let removed = if dest.is_dir() {
            fs::remove_dir_all(&dest)
        } else {
            fs::remove_file(&dest)
        };
        if let Err(e) = removed {
            return ToolResult::failure(
                MOVE_FILE,
                ToolError::execution_failed(format!("Failed to replace destination: {}", e)),
            );
        }
    }

    match fs::rename(&source, &dest) {
        Ok(()) => ToolResult::success(
            MOVE_FILE,
            format!("Moved {} to {}", source_str, dest_str),
        )
        .with_path(dest_str),
        Err(e) => ToolResult::failure(
            MOVE_FILE,
            ToolError::execution_failed(format!("Failed to move: {}", e)),
        ),
    }
}

/// Execute the copy_file tool
pub fn execute_copy_file(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let (source, dest, source_str, dest_str) = match resolve_pair(COPY_FILE, ctx, call) {
        Ok(pair) => pair,
        Err(failure) => return failure,
    };

    let outcome = if source.is_dir() {
        copy_dir_recursive(&source, &dest)
    } else {
        fs::copy(&source, &dest).map(|_| ())
    };

    match outcome {
        Ok(()) => ToolResult::success(
            COPY_FILE,
            format!("Copied {} to {}", source_str, dest_str),
        )
        .with_path(dest_str),
        Err(e) => ToolResult::failure(
            COPY_FILE,
            ToolError::execution_failed(format!("Failed to copy: {}", e)),
        ),
    }
}

fn copy_dir_recursive(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
