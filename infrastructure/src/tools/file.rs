//! Single-file tools: create_file, read_file, append_file, delete_file

use foreman_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
use foreman_domain::SandboxContext;
use std::fs;
use std::io::Write;

/// Tool name constants
pub const CREATE_FILE: &str = "create_file";
pub const READ_FILE: &str = "read_file";
pub const APPEND_FILE: &str = "append_file";
pub const DELETE_FILE: &str = "delete_file";

/// Accepted aliases for the target path parameter
const PATH_ALIASES: &[&str] = &["filepath", "path", "file"];

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

pub fn create_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_FILE,
        "Create a file with the given content, overwriting if it exists",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("filepath", "Path of the file to create", true).with_type("path"))
    .with_parameter(ToolParameter::new("content", "Content to write (default: empty)", false))
    .with_parameter(
        ToolParameter::new("create_dirs", "Create missing parent directories", false)
            .with_type("boolean"),
    )
}

pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(READ_FILE, "Read the contents of a file", RiskLevel::Low)
        .with_parameter(ToolParameter::new("filepath", "Path of the file to read", true).with_type("path"))
}

pub fn append_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        APPEND_FILE,
        "Append content to a file, creating it if it does not exist",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("filepath", "Path of the file to append to", true).with_type("path"))
    .with_parameter(ToolParameter::new("content", "Content to append", true))
}

pub fn delete_file_definition() -> ToolDefinition {
    ToolDefinition::new(DELETE_FILE, "Delete a single file", RiskLevel::High)
        .with_parameter(ToolParameter::new("filepath", "Path of the file to delete", true).with_type("path"))
}

/// Execute the create_file tool
pub fn execute_create_file(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string_any(PATH_ALIASES) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(CREATE_FILE, ToolError::invalid_argument(e)),
    };
    let path = match ctx.resolve(Some(path_str)) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(CREATE_FILE, ToolError::access_denied(e.to_string())),
    };

    let content = call.get_string("content").unwrap_or("");

    if call.get_bool("create_dirs").unwrap_or(false) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    return ToolResult::failure(
                        CREATE_FILE,
                        ToolError::execution_failed(format!(
                            "Failed to create parent directories: {}",
                            e
                        )),
                    );
                }
            }
        }
    }

    let bytes = content.len();
    if let Err(e) = fs::write(&path, content) {
        return ToolResult::failure(
            CREATE_FILE,
            ToolError::execution_failed(format!("Failed to create file: {}", e)),
        );
    }

    ToolResult::success(CREATE_FILE, format!("Created {} ({} bytes)", path_str, bytes))
        .with_metadata(ToolResultMetadata {
            bytes: Some(bytes),
            path: Some(path_str.to_string()),
            ..Default::default()
        })
}

/// Execute the read_file tool
pub fn execute_read_file(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string_any(PATH_ALIASES) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(READ_FILE, ToolError::invalid_argument(e)),
    };
    let path = match ctx.resolve(Some(path_str)) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(READ_FILE, ToolError::access_denied(e.to_string())),
    };

    if !path.exists() {
        return ToolResult::failure(READ_FILE, ToolError::not_found(path_str));
    }
    if !path.is_file() {
        return ToolResult::failure(
            READ_FILE,
            ToolError::invalid_argument(format!("'{}' is not a file", path_str)),
        );
    }

    match fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_READ_SIZE => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::invalid_argument(format!(
                    "File too large ({} bytes). Maximum size is {} bytes",
                    meta.len(),
                    MAX_READ_SIZE
                )),
            );
        }
        Ok(_) => {}
        Err(e) => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::execution_failed(format!("Failed to stat file: {}", e)),
            );
        }
    }

    match fs::read_to_string(&path) {
        Ok(content) => {
            let bytes = content.len();
            ToolResult::success(READ_FILE, content).with_metadata(ToolResultMetadata {
                bytes: Some(bytes),
                path: Some(path_str.to_string()),
                ..Default::default()
            })
        }
        Err(e) => ToolResult::failure(
            READ_FILE,
            ToolError::execution_failed(format!("Failed to read file: {}", e)),
        ),
    }
}

/// Execute the append_file tool
pub fn execute_append_file(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string_any(PATH_ALIASES) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(APPEND_FILE, ToolError::invalid_argument(e)),
    };
    let content = match call.require_string("content") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(APPEND_FILE, ToolError::invalid_argument(e)),
    };
    let path = match ctx.resolve(Some(path_str)) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(APPEND_FILE, ToolError::access_denied(e.to_string())),
    };

    let result = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(content.as_bytes()));

    match result {
        Ok(()) => ToolResult::success(
            APPEND_FILE,
            format!("Appended {} bytes to {}", content.len(), path_str),
        )
        .with_metadata(ToolResultMetadata {
            bytes: Some(content.len()),
            path: Some(path_str.to_string()),
            ..Default::default()
        }),
        Err(e) => ToolResult::failure(
            APPEND_FILE,
            ToolError::execution_failed(format!("Failed to append: {}", e)),
        ),
    }
}

/// Execute the delete_file tool
pub fn execute_delete_file(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string_any(PATH_ALIASES) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(DELETE_FILE, ToolError::invalid_argument(e)),
    };
    let path = match ctx.resolve(Some(path_str)) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(DELETE_FILE, ToolError::access_denied(e.to_string())),
    };

    if !path.exists() {
        return ToolResult::failure(DELETE_FILE, ToolError::not_found(path_str));
    }
    if path.is_dir() {
        return ToolResult::failure(
            DELETE_FILE,
            ToolError::invalid_argument(format!(
                "'{}' is a directory; use delete_directory",
                path_str
            )),
        );
    }

    match fs::remove_file(&path) {
        Ok(()) => ToolResult::success(DELETE_FILE, format!("Deleted {}", path_str))
            .with_path(path_str),
        Err(e) => ToolResult::failure(
            DELETE_FILE,
            ToolError::execution_failed(format!("Failed to delete file: {}", e)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> (tempfile::TempDir, SandboxContext) {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        (temp, SandboxContext::new(root))
    }

    #[test]
    fn test_create_and_read_roundtrip() {
        let (_temp, ctx) = sandbox();

        let call = ToolCall::new(CREATE_FILE)
            .with_param("filepath", "a.txt")
            .with_param("content", "hi");
        let result = execute_create_file(&ctx, &call);
        assert!(result.is_success());
        assert_eq!(result.metadata.bytes, Some(2));

        let call = ToolCall::new(READ_FILE).with_param("filepath", "a.txt");
        let result = execute_read_file(&ctx, &call);
        assert!(result.is_success());
        assert_eq!(result.output(), Some("hi"));
    }

    #[test]
    fn test_create_accepts_path_alias() {
        let (_temp, ctx) = sandbox();
        let call = ToolCall::new(CREATE_FILE)
            .with_param("path", "aliased.txt")
            .with_param("content", "x");
        assert!(execute_create_file(&ctx, &call).is_success());
    }

    #[test]
    fn test_create_outside_sandbox_denied() {
        let (_temp, ctx) = sandbox();
        let call = ToolCall::new(CREATE_FILE)
            .with_param("filepath", "../escape.txt")
            .with_param("content", "x");
        let result = execute_create_file(&ctx, &call);
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "ACCESS_DENIED");
    }

    #[test]
    fn test_create_with_dirs() {
        let (_temp, ctx) = sandbox();
        let call = ToolCall::new(CREATE_FILE)
            .with_param("filepath", "deep/nested/a.txt")
            .with_param("content", "x")
            .with_param("create_dirs", true);
        assert!(execute_create_file(&ctx, &call).is_success());
        assert!(ctx.root().join("deep/nested/a.txt").exists());
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (_temp, ctx) = sandbox();
        let call = ToolCall::new(READ_FILE).with_param("filepath", "absent.txt");
        let result = execute_read_file(&ctx, &call);
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[test]
    fn test_append_creates_then_extends() {
        let (_temp, ctx) = sandbox();

        let call = ToolCall::new(APPEND_FILE)
            .with_param("filepath", "log.txt")
            .with_param("content", "one\n");
        assert!(execute_append_file(&ctx, &call).is_success());

        let call = ToolCall::new(APPEND_FILE)
            .with_param("filepath", "log.txt")
            .with_param("content", "two\n");
        assert!(execute_append_file(&ctx, &call).is_success());

        let content = fs::read_to_string(ctx.root().join("log.txt")).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn test_delete_file() {
        let (_temp, ctx) = sandbox();
        fs::write(ctx.root().join("bye.txt"), "x").unwrap();

        let call = ToolCall::new(DELETE_FILE).with_param("filepath", "bye.txt");
        assert!(execute_delete_file(&ctx, &call).is_success());
        assert!(!ctx.root().join("bye.txt").exists());
    }

    #[test]
    fn test_delete_refuses_directory() {
        let (_temp, ctx) = sandbox();
        fs::create_dir(ctx.root().join("subdir")).unwrap();

        let call = ToolCall::new(DELETE_FILE).with_param("filepath", "subdir");
        let result = execute_delete_file(&ctx, &call);
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_missing_filepath_is_invalid_argument() {
        let (_temp, ctx) = sandbox();
        let result = execute_create_file(&ctx, &ToolCall::new(CREATE_FILE));
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
