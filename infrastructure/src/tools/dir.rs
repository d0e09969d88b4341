//! Directory tools: create_directory, delete_directory

use foreman_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use foreman_domain::SandboxContext;
use std::fs;

/// Tool name constants
pub const CREATE_DIRECTORY: &str = "create_directory";
pub const DELETE_DIRECTORY: &str = "delete_directory";

/// Accepted aliases for the directory path parameter
const PATH_ALIASES: &[&str] = &["dirpath", "path", "directory"];

pub fn create_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_DIRECTORY,
        "Create a directory, including missing parents",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("dirpath", "Path of the directory to create", true).with_type("path"))
}

pub fn delete_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        DELETE_DIRECTORY,
        "Delete a directory. Refuses non-empty directories unless 'recursive' is set.",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("dirpath", "Path of the directory to delete", true).with_type("path"))
    .with_parameter(
        ToolParameter::new("recursive", "Delete contents as well (default: false)", false)
            .with_type("boolean"),
    )
}

/// Execute the create_directory tool
pub fn execute_create_directory(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string_any(PATH_ALIASES) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(CREATE_DIRECTORY, ToolError::invalid_argument(e)),
    };
    let path = match ctx.resolve(Some(path_str)) {
        Ok(p) => p,
        Err(e) => {
            return ToolResult::failure(CREATE_DIRECTORY, ToolError::access_denied(e.to_string()))
        }
    };

    match fs::create_dir_all(&path) {
        Ok(()) => ToolResult::success(CREATE_DIRECTORY, format!("Created directory {}", path_str))
            .with_path(path_str),
        Err(e) => ToolResult::failure(
            CREATE_DIRECTORY,
            ToolError::execution_failed(format!("Failed to create directory: {}", e)),
        ),
    }
}

/// Execute the delete_directory tool
pub fn execute_delete_directory(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string_any(PATH_ALIASES) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(DELETE_DIRECTORY, ToolError::invalid_argument(e)),
    };
    let path = match ctx.resolve(Some(path_str)) {
        Ok(p) => p,
        Err(e) => {
            return ToolResult::failure(DELETE_DIRECTORY, ToolError::access_denied(e.to_string()))
        }
    };

    // The sandbox root is the session's working directory; removing it
    // would leave every later operation dangling.
    if ctx.is_root(&path) {
        return ToolResult::failure(
            DELETE_DIRECTORY,
            ToolError::invalid_argument("Refusing to delete the working directory itself"),
        );
    }

    if !path.exists() {
        return ToolResult::failure(DELETE_DIRECTORY, ToolError::not_found(path_str));
    }
    if !path.is_dir() {
        return ToolResult::failure(
            DELETE_DIRECTORY,
            ToolError::invalid_argument(format!("'{}' is not a directory", path_str)),
        );
    }

    let recursive = call.get_bool("recursive").unwrap_or(false);

    if !recursive {
        let occupied = match fs::read_dir(&path) {
            Ok(mut entries) => entries.next().is_some(),
            Err(e) => {
                return ToolResult::failure(
                    DELETE_DIRECTORY,
                    ToolError::execution_failed(format!("Failed to inspect directory: {}", e)),
                )
            }
        };
        if occupied {
            return ToolResult::failure(
                DELETE_DIRECTORY,
                ToolError::invalid_argument(format!(
                    "'{}' is not empty; pass recursive=true to delete its contents",
                    path_str
                )),
            );
        }
    }

    let outcome = if recursive {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_dir(&path)
    };

    match outcome {
        Ok(()) => ToolResult::success(DELETE_DIRECTORY, format!("Deleted directory {}", path_str))
            .with_path(path_str),
        Err(e) => ToolResult::failure(
            DELETE_DIRECTORY,
            ToolError::execution_failed(format!("Failed to delete directory: {}", e)),
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
    fn test_create_directory_with_parents() {
        let (_temp, ctx) = sandbox();
        let call = ToolCall::new(CREATE_DIRECTORY).with_param("dirpath", "a/b/c");
        assert!(execute_create_directory(&ctx, &call).is_success());
        assert!(ctx.root().join("a/b/c").is_dir());
    }

    #[test]
    fn test_delete_empty_directory() {
        let (_temp, ctx) = sandbox();
        fs::create_dir(ctx.root().join("empty")).unwrap();

        let call = ToolCall::new(DELETE_DIRECTORY).with_param("dirpath", "empty");
        assert!(execute_delete_directory(&ctx, &call).is_success());
        assert!(!ctx.root().join("empty").exists());
    }

    #[test]
    fn test_delete_refuses_sandbox_root() {
        let (_temp, ctx) = sandbox();
        let call = ToolCall::new(DELETE_DIRECTORY).with_param("dirpath", ".");
        let result = execute_delete_directory(&ctx, &call);

        assert!(!result.is_success());
        assert!(result.error().unwrap().message.contains("working directory"));
        assert!(ctx.root().exists());
    }

    #[test]
    fn test_delete_refuses_non_empty_without_recursive() {
        let (_temp, ctx) = sandbox();
        fs::create_dir(ctx.root().join("full")).unwrap();
        fs::write(ctx.root().join("full/x.txt"), "x").unwrap();

        let call = ToolCall::new(DELETE_DIRECTORY).with_param("dirpath", "full");
        let result = execute_delete_directory(&ctx, &call);

        assert!(!result.is_success());
        assert!(result.error().unwrap().message.contains("not empty"));
        assert!(ctx.root().join("full/x.txt").exists());
    }

    #[test]
    fn test_delete_recursive() {
        let (_temp, ctx) = sandbox();
        fs::create_dir_all(ctx.root().join("full/sub")).unwrap();
        fs::write(ctx.root().join("full/sub/x.txt"), "x").unwrap();

        let call = ToolCall::new(DELETE_DIRECTORY)
            .with_param("dirpath", "full")
            .with_param("recursive", true);
        assert!(execute_delete_directory(&ctx, &call).is_success());
        assert!(!ctx.root().join("full").exists());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (_temp, ctx) = sandbox();
        let call = ToolCall::new(DELETE_DIRECTORY).with_param("dirpath", "ghost");
        let result = execute_delete_directory(&ctx, &call);
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }
}
