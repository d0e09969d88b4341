//! Lookup tools: file_info, read_env

use chrono::{DateTime, Local};
use foreman_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
use foreman_domain::SandboxContext;
use std::fs;
use std::time::SystemTime;

/// Tool name constants
pub const FILE_INFO: &str = "file_info";
pub const READ_ENV: &str = "read_env";

/// Variable names containing any of these substrings are always masked,
/// regardless of how they were requested.
const SECRET_NAME_FRAGMENTS: &[&str] = &["password", "secret", "key", "token", "auth"];
const MASK: &str = "********";

pub fn file_info_definition() -> ToolDefinition {
    ToolDefinition::new(
        FILE_INFO,
        "Report size, timestamps, and kind of a file or directory",
        RiskLevel::Low,
    )
    .with_parameter(ToolParameter::new("filepath", "Path to inspect", true).with_type("path"))
}

pub fn read_env_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_ENV,
        "Read environment variables by name or prefix. Secret-looking names are masked.",
        RiskLevel::Low,
    )
    .with_parameter(ToolParameter::new("name", "Exact variable name to read", false))
    .with_parameter(ToolParameter::new("prefix", "List variables whose name starts with this", false))
}

/// Classify a path by extension into a coarse human-readable kind.
fn classify_kind(path: &std::path::Path) -> &'static str {
    if path.is_dir() {
        return "directory";
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("rs") | Some("py") | Some("js") | Some("ts") | Some("go") | Some("c")
        | Some("cpp") | Some("h") | Some("java") | Some("sh") => "source code",
        Some("txt") | Some("md") | Some("rst") | Some("log") => "text",
        Some("json") | Some("yaml") | Some("yml") | Some("toml") | Some("ini") | Some("xml") => {
            "structured data"
        }
        Some("png") | Some("jpg") | Some("jpeg") | Some("gif") | Some("svg") | Some("webp") => {
            "image"
        }
        Some("zip") | Some("tar") | Some("gz") | Some("xz") | Some("zst") | Some("7z") => {
            "archive"
        }
        Some("mp3") | Some("wav") | Some("flac") | Some("ogg") => "audio",
        Some("mp4") | Some("mkv") | Some("webm") | Some("avi") => "video",
        Some("pdf") => "document",
        Some(_) => "file",
        None => "file",
    }
}

fn format_time(time: std::io::Result<SystemTime>) -> String {
    match time {
        Ok(t) => DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => "unknown".to_string(),
    }
}

/// Execute the file_info tool
pub fn execute_file_info(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string_any(&["filepath", "path", "file"]) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(FILE_INFO, ToolError::invalid_argument(e)),
    };
    let path = match ctx.resolve(Some(path_str)) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(FILE_INFO, ToolError::access_denied(e.to_string())),
    };

    let metadata = match fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return ToolResult::failure(FILE_INFO, ToolError::not_found(path_str));
        }
        Err(e) => {
            return ToolResult::failure(
                FILE_INFO,
                ToolError::execution_failed(format!("Failed to stat: {}", e)),
            );
        }
    };

    let kind = classify_kind(&path);
    let output = format!(
        "path: {}\nkind: {}\nsize: {} bytes\nmodified: {}\ncreated: {}",
        path_str,
        kind,
        metadata.len(),
        format_time(metadata.modified()),
        format_time(metadata.created()),
    );

    ToolResult::success(FILE_INFO, output).with_metadata(ToolResultMetadata {
        bytes: Some(metadata.len() as usize),
        path: Some(path_str.to_string()),
        ..Default::default()
    })
}

/// True when the variable name must be masked.
fn is_secret_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    SECRET_NAME_FRAGMENTS.iter().any(|f| lower.contains(f))
}

fn render_var(name: &str, value: &str) -> String {
    if is_secret_name(name) {
        format!("{}={}", name, MASK)
    } else {
        format!("{}={}", name, value)
    }
}

/// Execute the read_env tool
pub fn execute_read_env(call: &ToolCall) -> ToolResult {
    if let Some(name) = call.get_string("name") {
        return match std::env::var(name) {
            Ok(value) => ToolResult::success(READ_ENV, render_var(name, &value)),
            Err(_) => ToolResult::failure(
                READ_ENV,
                ToolError::not_found(format!("environment variable {}", name)),
            ),
        };
    }

    let prefix = call.get_string_any(&["prefix", "filter"]).unwrap_or("");
    let mut vars: Vec<String> = std::env::vars()
        .filter(|(name, _)| name.starts_with(prefix))
        .map(|(name, value)| render_var(&name, &value))
        .collect();
    vars.sort();

    let count = vars.len();
    let output = if vars.is_empty() {
        format!("No environment variables with prefix '{}'", prefix)
    } else {
        vars.join("\n")
    };

    ToolResult::success(READ_ENV, output).with_metadata(ToolResultMetadata {
        match_count: Some(count),
        ..Default::default()
    })
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
    fn test_file_info_reports_fields() {
        let (_temp, ctx) = sandbox();
        fs::write(ctx.root().join("notes.md"), "hello").unwrap();

        let call = ToolCall::new(FILE_INFO).with_param("filepath", "notes.md");
        let result = execute_file_info(&ctx, &call);

        assert!(result.is_success());
        let output = result.output().unwrap();
        assert!(output.contains("kind: text"));
        assert!(output.contains("size: 5 bytes"));
        assert!(output.contains("modified: "));
    }

    #[test]
    fn test_file_info_classifies_directory() {
        let (_temp, ctx) = sandbox();
        fs::create_dir(ctx.root().join("sub")).unwrap();

        let call = ToolCall::new(FILE_INFO).with_param("filepath", "sub");
        let result = execute_file_info(&ctx, &call);
        assert!(result.output().unwrap().contains("kind: directory"));
    }

    #[test]
    fn test_file_info_missing_is_not_found() {
        let (_temp, ctx) = sandbox();
        let call = ToolCall::new(FILE_INFO).with_param("filepath", "ghost");
        let result = execute_file_info(&ctx, &call);
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[test]
    fn test_classify_kind_by_extension() {
        use std::path::Path;
        assert_eq!(classify_kind(Path::new("a.rs")), "source code");
        assert_eq!(classify_kind(Path::new("a.json")), "structured data");
        assert_eq!(classify_kind(Path::new("a.png")), "image");
        assert_eq!(classify_kind(Path::new("a.weird")), "file");
        assert_eq!(classify_kind(Path::new("noext")), "file");
    }

    #[test]
    fn test_read_env_by_name() {
        std::env::set_var("FOREMAN_TEST_PLAIN", "visible");
        let call = ToolCall::new(READ_ENV).with_param("name", "FOREMAN_TEST_PLAIN");
        let result = execute_read_env(&call);

        assert!(result.is_success());
        assert_eq!(result.output(), Some("FOREMAN_TEST_PLAIN=visible"));
    }

    #[test]
    fn test_secret_masked_even_when_requested_by_name() {
        std::env::set_var("FOREMAN_TEST_DB_PASSWORD", "hunter2");
        let call = ToolCall::new(READ_ENV).with_param("name", "FOREMAN_TEST_DB_PASSWORD");
        let result = execute_read_env(&call);

        assert!(result.is_success());
        let output = result.output().unwrap();
        assert!(!output.contains("hunter2"));
        assert!(output.contains(MASK));
    }

    #[test]
    fn test_prefix_listing_masks_secrets() {
        std::env::set_var("FOREMANPFX_PLAIN", "ok");
        std::env::set_var("FOREMANPFX_API_TOKEN", "sensitive");

        let call = ToolCall::new(READ_ENV).with_param("prefix", "FOREMANPFX_");
        let result = execute_read_env(&call);

        let output = result.output().unwrap();
        assert!(output.contains("FOREMANPFX_PLAIN=ok"));
        assert!(output.contains(&format!("FOREMANPFX_API_TOKEN={}", MASK)));
        assert!(!output.contains("sensitive"));
    }

    #[test]
    fn test_missing_variable_is_not_found() {
        let call = ToolCall::new(READ_ENV).with_param("name", "FOREMAN_TEST_DOES_NOT_EXIST");
        let result = execute_read_env(&call);
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[test]
    fn test_is_secret_name() {
        assert!(is_secret_name("DB_PASSWORD"));
        assert!(is_secret_name("api_key"));
        assert!(is_secret_name("GITHUB_TOKEN"));
        assert!(is_secret_name("AUTH_HEADER"));
        assert!(!is_secret_name("HOME"));
        assert!(!is_secret_name("PATH"));
    }
}
