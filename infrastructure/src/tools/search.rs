//! Search tools: find_files, find_replace

use foreman_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
use foreman_domain::SandboxContext;
use glob::Pattern;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Tool name constants
pub const FIND_FILES: &str = "find_files";
pub const FIND_REPLACE: &str = "find_replace";

/// Default and maximum recursion depth for find_files
const DEFAULT_MAX_DEPTH: usize = 5;
const DEPTH_CEILING: usize = 32;

/// Maximum number of matches returned
const MAX_RESULTS: usize = 1000;

pub fn find_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        FIND_FILES,
        "Find files whose name matches a glob pattern (e.g. '*.txt'), searching recursively",
        RiskLevel::Low,
    )
    .with_parameter(ToolParameter::new("pattern", "Glob pattern matched against file names", true))
    .with_parameter(
        ToolParameter::new("path", "Directory to search from (default: working directory)", false)
            .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("max_depth", "Maximum recursion depth (default: 5)", false)
            .with_type("number"),
    )
}

pub fn find_replace_definition() -> ToolDefinition {
    ToolDefinition::new(
        FIND_REPLACE,
        "Replace occurrences of a pattern within one file (literal by default, regex opt-in)",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("filepath", "File to modify", true).with_type("path"))
    .with_parameter(ToolParameter::new("pattern", "Text or regex to search for", true))
    .with_parameter(ToolParameter::new("replacement", "Text to substitute", true))
    .with_parameter(
        ToolParameter::new("regex", "Interpret the pattern as a regex (default: false)", false)
            .with_type("boolean"),
    )
}

/// Execute the find_files tool
pub fn execute_find_files(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let pattern_str = match call.require_string("pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(FIND_FILES, ToolError::invalid_argument(e)),
    };
    let pattern = match Pattern::new(pattern_str) {
        Ok(p) => p,
        Err(e) => {
            return ToolResult::failure(
                FIND_FILES,
                ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)),
            )
        }
    };

    let base = match ctx.resolve(call.get_string_any(&["path", "dirpath"])) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(FIND_FILES, ToolError::access_denied(e.to_string())),
    };
    if !base.is_dir() {
        return ToolResult::failure(
            FIND_FILES,
            ToolError::not_found(format!("{} is not a directory", base.display())),
        );
    }

    let max_depth = call
        .get_i64("max_depth")
        .map(|d| d.clamp(1, DEPTH_CEILING as i64) as usize)
        .unwrap_or(DEFAULT_MAX_DEPTH);

    let mut matches = Vec::new();
    walk(&base, &base, &pattern, max_depth, &mut matches);

    let truncated = matches.len() > MAX_RESULTS;
    matches.truncate(MAX_RESULTS);

    let match_count = matches.len();
    let mut output = if matches.is_empty() {
        format!("No files matching '{}'", pattern_str)
    } else {
        matches.join("\n")
    };
    if truncated {
        output.push_str(&format!("\n... (limited to {} results)", MAX_RESULTS));
    }

    ToolResult::success(FIND_FILES, output).with_metadata(ToolResultMetadata {
        duration_ms: Some(start.elapsed().as_millis() as u64),
        match_count: Some(match_count),
        ..Default::default()
    })
}

/// Depth-bounded recursive walk collecting matches relative to `base`.
fn walk(base: &Path, dir: &Path, pattern: &Pattern, depth_left: usize, out: &mut Vec<String>) {
    if depth_left == 0 || out.len() > MAX_RESULTS {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        // Unreadable directories are skipped, not fatal.
        Err(_) => return,
    };

    let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    paths.sort_by_key(|e| e.file_name());

    for entry in paths {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            walk(base, &path, pattern, depth_left - 1, out);
        } else if pattern.matches(&name) {
            let shown = path
                .strip_prefix(base)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| path.display().to_string());
            out.push(shown);
        }
    }
}

/// Execute the find_replace tool
pub fn execute_find_replace(ctx: &SandboxContext, call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string_any(&["filepath", "path", "file"]) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(FIND_REPLACE, ToolError::invalid_argument(e)),
    };
    let pattern = match call.require_string("pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(FIND_REPLACE, ToolError::invalid_argument(e)),
    };
    let replacement = match call.require_string("replacement") {
        Ok(r) => r,
        Err(e) => return ToolResult::failure(FIND_REPLACE, ToolError::invalid_argument(e)),
    };

    let path = match ctx.resolve(Some(path_str)) {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(FIND_REPLACE, ToolError::access_denied(e.to_string())),
    };
    if !path.is_file() {
        return ToolResult::failure(FIND_REPLACE, ToolError::not_found(path_str));
    }

    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            return ToolResult::failure(
                FIND_REPLACE,
                ToolError::execution_failed(format!("Failed to read file: {}", e)),
            )
        }
    };

    let use_regex = call.get_bool("regex").unwrap_or(false);
    let (replaced, count) = if use_regex {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                return ToolResult::failure(
                    FIND_REPLACE,
                    ToolError::invalid_argument(format!("Invalid regex: {}", e)),
                )
            }
        };
        let count = re.find_iter(&content).count();
        (re.replace_all(&content, replacement).into_owned(), count)
    } else {
        let count = content.matches(pattern).count();
        (content.replace(pattern, replacement), count)
    };

    if count > 0 {
        if let Err(e) = fs::write(&path, &replaced) {
            return ToolResult::failure(
                FIND_REPLACE,
                ToolError::execution_failed(format!("Failed to write file: {}", e)),
            );
        }
    }

    ToolResult::success(
        FIND_REPLACE,
        format!("Replaced {} occurrence(s) in {}", count, path_str),
    )
    .with_metadata(ToolResultMetadata {
        match_count: Some(count),
        path: Some(path_str.to_string()),
        ..Default::default()
    })
}
