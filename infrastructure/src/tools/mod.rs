//! Builtin tool implementations.
//!
//! Each tool is a handler function taking the sandbox context and the call,
//! returning the uniform [`ToolResult`](foreman_domain::ToolResult). The
//! [`registry::ToolRegistry`] routes calls to handlers and implements the
//! application's executor port.
//!
//! Handler contract, uniformly applied:
//! - accepted parameter aliases are normalized (`filepath`/`path`, ...)
//! - every path-like argument passes the sandbox before any fs access
//! - failures never escape as errors; they become failed results

pub mod command;
pub mod dir;
pub mod file;
pub mod info;
pub mod registry;
pub mod search;
pub mod transfer;

use foreman_domain::tool::entities::ToolSpec;

/// The full builtin tool catalog.
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(file::create_file_definition())
        .register(file::read_file_definition())
        .register(file::append_file_definition())
        .register(file::delete_file_definition())
        .register(dir::create_directory_definition())
        .register(dir::delete_directory_definition())
        .register(transfer::move_file_definition())
        .register(transfer::copy_file_definition())
        .register(search::find_files_definition())
        .register(search::find_replace_definition())
        .register(info::file_info_definition())
        .register(info::read_env_definition())
        .register(command::run_command_definition())
}
