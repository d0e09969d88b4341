//! Tool domain model
//!
//! Entities describing registered tools and the calls made against them,
//! plus the uniform result/error value objects every handler returns.

pub mod entities;
pub mod value_objects;

pub use entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
