//! Risk classification for destructive operations.
//!
//! Two independent surfaces feed the confirmation gate: the raw user
//! message (pre-flight, before any inference call) and the concrete
//! [`ToolCall`] about to execute. Both are substring heuristics — they
//! over- and under-trigger, which is why the policy is an injected trait
//! rather than a fixed table. A positive classification never blocks an
//! operation outright; it suspends execution until the operator answers a
//! yes/no prompt.

use crate::tool::entities::ToolCall;

/// A positive risk classification, carried to the confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskWarning {
    /// What triggered the classification (shown to the operator)
    pub reason: String,
    /// The operation about to run, rendered for display
    pub operation: String,
}

impl RiskWarning {
    pub fn new(reason: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            operation: operation.into(),
        }
    }
}

/// Pluggable policy deciding which operations need operator consent.
pub trait RiskPolicy: Send + Sync {
    /// Pre-flight scan of the raw user message.
    fn assess_message(&self, message: &str) -> Option<RiskWarning>;

    /// Per-invocation scan of the concrete call about to execute.
    fn assess_call(&self, call: &ToolCall) -> Option<RiskWarning>;
}

/// Destructive-intent phrases matched against the raw user message.
const RISKY_MESSAGE_PHRASES: &[&str] = &[
    "delete all",
    "delete everything",
    "remove all",
    "remove everything",
    "wipe",
    "erase everything",
    "rm -rf",
    "format",
    "mkfs",
    "dd if=",
    "sudo",
    "chmod 777",
    "chown -r",
    ":(){",
];

/// Destructive command fragments matched against `run_command` arguments.
const RISKY_COMMAND_FRAGMENTS: &[&str] = &[
    "rm -rf",
    "rm -fr",
    "rmdir",
    "del ",
    "format",
    "mkfs",
    "dd if=",
    "sudo",
    "chmod 777",
    "shutdown",
    "reboot",
    ":(){",
];

/// Path prefixes that suggest a system location.
const SENSITIVE_PATH_PREFIXES: &[&str] = &["/etc/", "/usr/", "/var/", "/boot/"];

/// Default substring-heuristic policy.
#[derive(Debug, Default)]
pub struct HeuristicRiskPolicy;

impl HeuristicRiskPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl RiskPolicy for HeuristicRiskPolicy {
    fn assess_message(&self, message: &str) -> Option<RiskWarning> {
        let lower = message.to_lowercase();
        RISKY_MESSAGE_PHRASES
            .iter()
            .find(|phrase| lower.contains(*phrase))
            .map(|phrase| {
                RiskWarning::new(
                    format!("message contains destructive phrase '{}'", phrase),
                    message.trim().to_string(),
                )
            })
    }

    fn assess_call(&self, call: &ToolCall) -> Option<RiskWarning> {
        // Any delete tool is gated unconditionally.
        if call.tool_name.contains("delete") {
            let target = call
                .get_string_any(&["filepath", "path", "dirpath"])
                .unwrap_or("<unspecified>");
            return Some(RiskWarning::new(
                "deletion is irreversible",
                format!("{} {}", call.tool_name, target),
            ));
        }

        // Shell commands are scanned for destructive fragments.
        if call.tool_name == "run_command" {
            if let Some(command) = call.get_string_any(&["command", "cmd"]) {
                let lower = command.to_lowercase();
                if let Some(fragment) = RISKY_COMMAND_FRAGMENTS
                    .iter()
                    .find(|f| lower.contains(*f))
                {
                    return Some(RiskWarning::new(
                        format!("command contains destructive pattern '{}'", fragment),
                        command.to_string(),
                    ));
                }
            }
        }

        // Moves out of dotfile/system-looking locations are gated; copies
        // leave the source intact and pass.
        if call.tool_name == "move_file" {
            if let Some(source) = call.get_string_any(&["source", "src", "from"]) {
                let file_name = source.rsplit('/').next().unwrap_or(source);
                let sensitive = SENSITIVE_PATH_PREFIXES.iter().any(|p| source.starts_with(p))
                    || source.to_lowercase().contains("config")
                    || (file_name.starts_with('.') && file_name.len() > 1);
                if sensitive {
                    return Some(RiskWarning::new(
                        format!("source path '{}' looks like a system or configuration path", source),
                        format!("{} {}", call.tool_name, source),
                    ));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_bulk_delete_flagged() {
        let policy = HeuristicRiskPolicy::new();
        assert!(policy.assess_message("please delete everything in here").is_some());
        assert!(policy.assess_message("Delete ALL the logs").is_some());
    }

    #[test]
    fn test_message_privilege_escalation_flagged() {
        let policy = HeuristicRiskPolicy::new();
        assert!(policy.assess_message("run sudo apt upgrade").is_some());
        assert!(policy.assess_message("chmod 777 the whole tree").is_some());
    }

    #[test]
    fn test_benign_message_passes() {
        let policy = HeuristicRiskPolicy::new();
        assert!(policy.assess_message("create a file called notes.txt").is_none());
        assert!(policy.assess_message("what can you do?").is_none());
    }

    #[test]
    fn test_delete_tools_always_gated() {
        let policy = HeuristicRiskPolicy::new();
        let call = ToolCall::new("delete_file").with_param("filepath", "a.txt");
        let warning = policy.assess_call(&call).unwrap();
        assert!(warning.operation.contains("a.txt"));

        let call = ToolCall::new("delete_directory").with_param("path", "build");
        assert!(policy.assess_call(&call).is_some());
    }

    #[test]
    fn test_destructive_command_gated() {
        let policy = HeuristicRiskPolicy::new();
        let call = ToolCall::new("run_command").with_param("command", "rm -rf ./build");
        assert!(policy.assess_call(&call).is_some());

        let call = ToolCall::new("run_command").with_param("command", "ls -la");
        assert!(policy.assess_call(&call).is_none());
    }

    #[test]
    fn test_move_from_dotfile_gated() {
        let policy = HeuristicRiskPolicy::new();
        let call = ToolCall::new("move_file")
            .with_param("source", ".bashrc")
            .with_param("destination", "backup/bashrc");
        assert!(policy.assess_call(&call).is_some());

        let call = ToolCall::new("move_file")
            .with_param("source", "notes.txt")
            .with_param("destination", "archive/notes.txt");
        assert!(policy.assess_call(&call).is_none());
    }

    #[test]
    fn test_read_tools_pass() {
        let policy = HeuristicRiskPolicy::new();
        let call = ToolCall::new("read_file").with_param("filepath", "a.txt");
        assert!(policy.assess_call(&call).is_none());
    }
}
