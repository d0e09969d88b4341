//! Multi-action executor.
//!
//! Runs an ordered list of tool calls strictly sequentially — file and
//! shell operations often have ordering dependencies (create a directory,
//! then write a file inside it) that parallel execution would break.
//! Execution never short-circuits: every listed call runs, and the report
//! aggregates partial success.

use crate::ports::tool_executor::ToolExecutorPort;
use foreman_domain::tool::entities::ToolCall;
use foreman_domain::tool::value_objects::{ToolError, ToolResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Aggregate status of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every result succeeded
    AllSucceeded,
    /// No result succeeded
    AllFailed,
    /// Some succeeded, some failed
    Partial,
}

/// Ordered per-action results plus the aggregate status
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub results: Vec<ToolResult>,
    pub status: BatchStatus,
}

impl BatchReport {
    fn from_results(results: Vec<ToolResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let status = if succeeded == results.len() {
            BatchStatus::AllSucceeded
        } else if succeeded == 0 {
            BatchStatus::AllFailed
        } else {
            BatchStatus::Partial
        };
        Self { results, status }
    }

    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.succeeded_count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.status == BatchStatus::AllSucceeded
    }

    /// Mechanical one-line-per-action report, used directly when the
    /// summarization inference call is unavailable.
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for (i, result) in self.results.iter().enumerate() {
            let line = if result.is_success() {
                format!(
                    "{}. {} - ok{}",
                    i + 1,
                    result.tool_name,
                    result
                        .output()
                        .map(|o| format!(": {}", foreman_domain::truncate(o, 120)))
                        .unwrap_or_default()
                )
            } else {
                format!(
                    "{}. {} - failed: {}",
                    i + 1,
                    result.tool_name,
                    result
                        .error()
                        .map(|e| e.message.clone())
                        .unwrap_or_else(|| "unknown error".to_string())
                )
            };
            out.push_str(&line);
            out.push('\n');
        }
        let summary = match self.status {
            BatchStatus::AllSucceeded => format!("All {} action(s) succeeded.", self.results.len()),
            BatchStatus::AllFailed => format!("All {} action(s) failed.", self.results.len()),
            BatchStatus::Partial => format!(
                "{} of {} action(s) succeeded.",
                self.succeeded_count(),
                self.results.len()
            ),
        };
        out.push_str(&summary);
        out
    }
}

/// Use case executing an ordered batch of tool calls
pub struct ExecuteActionsUseCase<T: ToolExecutorPort> {
    tool_executor: Arc<T>,
}

impl<T: ToolExecutorPort> ExecuteActionsUseCase<T> {
    pub fn new(tool_executor: Arc<T>) -> Self {
        Self { tool_executor }
    }

    /// Execute every call in order. Unknown tool names produce a
    /// synthesized failure without touching the registry; a failed call
    /// never aborts the rest of the batch.
    pub async fn run_batch(&self, calls: &[ToolCall]) -> BatchReport {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            if !self.tool_executor.has_tool(&call.tool_name) {
                warn!(tool = %call.tool_name, "Unknown tool requested");
                results.push(ToolResult::failure(
                    &call.tool_name,
                    ToolError::not_found(format!("Unknown tool: {}", call.tool_name)),
                ));
                continue;
            }

            debug!(tool = %call.tool_name, "Executing action");
            results.push(self.tool_executor.execute(call).await);
        }

        BatchReport::from_results(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use foreman_domain::tool::entities::{RiskLevel, ToolDefinition, ToolSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Executor whose `fail` tool always fails and `ok` tool always
    /// succeeds; counts invocations so tests can assert the registry was
    /// never touched for unknown names.
    struct ScriptedExecutor {
        spec: ToolSpec,
        invocations: AtomicUsize,
    }

    impl ScriptedExecutor {
        fn new() -> Self {
            let spec = ToolSpec::new()
                .register(ToolDefinition::new("ok", "always succeeds", RiskLevel::Low))
                .register(ToolDefinition::new("fail", "always fails", RiskLevel::Low));
            Self {
                spec,
                invocations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for ScriptedExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            if call.tool_name == "fail" {
                ToolResult::failure("fail", ToolError::execution_failed("scripted failure"))
            } else {
                ToolResult::success("ok", "done")
            }
        }
    }

    #[tokio::test]
    async fn test_all_succeeded() {
        let use_case = ExecuteActionsUseCase::new(Arc::new(ScriptedExecutor::new()));
        let report = use_case
            .run_batch(&[ToolCall::new("ok"), ToolCall::new("ok")])
            .await;

        assert_eq!(report.status, BatchStatus::AllSucceeded);
        assert_eq!(report.succeeded_count(), 2);
    }

    #[tokio::test]
    async fn test_all_failed() {
        let use_case = ExecuteActionsUseCase::new(Arc::new(ScriptedExecutor::new()));
        let report = use_case
            .run_batch(&[ToolCall::new("fail"), ToolCall::new("fail")])
            .await;

        assert_eq!(report.status, BatchStatus::AllFailed);
        assert_eq!(report.failed_count(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_short_circuit() {
        let executor = Arc::new(ScriptedExecutor::new());
        let use_case = ExecuteActionsUseCase::new(executor.clone());
        let report = use_case
            .run_batch(&[
                ToolCall::new("ok"),
                ToolCall::new("fail"),
                ToolCall::new("ok"),
            ])
            .await;

        assert_eq!(report.status, BatchStatus::Partial);
        assert_eq!(report.results.len(), 3);
        // Order preserved: the failure sits in the middle.
        assert!(report.results[0].is_success());
        assert!(!report.results[1].is_success());
        assert!(report.results[2].is_success());
        // The third call really ran.
        assert_eq!(executor.invocations.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unknown_tool_synthesized_without_invocation() {
        let executor = Arc::new(ScriptedExecutor::new());
        let use_case = ExecuteActionsUseCase::new(executor.clone());
        let report = use_case.run_batch(&[ToolCall::new("nonexistent")]).await;

        assert_eq!(report.status, BatchStatus::AllFailed);
        assert_eq!(report.results[0].error().unwrap().code, "NOT_FOUND");
        assert_eq!(executor.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_render_plain_mentions_partial_counts() {
        let use_case = ExecuteActionsUseCase::new(Arc::new(ScriptedExecutor::new()));
        let report = use_case
            .run_batch(&[ToolCall::new("ok"), ToolCall::new("fail")])
            .await;

        let rendered = report.render_plain();
        assert!(rendered.contains("1 of 2"));
        assert!(rendered.contains("scripted failure"));
    }
}
