//! Console output formatting.

use colored::Colorize;
use foreman_application::{BatchStatus, TurnOutcome};

/// Renders turn outcomes for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render one completed turn.
    pub fn render(outcome: &TurnOutcome) -> String {
        let mut out = String::new();

        if outcome.cancelled {
            out.push_str(&format!("{}\n", outcome.reply.yellow()));
            return out;
        }

        out.push_str(&outcome.reply);
        out.push('\n');

        if let Some(report) = &outcome.report {
            out.push('\n');
            for (i, result) in report.results.iter().enumerate() {
                let line = if result.is_success() {
                    format!("  {} {}. {}", "ok".green(), i + 1, result.tool_name)
                } else {
                    let message = result
                        .error()
                        .map(|e| e.message.as_str())
                        .unwrap_or("unknown error");
                    format!(
                        "  {} {}. {} - {}",
                        "failed".red(),
                        i + 1,
                        result.tool_name,
                        message
                    )
                };
                out.push_str(&line);
                out.push('\n');
            }
            out.push_str(&format!("  {}\n", Self::status_line(report.status, report)));
        }

        for nested in &outcome.nested {
            out.push_str(&format!(
                "  {} {} {}\n",
                "->".cyan(),
                nested.action.bold(),
                nested.reply.dimmed()
            ));
        }

        out
    }

    fn status_line(
        status: BatchStatus,
        report: &foreman_application::BatchReport,
    ) -> String {
        match status {
            BatchStatus::AllSucceeded => format!(
                "{}",
                format!("{} action(s) completed", report.results.len()).green()
            ),
            BatchStatus::AllFailed => format!(
                "{}",
                format!("all {} action(s) failed", report.results.len()).red()
            ),
            BatchStatus::Partial => format!(
                "{}",
                format!(
                    "{} of {} action(s) succeeded",
                    report.succeeded_count(),
                    report.results.len()
                )
                .yellow()
            ),
        }
    }

    /// Render a model listing.
    pub fn render_models(models: &[foreman_application::ModelInfo]) -> String {
        if models.is_empty() {
            return "No models installed on the backend.".to_string();
        }
        let mut out = String::from("Installed models:\n");
        for model in models {
            out.push_str(&format!(
                "  - {} ({:.1} GB)\n",
                model.name,
                model.size_bytes as f64 / 1_000_000_000.0
            ));
        }
        out
    }
}
