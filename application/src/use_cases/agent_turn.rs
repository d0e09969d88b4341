//! Agent turn use case.
//!
//! The top-level state machine sequencing one user turn to completion:
//!
//! ```text
//! Idle -> RiskCheck -> Inferring -> Extracting
//!      -> { Executing | Retrying | PassThrough }
//!      -> Summarizing -> RecommendHandling -> HistoryUpdate -> Idle
//! ```
//!
//! One logical thread of control per conversation: a turn runs to
//! completion before the next is accepted, and interactive prompts block
//! the loop entirely. The bounded conversation history and the sandbox are
//! the only state shared across turns, both mutated only from here.

use crate::ports::confirmation::{ConfirmationPort, RecommendationChoice};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::ProgressPort;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::execute_actions::{BatchReport, ExecuteActionsUseCase};
use foreman_domain::tool::entities::ToolSpec;
use foreman_domain::{
    extract_intents, has_intent_markers, looks_like_action_request, parse_recommendation,
    truncate, ConversationHistory, Message, RiskPolicy,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Maximum bytes of a nested action result shown to the operator.
const NESTED_RESULT_DISPLAY_LIMIT: usize = 300;

/// Instruction reissued when extraction misses on an action-looking request.
const RETRY_INSTRUCTION: &str = "Your previous reply did not contain a parseable action. \
Reply with ONLY one JSON object and nothing else - no prose, no code fences. \
Use {\"tool\": \"<name>\", \"parameters\": {...}} for a single action or \
{\"actions\": [{\"tool\": ..., \"parameters\": ...}, ...]} for several.";

/// Errors that terminate the current turn
#[derive(Debug, Error)]
pub enum TurnError {
    /// The inference call itself failed; the turn is aborted and the
    /// gateway's remediation guidance is surfaced to the operator.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// One user request, bound to the model answering it
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub message: String,
    pub model: String,
}

impl TurnRequest {
    pub fn new(message: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            model: model.into(),
        }
    }
}

/// Feature switches for one turn.
///
/// Nested turns spawned by the recommendation sub-loop run with both
/// switches off: recommendations to bound recursion to one level, the risk
/// pre-check because the operator already consented at recommendation
/// level.
#[derive(Debug, Clone, Copy)]
pub struct TurnOptions {
    pub check_risky_message: bool,
    pub handle_recommendations: bool,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            check_risky_message: true,
            handle_recommendations: true,
        }
    }
}

impl TurnOptions {
    pub fn nested() -> Self {
        Self {
            check_risky_message: false,
            handle_recommendations: false,
        }
    }
}

/// Truncated outcome of one recommendation action
#[derive(Debug, Clone)]
pub struct NestedActionResult {
    pub action: String,
    pub reply: String,
}

/// Result of one completed turn
#[derive(Debug)]
pub struct TurnOutcome {
    /// Final user-facing text
    pub reply: String,
    /// Present when a batch of actions was executed
    pub report: Option<BatchReport>,
    /// The operator declined a gated operation; reported as a no-op
    pub cancelled: bool,
    /// Results of consented recommendation actions, in proposal order
    pub nested: Vec<NestedActionResult>,
}

impl TurnOutcome {
    fn conversational(reply: String) -> Self {
        Self {
            reply,
            report: None,
            cancelled: false,
            nested: Vec::new(),
        }
    }

    fn cancelled(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            report: None,
            cancelled: true,
            nested: Vec::new(),
        }
    }
}

/// Use case driving one full agent turn
pub struct AgentTurnUseCase<G: LlmGateway, T: ToolExecutorPort> {
    gateway: Arc<G>,
    tool_executor: Arc<T>,
    actions: ExecuteActionsUseCase<T>,
    risk_policy: Arc<dyn RiskPolicy>,
    confirmation: Arc<dyn ConfirmationPort>,
    progress: Arc<dyn ProgressPort>,
}

impl<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> AgentTurnUseCase<G, T> {
    pub fn new(
        gateway: Arc<G>,
        tool_executor: Arc<T>,
        risk_policy: Arc<dyn RiskPolicy>,
        confirmation: Arc<dyn ConfirmationPort>,
        progress: Arc<dyn ProgressPort>,
    ) -> Self {
        Self {
            gateway,
            actions: ExecuteActionsUseCase::new(tool_executor.clone()),
            tool_executor,
            risk_policy,
            confirmation,
            progress,
        }
    }

    /// Process one user turn to completion.
    ///
    /// Appends exactly one user and one assistant message to `history`
    /// once an assistant reply exists, regardless of how many tool calls
    /// ran inside. Declining the pre-flight risk prompt terminates the
    /// turn before any inference and leaves history untouched.
    pub fn handle_turn<'a>(
        &'a self,
        request: &'a TurnRequest,
        history: &'a mut ConversationHistory,
        options: TurnOptions,
    ) -> Pin<Box<dyn Future<Output = Result<TurnOutcome, TurnError>> + Send + 'a>> {
        Box::pin(async move {
        let message = request.message.trim();

        // RiskCheck: pre-flight scan of the raw message. Consent granted
        // here carries through to the per-call gate - one prompt per turn.
        let mut consented = !options.check_risky_message;
        if options.check_risky_message {
            if let Some(warning) = self.risk_policy.assess_message(message) {
                self.progress.stop();
                if !self.confirmation.confirm_risky(&warning).await {
                    info!("Risky request declined by operator");
                    return Ok(TurnOutcome::cancelled(
                        "Operation cancelled. Nothing was executed.",
                    ));
                }
                consented = true;
            }
        }

        // Inferring
        self.progress.start("Thinking");
        let mut messages =
            Vec::with_capacity(history.messages().len() + 2);
        messages.push(Message::system(build_system_prompt(
            self.tool_executor.tool_spec(),
        )));
        messages.extend_from_slice(history.messages());
        messages.push(Message::user(message));

        let reply = match self.gateway.chat(&request.model, &messages).await {
            Ok(reply) => reply,
            Err(e) => {
                self.progress.stop();
                return Err(e.into());
            }
        };

        // Extracting, with at most one stricter retry
        let mut final_reply = reply.clone();
        let mut intents = extract_intents(&reply);

        if intents.is_none()
            && looks_like_action_request(message)
            && !has_intent_markers(&reply)
        {
            debug!("No intent found in action-looking request, retrying once");
            let mut retry_messages = messages.clone();
            retry_messages.push(Message::assistant(reply.clone()));
            retry_messages.push(Message::user(RETRY_INSTRUCTION));

            match self.gateway.chat(&request.model, &retry_messages).await {
                Ok(second) => {
                    // The retry's result is final regardless of outcome.
                    intents = extract_intents(&second);
                    final_reply = second;
                }
                Err(e) => {
                    // The first reply is still usable; the retry is best-effort.
                    warn!(error = %e, "Stricter retry failed, keeping first reply");
                }
            }
        }

        let mut outcome = match intents {
            // PassThrough: conversational reply, routed straight onward
            None => {
                self.progress.stop();
                TurnOutcome::conversational(final_reply)
            }

            // Executing
            Some(found) => {
                let calls = found.into_calls();

                // Per-call risk gate; skipped when consent was already given.
                if !consented {
                    let warning = calls
                        .iter()
                        .find_map(|call| self.risk_policy.assess_call(call));
                    if let Some(warning) = warning {
                        self.progress.stop();
                        if !self.confirmation.confirm_risky(&warning).await {
                            info!("Risky action declined by operator");
                            let reply =
                                "Operation cancelled. Nothing was executed.".to_string();
                            history.push_turn(message, &reply);
                            return Ok(TurnOutcome::cancelled(reply));
                        }
                    }
                }

                self.progress.start("Executing actions");
                let report = self.actions.run_batch(&calls).await;

                // Summarizing: a second inference call phrases the report;
                // its failure falls back to the mechanical rendering.
                let summary = self.summarize(&request.model, message, &report).await;
                self.progress.stop();

                TurnOutcome {
                    reply: summary,
                    report: Some(report),
                    cancelled: false,
                    nested: Vec::new(),
                }
            }
        };

        // HistoryUpdate: exactly one user + one assistant turn.
        history.push_turn(message, &outcome.reply);

        // RecommendHandling: only on the user-facing text, only when the
        // turn was not an unqualified success (successful batches already
        // got their terse summary).
        if options.handle_recommendations && self.should_surface_recommendation(&outcome) {
            if let Some(recommendation) = parse_recommendation(&outcome.reply) {
                self.progress.stop();
                let choice = self
                    .confirmation
                    .review_recommendation(&recommendation)
                    .await;

                if choice == RecommendationChoice::Execute {
                    for action in &recommendation.actions {
                        let nested_request =
                            TurnRequest::new(action.clone(), request.model.clone());

                        // One level deep only: nested options disable both
                        // the recommendation loop and the risk pre-check.
                        let fut = self.handle_turn(
                            &nested_request,
                            history,
                            TurnOptions::nested(),
                        );

                        // A failed nested action never aborts the rest.
                        let summary = match fut.await {
                            Ok(nested) => truncate(&nested.reply, NESTED_RESULT_DISPLAY_LIMIT),
                            Err(e) => format!("failed: {}", e),
                        };
                        outcome.nested.push(NestedActionResult {
                            action: action.clone(),
                            reply: summary,
                        });
                    }
                }
            }
        }

        Ok(outcome)
        })
    }

    fn should_surface_recommendation(&self, outcome: &TurnOutcome) -> bool {
        match &outcome.report {
            Some(report) => !report.all_succeeded(),
            None => true,
        }
    }

    async fn summarize(&self, model: &str, message: &str, report: &BatchReport) -> String {
        let plain = report.render_plain();
        let prompt = format!(
            "The user asked: {}\n\nThese actions were executed:\n{}\n\n\
             Write one short plain-language status report for the user. \
             Mention failures plainly. Do not invent actions that are not listed.",
            message, plain
        );
        let messages = [Message::user(prompt)];

        match self.gateway.chat(model, &messages).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => plain,
            Err(e) => {
                warn!(error = %e, "Summarization call failed, using plain report");
                plain
            }
        }
    }
}

/// Render the system prompt advertising the tool catalog and wire format.
fn build_system_prompt(spec: &ToolSpec) -> String {
    format!(
        "You are a local assistant that can operate on the user's working directory.\n\
         When the user asks you to perform an operation, reply with exactly one JSON object:\n\
         {{\"tool\": \"<name>\", \"parameters\": {{...}}}}\n\
         or, for several steps in order:\n\
         {{\"actions\": [{{\"tool\": \"<name>\", \"parameters\": {{...}}}}, ...]}}\n\
         \n\
         Available tools:\n{}\n\
         All paths are relative to the working directory.\n\
         For conversational questions, answer in plain prose without any JSON.",
        spec.describe_for_prompt()
    )
}
