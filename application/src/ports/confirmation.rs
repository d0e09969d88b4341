//! Confirmation port for operator consent.
//!
//! Risky operations and model recommendations both block on operator input;
//! nothing else proceeds on the conversation until the prompt resolves. A
//! cancellation signal during a prompt resolves to the safe default
//! (decline) rather than leaving the prompt pending.

use async_trait::async_trait;
use foreman_domain::{Recommendation, RiskWarning};

/// Operator's decision on a proposed recommendation.
///
/// The "inspect details, then decide" flow is handled inside the
/// implementation; the use case only ever sees the final choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationChoice {
    /// Run every proposed action through the agent loop
    Execute,
    /// Drop the proposal
    Decline,
}

/// Port for interactive operator consent
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Ask the operator to confirm a risky operation. `false` (decline) is
    /// the safe default on EOF or interrupt.
    async fn confirm_risky(&self, warning: &RiskWarning) -> bool;

    /// Present a recommendation and collect the operator's choice.
    async fn review_recommendation(&self, recommendation: &Recommendation) -> RecommendationChoice;
}
