//! Operator confirmation prompts.
//!
//! Blocking terminal prompts implementing [`ConfirmationPort`]. Declining
//! is the safe default everywhere: EOF, interrupt, or an empty answer all
//! resolve to "no".

use async_trait::async_trait;
use colored::Colorize;
use foreman_application::ports::confirmation::{ConfirmationPort, RecommendationChoice};
use foreman_domain::{Recommendation, RiskWarning};
use std::io::{self, BufRead, Write};

/// Interactive console confirmation
pub struct ConsoleConfirmation;

impl ConsoleConfirmation {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> Option<String> {
        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) => None, // EOF resolves to the safe default
            Ok(_) => Some(input.trim().to_string()),
            Err(_) => None,
        }
    }

    fn prompt(&self, text: &str) -> Option<String> {
        print!("{} ", text);
        let _ = io::stdout().flush();
        self.read_line()
    }
}

impl Default for ConsoleConfirmation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfirmationPort for ConsoleConfirmation {
    async fn confirm_risky(&self, warning: &RiskWarning) -> bool {
        println!();
        println!("{}", "! Potentially destructive operation".yellow().bold());
        println!("  {}: {}", "reason".dimmed(), warning.reason);
        println!("  {}: {}", "operation".dimmed(), warning.operation);

        match self.prompt(&format!("{}", "Proceed? [y/N]:".bold())) {
            Some(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
            None => {
                println!();
                false
            }
        }
    }

    async fn review_recommendation(&self, recommendation: &Recommendation) -> RecommendationChoice {
        println!();
        println!("{}", "Suggested follow-up".cyan().bold());
        if !recommendation.title.is_empty() {
            println!("  {}", recommendation.title);
        }
        println!(
            "  {} action(s) proposed. [e]xecute / [d]ecline / [s]how details",
            recommendation.actions.len()
        );

        loop {
            let answer = match self.prompt(&format!("{}", "Choice [e/d/s]:".bold())) {
                Some(answer) => answer.to_lowercase(),
                None => {
                    println!();
                    return RecommendationChoice::Decline;
                }
            };

            match answer.as_str() {
                "e" | "execute" | "y" | "yes" => return RecommendationChoice::Execute,
                "d" | "decline" | "n" | "no" | "" => return RecommendationChoice::Decline,
                "s" | "show" | "details" => {
                    println!();
                    if !recommendation.description.is_empty() {
                        println!("  {}", recommendation.description.dimmed());
                    }
                    for (i, action) in recommendation.actions.iter().enumerate() {
                        println!("  {}. {}", i + 1, action);
                    }
                    println!();
                }
                other => {
                    println!("  Unrecognized choice '{}'; use e, d, or s.", other);
                }
            }
        }
    }
}

/// Non-interactive confirmation that approves everything (`--yes`).
pub struct AutoApprove;

#[async_trait]
impl ConfirmationPort for AutoApprove {
    async fn confirm_risky(&self, _warning: &RiskWarning) -> bool {
        true
    }

    async fn review_recommendation(&self, _recommendation: &Recommendation) -> RecommendationChoice {
        RecommendationChoice::Execute
    }
}
