//! Use cases orchestrating the agent flow.

pub mod agent_turn;
pub mod execute_actions;
