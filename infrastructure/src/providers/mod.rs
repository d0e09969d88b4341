//! Inference backend adapters.

pub mod ollama;
