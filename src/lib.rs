//! Fraud Sentinel
//!
//! A ReAct-style fraud investigation agent for payment transactions:
//! - Drives a Thought/Action/Observation loop against an Ollama chat model
//! - Exposes a fixed set of deterministic investigation tools
//! - Parses ISO 20022 pain.001 credit-transfer documents
//! - Scores transactions with a reproducible risk heuristic
//! - Records fraud alerts through a pluggable party store
//!
//! LOOP:
//! TASK → THOUGHT → ACTION → OBSERVATION → ... → FINAL ANSWER

pub mod action;
pub mod agent;
pub mod config;
pub mod error;
pub mod models;
pub mod ollama;
pub mod store;
pub mod tools;

pub use error::{AgentError, Result};

// Re-export common types
pub use config::AgentConfig;
pub use models::*;
