//! Choice Love - compatibility matching and messaging service
//!
//! This library provides the compatibility scorer used to rank quiz profiles
//! against each other, the record stores that hold profiles and direct
//! messages, and the email notifications sent when a new match or message
//! arrives.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_compatibility, Matcher};
pub use models::{MatchRecord, MatchingRules, Message, Profile, ScoringWeights};
