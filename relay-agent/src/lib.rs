//! Relay Agent
//!
//! A stateless service that executes shell commands under enforced deadlines
//! and returns structured results.
//!
//! Architecture:
//! - Configuration: bind address, output caps, accepted timeout range
//! - Engine: process spawning, deadline enforcement, bounded capture
//! - API: thin axum layer over the engine, plus metrics and health
//!
//! The agent keeps no state between calls beyond metrics counters.

pub mod api;
pub mod config;
pub mod engine;
pub mod metrics;
