//! Relay Coordinator
//!
//! Accepts job submissions, tracks each job through its lifecycle in an
//! in-memory store, and dispatches execution to a Relay agent in the
//! background. Clients poll for the terminal record.
//!
//! Architecture:
//! - Store: concurrent-safe job records with a validated state machine
//! - Dispatcher: bounded background units bridging creation to the agent
//! - API: axum layer for submission, status queries, metrics, and health

pub mod api;
pub mod config;
pub mod dispatcher;
pub mod metrics;
pub mod store;
