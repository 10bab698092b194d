//! Core domain types
//!
//! This module contains the core domain structures used across Relay services.
//! These types represent the fundamental business entities and are shared between
//! the coordinator (which tracks jobs) and the agent (which executes them).

pub mod job;
