//! Relay Core
//!
//! Core types and abstractions for the Relay compute platform.
//!
//! This crate contains:
//! - Domain types: Core business entities (Job, JobStatus, failure taxonomy)
//! - DTOs: Data transfer objects for inter-service communication

pub mod domain;
pub mod dto;
