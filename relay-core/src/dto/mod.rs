//! Data Transfer Objects for inter-service communication
//!
//! This module contains DTOs used for communication between Relay services
//! (coordinator, agent) and their clients. DTOs are lightweight representations
//! of domain entities optimized for network transfer.

pub mod execute;
pub mod job;
