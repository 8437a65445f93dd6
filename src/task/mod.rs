//! Task lifecycle management for Traction.
//!
//! This module converts unstructured AI output (candidate action items)
//! into durable task records, assigns deadlines, drives status changes,
//! and keeps reminder jobs consistent with each task's deadline. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
