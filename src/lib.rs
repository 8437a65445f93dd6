//! Traction: meeting action-item tracking core.
//!
//! This crate turns AI-extracted meeting action items into durable,
//! stateful tasks, assigns deadlines, and keeps time-based reminders
//! consistent with each task's current deadline and status.
//!
//! # Architecture
//!
//! Traction follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (storage, timers)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle management, deadline heuristics, and the
//!   statistics/query layer
//! - [`scheduler`]: Background reminder scheduling with cancellation by key
//! - [`config`]: Runtime configuration for the scheduler and reminders

pub mod config;
pub mod scheduler;
pub mod task;
