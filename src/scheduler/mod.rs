//! Background reminder scheduling for Traction.
//!
//! A time-ordered job registry: one-shot and recurring callbacks keyed by
//! a logical string key, with idempotent replace-on-collision semantics,
//! cancellation by key, and a bounded execution pool. Firing happens on
//! the scheduler's own timeline, never on the caller's path. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
