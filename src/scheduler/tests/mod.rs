//! Unit tests for the scheduler module.

mod domain_tests;
mod recording_tests;
mod timer_tests;
