//! Tests for the task bounded context.

mod deadline_tests;
mod service_tests;
mod support;
