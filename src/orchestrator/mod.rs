//! Application-level orchestration.
//!
//! Owns backend request dispatch so presentation layers never touch the
//! HTTP client directly. Every request runs on its own task; completion
//! events flow back over the event channel tagged with the sequence
//! number the UI assigned at dispatch.

mod controller;

pub use controller::run_controller;
