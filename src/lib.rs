pub mod api;
pub mod cli;
pub mod logging;
pub mod model;
pub mod orchestrator;
#[cfg(feature = "tui")]
pub mod tui;
