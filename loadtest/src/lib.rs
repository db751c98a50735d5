//! DecentralBet Load Test Library
//!
//! Simulated bettors, admins, WebSocket clients and stress users driven by
//! goose against a DecentralBet deployment. Exported for the binary and the
//! integration tests.

pub mod catalog;
pub mod config;
pub mod hooks;
pub mod payload;
pub mod probe;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod summary;
pub mod tasks;
pub mod transport;

// Re-export commonly used types
pub use catalog::{PROFILES, Profile, TaskSpec};
pub use config::Config;
pub use runner::{RunError, RunReport, run};
pub use scenario::{SCENARIOS, ScenarioPreset};
pub use summary::RunSummary;
