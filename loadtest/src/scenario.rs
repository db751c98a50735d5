//! Scenario presets
//!
//! Named traffic shapes an operator picks at launch. Each preset fixes the
//! number of simulated users, how fast they are spawned, and how long the run
//! lasts once hatching completes.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while resolving a scenario or one of its fields
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Invalid duration: {0:?} (expected <n>s, <n>m or <n>h)")]
    InvalidDuration(String),
}

/// A named bundle of (users, spawn rate, duration)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioPreset {
    pub name: &'static str,
    /// Total simulated users
    pub users: usize,
    /// Users started per second during ramp-up
    pub spawn_rate: usize,
    /// Run duration, e.g. "5m"
    pub duration: &'static str,
    pub description: &'static str,
}

impl ScenarioPreset {
    /// Duration as a `Duration`
    pub fn run_time(&self) -> Result<Duration, ScenarioError> {
        parse_duration(self.duration)
    }
}

pub const NORMAL_LOAD: ScenarioPreset = ScenarioPreset {
    name: "normal_load",
    users: 50,
    spawn_rate: 5,
    duration: "5m",
    description: "Normal user load simulation",
};

pub const PEAK_LOAD: ScenarioPreset = ScenarioPreset {
    name: "peak_load",
    users: 200,
    spawn_rate: 20,
    duration: "10m",
    description: "Peak traffic simulation",
};

pub const STRESS_TEST: ScenarioPreset = ScenarioPreset {
    name: "stress_test",
    users: 500,
    spawn_rate: 50,
    duration: "15m",
    description: "Stress test to validate auto-scaling",
};

pub const SPIKE_TEST: ScenarioPreset = ScenarioPreset {
    name: "spike_test",
    users: 1000,
    spawn_rate: 100,
    duration: "2m",
    description: "Sudden traffic spike test",
};

/// All presets, in display order
pub const SCENARIOS: [ScenarioPreset; 4] = [NORMAL_LOAD, PEAK_LOAD, STRESS_TEST, SPIKE_TEST];

/// Look up a preset by name
pub fn lookup(name: &str) -> Result<ScenarioPreset, ScenarioError> {
    SCENARIOS
        .iter()
        .find(|preset| preset.name == name)
        .copied()
        .ok_or_else(|| ScenarioError::UnknownScenario(name.to_string()))
}

/// Parse "<n>s", "<n>m" or "<n>h". A bare number is read as seconds.
pub fn parse_duration(value: &str) -> Result<Duration, ScenarioError> {
    let invalid = || ScenarioError::InvalidDuration(value.to_string());
    let trimmed = value.trim();

    let (digits, unit_secs) = match trimmed.char_indices().last() {
        Some((idx, 's')) => (&trimmed[..idx], 1),
        Some((idx, 'm')) => (&trimmed[..idx], 60),
        Some((idx, 'h')) => (&trimmed[..idx], 60 * 60),
        Some(_) => (trimmed, 1),
        None => return Err(invalid()),
    };

    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    let secs = amount.checked_mul(unit_secs).ok_or_else(invalid)?;
    Ok(Duration::from_secs(secs))
}
