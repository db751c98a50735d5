//! Load test runner
//!
//! Resolves the scenario preset and profiles, registers one goose scenario per
//! profile, applies the preset as goose defaults, and runs the attack between
//! the start and stop hooks.

use crate::catalog::{PROFILES, Profile, find_profile};
use crate::config::Config;
use crate::hooks::{start_lines, stop_lines};
use crate::scenario::{ScenarioError, ScenarioPreset, lookup};
use crate::summary::{RunSummary, take_handshakes};
use crate::tasks::build_scenario;
use goose::config::{GooseConfiguration, GooseDefault, GooseDefaultType};
use goose::{GooseAttack, GooseError, GooseScheduler};
use thiserror::Error;
use tracing::info;

/// Order of scenario allocation and of weighted transactions within a user
pub const TASK_SCHEDULER: GooseScheduler = GooseScheduler::Random;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Goose error: {0}")]
    Goose(#[from] GooseError),
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub host: String,
    pub preset: ScenarioPreset,
    pub start_lines: Vec<String>,
    pub stop_lines: Vec<String>,
    pub summary: RunSummary,
}

/// Profiles selected by name, in catalog order. An empty selection means all.
pub fn resolve_profiles(names: &[String]) -> Result<Vec<Profile>, RunError> {
    if names.is_empty() {
        return Ok(PROFILES.to_vec());
    }

    let mut selected: Vec<Profile> = Vec::with_capacity(names.len());
    for name in names {
        let profile = find_profile(name).ok_or_else(|| RunError::UnknownProfile(name.clone()))?;
        if !selected.iter().any(|p| p.name == profile.name) {
            selected.push(profile);
        }
    }
    selected.sort_by_key(|profile| PROFILES.iter().position(|p| p.name == profile.name));
    Ok(selected)
}

/// Host goose will target: the command line wins over the environment
fn target_host(config: &Config, goose_config: &GooseConfiguration) -> String {
    if goose_config.host.is_empty() {
        config.host.clone()
    } else {
        goose_config.host.trim_end_matches('/').to_string()
    }
}

/// Apply the iteration cap unless `--iterations` was given on the command line.
/// Goose only reads the cap from its configuration, never from defaults.
fn apply_iterations(config: &Config, goose_config: &mut GooseConfiguration) -> usize {
    if goose_config.iterations == 0 {
        goose_config.iterations = config.iterations;
    }
    goose_config.iterations
}

/// Run a load test to completion
pub async fn run(
    config: &Config,
    mut goose_config: GooseConfiguration,
) -> Result<RunReport, RunError> {
    let preset = lookup(&config.scenario)?;
    let run_time = match config.run_time {
        Some(run_time) => run_time,
        None => preset.run_time()?,
    };
    let profiles = resolve_profiles(&config.profiles)?;
    let host = target_host(config, &goose_config);
    let iterations = apply_iterations(config, &mut goose_config);

    // Handshakes left over from an earlier run in this process
    take_handshakes();

    let mut attack =
        GooseAttack::initialize_with_config(goose_config)?.set_scheduler(TASK_SCHEDULER);
    for profile in &profiles {
        attack =
            attack.register_scenario(build_scenario(profile, config.think_time, &config.admin)?);
    }

    let users = config.users.unwrap_or(preset.users);
    let hatch_rate = preset.spawn_rate.to_string();
    attack = *attack
        .set_default(GooseDefault::Host, host.as_str())?
        .set_default(GooseDefault::Users, users)?
        .set_default(GooseDefault::HatchRate, hatch_rate.as_str())?
        .set_default(GooseDefault::NoTelnet, true)?
        .set_default(GooseDefault::NoWebSocket, true)?;

    // Goose rejects a run time or a metrics reset setting alongside an
    // iteration cap
    if iterations == 0 {
        attack = *attack
            .set_default(GooseDefault::RunTime, run_time.as_secs() as usize)?
            .set_default(GooseDefault::NoResetMetrics, true)?;
    }

    info!(
        "Scenario {}: {} users, spawn rate {}/s, {}",
        preset.name,
        users,
        preset.spawn_rate,
        if iterations > 0 {
            format!("{} iterations per user", iterations)
        } else {
            format!("{}s", run_time.as_secs())
        }
    );
    info!(
        "Profiles: {}",
        profiles
            .iter()
            .map(|profile| profile.name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let start_lines = start_lines(&host);
    for line in &start_lines {
        println!("{}", line);
    }

    let metrics = attack.execute().await?;

    let summary = RunSummary::from_metrics(&metrics, take_handshakes());
    let stop_lines = stop_lines(&summary);
    for line in &stop_lines {
        println!("{}", line);
    }

    Ok(RunReport {
        host,
        preset,
        start_lines,
        stop_lines,
        summary,
    })
}
