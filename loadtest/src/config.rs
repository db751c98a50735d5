//! Load test configuration
//!
//! Configuration is loaded from environment variables. Goose's own command
//! line flags are parsed separately and take precedence over these values
//! where both set the same thing (host, users, hatch rate, run time).

use crate::payload::Credentials;
use crate::scenario::{NORMAL_LOAD, parse_duration};
use crate::session::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
use std::env;
use std::time::Duration;

/// Main load test configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the system under test
    pub host: String,
    /// Scenario preset name
    pub scenario: String,
    /// Profiles to run; empty means all of them
    pub profiles: Vec<String>,
    /// Credentials used by admin users
    pub admin: Credentials,
    /// Overrides the preset's user count
    pub users: Option<usize>,
    /// Overrides the preset's duration
    pub run_time: Option<Duration>,
    /// Per-user iteration cap, 0 for unlimited
    pub iterations: usize,
    /// Honor each profile's wait range between tasks
    pub think_time: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "http://localhost:5000".to_string(),
            scenario: NORMAL_LOAD.name.to_string(),
            profiles: Vec::new(),
            admin: Credentials {
                email: DEFAULT_ADMIN_EMAIL.to_string(),
                password: DEFAULT_ADMIN_PASSWORD.to_string(),
            },
            users: None,
            run_time: None,
            iterations: 0,
            think_time: true,
        }
    }
}

fn is_truthy(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Target
        if let Some(host) = lookup("TARGET_HOST")
            && !host.is_empty()
        {
            config.host = host.trim_end_matches('/').to_string();
        }
        if let Some(name) = lookup("LOADTEST_SCENARIO")
            && !name.is_empty()
        {
            config.scenario = name;
        }
        if let Some(list) = lookup("LOADTEST_PROFILES") {
            config.profiles = split_list(&list);
        }

        // Admin credentials
        if let Some(email) = lookup("ADMIN_EMAIL")
            && !email.is_empty()
        {
            config.admin.email = email;
        }
        if let Some(password) = lookup("ADMIN_PASSWORD")
            && !password.is_empty()
        {
            config.admin.password = password;
        }

        // Overrides
        if let Some(val) = lookup("LOADTEST_USERS")
            && let Ok(users) = val.parse()
        {
            config.users = Some(users);
        }
        if let Some(val) = lookup("LOADTEST_RUN_TIME")
            && let Ok(run_time) = parse_duration(&val)
        {
            config.run_time = Some(run_time);
        }
        if let Some(val) = lookup("LOADTEST_ITERATIONS")
            && let Ok(iterations) = val.parse()
        {
            config.iterations = iterations;
        }
        if let Some(val) = lookup("LOADTEST_NO_WAIT") {
            config.think_time = !is_truthy(&val);
        }

        config
    }
}
