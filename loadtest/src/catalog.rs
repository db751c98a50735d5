//! Profile and task catalog
//!
//! Every actor type the load test simulates is described here as plain data:
//! how often it is spawned, how long it idles between requests, how it
//! bootstraps its session, and which weighted tasks it runs.

use goose::goose::GooseMethod;
use std::time::Duration;

pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const SOCKET_IO_PATH: &str = "/socket.io/";

/// Placeholder substituted with a random market id
pub const MARKET_ID_PLACEHOLDER: &str = "{id}";

/// HTTP method of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }

    pub fn goose_method(&self) -> GooseMethod {
        match self {
            Method::Get => GooseMethod::Get,
            Method::Post => GooseMethod::Post,
        }
    }
}

/// Body generated for each invocation of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Empty,
    NewMarket,
    Bet,
    /// Not an HTTP body: the task performs a WebSocket handshake instead
    Handshake,
}

/// One weighted entry of a profile's task list
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    /// Statistics label, also used as the goose transaction name
    pub label: &'static str,
    pub method: Method,
    /// Path relative to the target host; may contain `{id}`
    pub path: &'static str,
    pub weight: usize,
    pub payload: Payload,
}

/// How a simulated user prepares its session before running tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// Register a synthetic account, then log in with it
    SyntheticAccount,
    /// Log in with the configured admin credentials
    Admin,
    /// No credentials, only client setup
    Anonymous,
}

/// Inclusive think-time range between two tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitRange {
    pub min: Duration,
    pub max: Duration,
}

impl WaitRange {
    pub const fn secs(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_secs(min),
            max: Duration::from_secs(max),
        }
    }

    pub const fn millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }
}

/// An actor type
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub name: &'static str,
    /// Relative share of spawned users
    pub weight: usize,
    pub wait: WaitRange,
    pub bootstrap: Bootstrap,
    pub tasks: &'static [TaskSpec],
}

impl Profile {
    /// Sum of all task weights
    pub fn total_weight(&self) -> usize {
        self.tasks.iter().map(|task| task.weight).sum()
    }

    /// Task by label
    pub fn task(&self, label: &str) -> Option<&'static TaskSpec> {
        self.tasks.iter().find(|task| task.label == label)
    }
}

const fn get(label: &'static str, path: &'static str, weight: usize) -> TaskSpec {
    TaskSpec {
        label,
        method: Method::Get,
        path,
        weight,
        payload: Payload::Empty,
    }
}

const fn post(
    label: &'static str,
    path: &'static str,
    weight: usize,
    payload: Payload,
) -> TaskSpec {
    TaskSpec {
        label,
        method: Method::Post,
        path,
        weight,
        payload,
    }
}

/// Regular bettor: browses markets, creates some, places bets
pub const BETTOR: Profile = Profile {
    name: "DecentralBetUser",
    weight: 1,
    wait: WaitRange::secs(1, 5),
    bootstrap: Bootstrap::SyntheticAccount,
    tasks: &[
        get("GET /markets", "/api/v1/markets", 3),
        get("GET /markets/:id", "/api/v1/markets/{id}", 2),
        post("POST /markets", "/api/v1/markets", 1, Payload::NewMarket),
        post("POST /bets", "/api/v1/bets", 2, Payload::Bet),
        get("GET /bets/my-bets", "/api/v1/bets/my-bets", 1),
        get("GET /dashboard", "/api/v1/dashboard", 1),
        get("GET /health", "/health", 5),
        get(
            "GET /blockchain-status",
            "/api/v1/oracle/blockchain-status",
            1,
        ),
    ],
};

/// Administrator hitting admin-only endpoints
pub const ADMIN: Profile = Profile {
    name: "AdminUser",
    weight: 1,
    wait: WaitRange::secs(2, 8),
    bootstrap: Bootstrap::Admin,
    tasks: &[
        get("ADMIN - GET /users", "/api/v1/users", 1),
        get("ADMIN - GET /admin", "/api/v1/dashboard/admin", 1),
    ],
};

/// Real-time client opening WebSocket connections
pub const WEBSOCKET: Profile = Profile {
    name: "WebsocketUser",
    weight: 2,
    wait: WaitRange::secs(5, 15),
    bootstrap: Bootstrap::Anonymous,
    tasks: &[TaskSpec {
        label: "WebSocket Connection",
        method: Method::Get,
        path: SOCKET_IO_PATH,
        weight: 1,
        payload: Payload::Handshake,
    }],
};

/// Rapid-fire client used to push auto-scaling
pub const STRESS: Profile = Profile {
    name: "StressTestUser",
    weight: 1,
    wait: WaitRange::millis(100, 500),
    bootstrap: Bootstrap::Anonymous,
    tasks: &[
        get("/api/v1/markets", "/api/v1/markets", 1),
        get("/health", "/health", 1),
    ],
};

/// Every profile known to the load test
pub const PROFILES: [Profile; 4] = [BETTOR, ADMIN, WEBSOCKET, STRESS];

/// Case-insensitive lookup by profile name
pub fn find_profile(name: &str) -> Option<Profile> {
    PROFILES
        .iter()
        .find(|profile| profile.name.eq_ignore_ascii_case(name.trim()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_are_positive() {
        for profile in PROFILES {
            assert!(profile.weight > 0, "{}", profile.name);
            assert!(!profile.tasks.is_empty(), "{}", profile.name);
            for task in profile.tasks {
                assert!(task.weight > 0, "{} / {}", profile.name, task.label);
            }
        }
    }

    #[test]
    fn test_wait_ranges_are_ordered() {
        for profile in PROFILES {
            assert!(profile.wait.min <= profile.wait.max, "{}", profile.name);
        }
        assert_eq!(STRESS.wait.min, Duration::from_millis(100));
        assert_eq!(STRESS.wait.max, Duration::from_millis(500));
    }

    #[test]
    fn test_bettor_health_to_market_create_ratio() {
        let health = BETTOR.task("GET /health").unwrap();
        let create = BETTOR.task("POST /markets").unwrap();
        assert_eq!(health.weight / create.weight, 5);
        assert_eq!(BETTOR.total_weight(), 16);
    }

    #[test]
    fn test_labels_unique_within_profile() {
        for profile in PROFILES {
            let mut labels: Vec<_> = profile.tasks.iter().map(|t| t.label).collect();
            labels.sort_unstable();
            labels.dedup();
            assert_eq!(labels.len(), profile.tasks.len(), "{}", profile.name);
        }
    }

    #[test]
    fn test_find_profile_is_case_insensitive() {
        assert_eq!(find_profile("adminuser").unwrap().name, "AdminUser");
        assert_eq!(find_profile(" StressTestUser ").unwrap().name, "StressTestUser");
        assert!(find_profile("ghost").is_none());
    }

    #[test]
    fn test_only_market_detail_is_templated() {
        let templated: Vec<_> = PROFILES
            .iter()
            .flat_map(|p| p.tasks.iter())
            .filter(|t| t.path.contains(MARKET_ID_PLACEHOLDER))
            .map(|t| t.label)
            .collect();
        assert_eq!(templated, vec!["GET /markets/:id"]);
    }
}
