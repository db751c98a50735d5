//! Random request bodies and synthetic identities

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::ops::RangeInclusive;

pub const MARKET_IDS: RangeInclusive<u32> = 1..=10;
pub const ACCOUNT_SUFFIXES: RangeInclusive<u32> = 1..=1000;
pub const BET_AMOUNT_MIN: f64 = 0.001;
pub const BET_AMOUNT_MAX: f64 = 0.1;
pub const OUTCOMES: [&str; 2] = ["Yes", "No"];

const SYNTHETIC_PASSWORD: &str = "TestPassword123!";
const SYNTHETIC_NAME: &str = "Test User";
const MARKET_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Identity registered by a simulated bettor.
///
/// Suffixes are drawn from 1..=1000, so two users of one run may share an
/// email. Registration treats the resulting conflict as success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntheticAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl SyntheticAccount {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix = rng.random_range(ACCOUNT_SUFFIXES);
        Self {
            email: format!("testuser{}@test.com", suffix),
            password: SYNTHETIC_PASSWORD.to_string(),
            name: SYNTHETIC_NAME.to_string(),
        }
    }

    pub fn login(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Body of `POST /api/v1/auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/v1/markets`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarket {
    pub title: String,
    pub description: &'static str,
    pub category: &'static str,
    /// Unix seconds
    pub end_date: i64,
    pub options: [&'static str; 2],
}

impl NewMarket {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, now_unix: i64) -> Self {
        Self {
            title: format!("Test Market {}", rng.random_range(ACCOUNT_SUFFIXES)),
            description: "This is a test market created during load testing",
            category: "Technology",
            end_date: now_unix + MARKET_LIFETIME_SECS,
            options: OUTCOMES,
        }
    }
}

/// Body of `POST /api/v1/bets`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub market_id: u32,
    pub option: &'static str,
    /// ETH
    pub amount: f64,
    pub prediction: bool,
}

impl Bet {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            market_id: market_id(rng),
            option: OUTCOMES.choose(rng).copied().unwrap_or(OUTCOMES[0]),
            amount: rng.random_range(BET_AMOUNT_MIN..=BET_AMOUNT_MAX),
            prediction: rng.random_bool(0.5),
        }
    }
}

pub fn market_id<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(MARKET_IDS)
}

/// Substitute `{id}` in a path template with a random market id
pub fn render_path<R: Rng + ?Sized>(template: &str, rng: &mut R) -> String {
    if template.contains(crate::catalog::MARKET_ID_PLACEHOLDER) {
        template.replace(
            crate::catalog::MARKET_ID_PLACEHOLDER,
            &market_id(rng).to_string(),
        )
    } else {
        template.to_string()
    }
}
