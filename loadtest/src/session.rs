//! Session bootstrap
//!
//! Runs once per simulated user before its task loop. Bettors register a
//! synthetic account and log in with it; admins log in with the credentials
//! their transaction was built with; anonymous profiles only get a client. Failures are logged and
//! the user carries on without a credential, so later authenticated calls fail
//! on their own and show up in the statistics.

use crate::catalog::{LOGIN_PATH, Method, REGISTER_PATH};
use crate::payload::{Credentials, SyntheticAccount};
use crate::transport::{read_response, send};
use goose::goose::{GooseUser, TransactionError, TransactionResult};
use reqwest::{Client, ClientBuilder};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{error, info, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@decentralbet.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "AdminPassword123!";

/// Result of the registration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created,
    AlreadyExists,
    Failed(u16),
}

/// Result of the login call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Login {
    Token(String),
    MissingToken,
    Rejected(u16),
}

pub fn classify_registration(status: u16, body: &str) -> Registration {
    match status {
        200 | 201 => Registration::Created,
        409 => Registration::AlreadyExists,
        400 if body.contains("already exists") => Registration::AlreadyExists,
        other => Registration::Failed(other),
    }
}

pub fn classify_login(status: u16, body: &str) -> Login {
    if status != 200 {
        return Login::Rejected(status);
    }
    match extract_token(body) {
        Some(token) => Login::Token(token),
        None => Login::MissingToken,
    }
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    token: Option<String>,
    data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: Option<String>,
}

/// Token from `{"token": ..}` or the `{"data": {"token": ..}}` envelope
pub fn extract_token(body: &str) -> Option<String> {
    let parsed: LoginBody = serde_json::from_str(body).ok()?;
    parsed
        .token
        .or_else(|| parsed.data.and_then(|data| data.token))
        .filter(|token| !token.is_empty())
}

/// `Bearer <token>` header value, marked sensitive
pub fn authorization_header(token: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).ok()?;
    value.set_sensitive(true);
    Some(value)
}

/// HTTP client for one simulated user. Certificate validation is off so runs
/// against self-signed staging hosts work.
pub fn client_builder(token: Option<&str>) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        match authorization_header(token) {
            Some(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            None => warn!("Ignoring token that is not a valid header value"),
        }
    }

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .danger_accept_invalid_certs(true)
}

async fn install_client(user: &mut GooseUser, token: Option<&str>) -> TransactionResult {
    user.set_client_builder(client_builder(token)).await?;
    Ok(())
}

async fn register(user: &mut GooseUser, account: &SyntheticAccount) -> TransactionResult {
    let body = serde_json::to_value(account).unwrap_or_default();
    let goose = send(user, Method::Post, REGISTER_PATH, REGISTER_PATH, Some(&body)).await?;

    match read_response(goose).await {
        Some((status, body)) => match classify_registration(status, &body) {
            Registration::Created => info!("User registered: {}", account.email),
            Registration::AlreadyExists => info!("User already exists: {}", account.email),
            Registration::Failed(status) => error!("Registration failed: {}", status),
        },
        None => error!("Registration failed: no response for {}", account.email),
    }
    Ok(())
}

async fn login(
    user: &mut GooseUser,
    credentials: &Credentials,
) -> Result<Option<String>, Box<TransactionError>> {
    let body = serde_json::to_value(credentials).unwrap_or_default();
    let goose = send(user, Method::Post, LOGIN_PATH, LOGIN_PATH, Some(&body)).await?;

    let token = match read_response(goose).await {
        Some((status, body)) => match classify_login(status, &body) {
            Login::Token(token) => {
                info!("User logged in: {}", credentials.email);
                Some(token)
            }
            Login::MissingToken => {
                warn!("Login for {} returned no token", credentials.email);
                None
            }
            Login::Rejected(status) => {
                error!("Login failed: {}", status);
                None
            }
        },
        None => {
            error!("Login failed: no response for {}", credentials.email);
            None
        }
    };
    Ok(token)
}

/// On-start transaction for bettors
pub async fn bootstrap_bettor(user: &mut GooseUser) -> TransactionResult {
    let account = SyntheticAccount::generate(&mut rand::rng());
    install_client(user, None).await?;

    register(user, &account).await?;
    if let Some(token) = login(user, &account.login()).await? {
        install_client(user, Some(&token)).await?;
    }
    Ok(())
}

/// On-start transaction for admins
pub async fn bootstrap_admin(user: &mut GooseUser, credentials: Credentials) -> TransactionResult {
    install_client(user, None).await?;

    if let Some(token) = login(user, &credentials).await? {
        install_client(user, Some(&token)).await?;
    }
    Ok(())
}

/// On-start transaction for profiles without credentials
pub async fn bootstrap_anonymous(user: &mut GooseUser) -> TransactionResult {
    install_client(user, None).await
}
