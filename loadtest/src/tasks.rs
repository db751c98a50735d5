//! Goose scenarios built from the catalog
//!
//! Each catalog profile becomes one goose scenario: its spawn weight and wait
//! range map onto the scenario, its bootstrap onto an on-start transaction,
//! and each task onto a weighted transaction. Goose does the scheduling.

use crate::catalog::{Bootstrap, Payload, Profile, TaskSpec};
use crate::payload::{Bet, Credentials, NewMarket, render_path};
use crate::session::{bootstrap_admin, bootstrap_anonymous, bootstrap_bettor};
use crate::{probe, transport};
use goose::GooseError;
use goose::goose::{GooseUser, Scenario, Transaction, TransactionResult};
use goose::transaction;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Path and body for one invocation of a task, drawn fresh each time
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub path: String,
    pub body: Option<Value>,
}

impl PreparedRequest {
    pub fn for_task(task: &TaskSpec) -> Self {
        let mut rng = rand::rng();
        let path = render_path(task.path, &mut rng);

        let body = match task.payload {
            Payload::Empty | Payload::Handshake => None,
            Payload::NewMarket => {
                let now = chrono::Utc::now().timestamp();
                to_body(task, &NewMarket::generate(&mut rng, now))
            }
            Payload::Bet => to_body(task, &Bet::generate(&mut rng)),
        };

        Self { path, body }
    }
}

fn to_body<T: serde::Serialize>(task: &TaskSpec, payload: &T) -> Option<Value> {
    match serde_json::to_value(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Sending {} without a body: {}", task.label, e);
            None
        }
    }
}

async fn run_task(user: &mut GooseUser, task: &'static TaskSpec) -> TransactionResult {
    if task.payload == Payload::Handshake {
        return probe::run(user, task).await;
    }

    let request = PreparedRequest::for_task(task);
    transport::send(
        user,
        task.method,
        &request.path,
        task.label,
        request.body.as_ref(),
    )
    .await?;
    Ok(())
}

/// Weighted goose transaction for one catalog task
pub fn task_transaction(task: &'static TaskSpec) -> Result<Transaction, GooseError> {
    Transaction::new(Arc::new(move |s| Box::pin(run_task(s, task))))
        .set_name(task.label)
        .set_weight(task.weight)
}

fn bootstrap_transaction(bootstrap: Bootstrap, admin: &Credentials) -> Transaction {
    let transaction = match bootstrap {
        Bootstrap::SyntheticAccount => transaction!(bootstrap_bettor),
        Bootstrap::Admin => {
            let credentials = admin.clone();
            Transaction::new(Arc::new(move |s| {
                Box::pin(bootstrap_admin(s, credentials.clone()))
            }))
        }
        Bootstrap::Anonymous => transaction!(bootstrap_anonymous),
    };
    transaction.set_name("on_start").set_on_start()
}

/// Goose scenario for a profile. With `think_time` off, users fire their next
/// task as soon as the previous one returns. `admin` is only used by profiles
/// with an admin bootstrap.
pub fn build_scenario(
    profile: &Profile,
    think_time: bool,
    admin: &Credentials,
) -> Result<Scenario, GooseError> {
    let mut scenario = Scenario::new(profile.name).set_weight(profile.weight)?;
    if think_time {
        scenario = scenario.set_wait_time(profile.wait.min, profile.wait.max)?;
    }

    scenario = scenario.register_transaction(bootstrap_transaction(profile.bootstrap, admin));
    for task in profile.tasks {
        scenario = scenario.register_transaction(task_transaction(task)?);
    }
    Ok(scenario)
}
