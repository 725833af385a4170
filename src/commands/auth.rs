//! Session command handlers: `ledger login`, `ledger logout` and `ledger status`.

use crate::api::Mode;
use crate::args::LoginArgs;
use crate::client::{Client, Outcome};
use crate::commands::{finish, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{TransactionId, User};
use crate::{Config, Result};
use serde::Serialize;

/// Logs in and stores the session for the following commands.
pub async fn login(config: Config, mode: Mode, args: LoginArgs) -> Result<Out<User>> {
    let mut client = Client::open(&config, mode)
        .await
        .pub_result(ErrorType::Config)?;
    let outcome = client
        .login(args.email(), args.password())
        .await
        .pub_result(ErrorType::Storage)?;
    finish(match outcome {
        Outcome::Success { message, value } => Outcome::Success {
            message: format!(
                "{}. Welcome, {}!",
                message.trim_end().trim_end_matches(['.', '!']),
                value.display_name()
            ),
            value,
        },
        other => other,
    })
}

/// Forgets the session and the last submitted transaction.
pub async fn logout(config: Config, mode: Mode) -> Result<Out<()>> {
    let mut client = Client::open(&config, mode)
        .await
        .pub_result(ErrorType::Config)?;
    client.logout().await.pub_result(ErrorType::Storage)?;
    Ok("Logged out".into())
}

/// What `ledger status` reports.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Status {
    pub logged_in: bool,
    pub user: Option<User>,
    pub last_transaction: Option<TransactionId>,
}

/// Reports the stored session and the transaction that `ledger edit` would change.
pub async fn status(config: Config, mode: Mode) -> Result<Out<Status>> {
    let client = Client::open(&config, mode)
        .await
        .pub_result(ErrorType::Config)?;
    let session = client.session();
    let status = Status {
        logged_in: session.is_some(),
        user: session.map(|s| s.user().clone()),
        last_transaction: client.last_transaction(),
    };
    let mut message = match &status.user {
        Some(user) => format!("Logged in as {}", user.display_name()),
        None => "Not logged in".to_string(),
    };
    if let Some(id) = &status.last_transaction {
        message.push_str(&format!(", last transaction {id}"));
    }
    Ok(Out::new(message, status))
}
