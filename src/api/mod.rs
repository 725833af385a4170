//! The boundary to the ledger service.
//!
//! The service exposes a single endpoint. Every request is a JSON object with an `action`
//! discriminator and every response carries at least `success` and `message`. The `Ledger` trait
//! models that endpoint; `RemoteLedger` talks to the real service over HTTP and `TestLedger` keeps
//! everything in memory so that the whole client can run without a network.

mod remote;
mod test_ledger;

pub(crate) use remote::RemoteLedger;
pub use test_ledger::TestLedger;
#[cfg(test)]
pub(crate) use test_ledger::{TEST_EMAIL, TEST_PASSWORD};

use crate::model::wire::loose_string;
use crate::model::{FormFields, TransactionId, User};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Text the service puts in `message` when the session token is no longer valid.
pub const SESSION_EXPIRED: &str = "Session expired";

/// Environment variable that switches the client to the in-memory `TestLedger`.
pub const TEST_MODE_ENV: &str = "LEDGER_FORM_IN_TEST_MODE";

/// One request to the ledger service.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    Login {
        email: String,
        password: String,
    },
    Submit {
        session_token: String,
        form_data: FormFields,
    },
    GetTransaction {
        session_token: String,
        transaction_id: TransactionId,
    },
    UpdateTransaction {
        session_token: String,
        transaction_id: TransactionId,
        form_data: FormFields,
    },
}

impl Request {
    /// The value of the `action` discriminator, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Request::Login { .. } => "login",
            Request::Submit { .. } => "submit",
            Request::GetTransaction { .. } => "getTransaction",
            Request::UpdateTransaction { .. } => "updateTransaction",
        }
    }
}

/// The fields that every response carries.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub success: bool,
    #[serde(default, deserialize_with = "loose_string")]
    pub message: String,
}

impl Reply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Whether this is a failure caused by an expired session.
    pub fn is_session_expired(&self) -> bool {
        !self.success && self.message.contains(SESSION_EXPIRED)
    }
}

/// Response to `login`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
    #[serde(flatten)]
    pub reply: Reply,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

/// Response to `submit`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReply {
    #[serde(flatten)]
    pub reply: Reply,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
}

/// Response to `getTransaction`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReply {
    #[serde(flatten)]
    pub reply: Reply,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<WireTransaction>,
}

/// A stored transaction as the service returns it. The date is packed as `DDMMYYYY`; the service
/// may send it, and any other value, as a JSON number.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransaction {
    #[serde(default, deserialize_with = "loose_string")]
    pub date: String,
    #[serde(flatten)]
    pub fields: WireFields,
}

/// The non-date fields of a `WireTransaction`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFields {
    #[serde(default, deserialize_with = "loose_string")]
    pub transaction_type: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub year: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub month: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub month_num: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub family_member: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub amount: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub category: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,
}

/// The operations of the ledger service. An `Err` from any method means that no response was
/// obtained at all; a response with `success: false` is an `Ok`.
#[async_trait::async_trait]
pub trait Ledger {
    async fn login(&mut self, email: &str, password: &str) -> Result<LoginReply>;

    async fn submit(&mut self, session_token: &str, form_data: &FormFields) -> Result<SubmitReply>;

    async fn get_transaction(
        &mut self,
        session_token: &str,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReply>;

    async fn update_transaction(
        &mut self,
        session_token: &str,
        transaction_id: &TransactionId,
        form_data: &FormFields,
    ) -> Result<Reply>;
}

/// Which `Ledger` implementation to use.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Talk to the ledger service at the configured URL.
    #[default]
    Remote,
    /// Use the in-memory `TestLedger`, persisted in the ledger home directory.
    Test,
}

impl Mode {
    /// Returns `Mode::Test` when `LEDGER_FORM_IN_TEST_MODE` is set to a non-empty value.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(v) if !v.is_empty() => Mode::Test,
            _ => Mode::Remote,
        }
    }
}

/// Creates the `Ledger` for `mode`.
pub async fn ledger(config: &Config, mode: Mode) -> Result<Box<dyn Ledger + Send>> {
    debug!("Creating ledger in {mode:?} mode");
    Ok(match mode {
        Mode::Remote => Box::new(RemoteLedger::new(config)?),
        Mode::Test => Box::new(TestLedger::open(config.test_ledger_path()).await?),
    })
}
