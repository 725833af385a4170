//! Implements the `Ledger` trait without a ledger service, for tests and for running the CLI
//! top-to-bottom offline.
//!
//! Note: this is compiled even in the "production" version of this app so that the `ledger` binary
//! can be driven in test mode (see `Mode::Test`).

use crate::api::{
    Ledger, LoginReply, Reply, SubmitReply, TransactionReply, WireFields, WireTransaction,
    SESSION_EXPIRED,
};
use crate::model::{parse_form_date, FormFields, TransactionId, User, WireDate};
use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// The email of the account that every `TestLedger` is seeded with.
pub const TEST_EMAIL: &str = "treasurer@example.com";

/// The password of the seeded account.
pub const TEST_PASSWORD: &str = "ledger-test";

const TEST_NAME: &str = "Test Treasurer";

/// Everything the `TestLedger` knows. This is what gets persisted between runs.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
struct TestLedgerState {
    accounts: BTreeMap<String, Account>,
    sessions: BTreeSet<String>,
    transactions: BTreeMap<String, WireTransaction>,
    next_id: u64,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
struct Account {
    password: String,
    user: User,
}

impl TestLedgerState {
    fn seeded() -> Self {
        let mut accounts = BTreeMap::new();
        accounts.insert(
            TEST_EMAIL.to_string(),
            Account {
                password: TEST_PASSWORD.to_string(),
                user: User::new(TEST_NAME, Some(TEST_EMAIL.to_string())),
            },
        );
        Self {
            accounts,
            sessions: BTreeSet::new(),
            transactions: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// An in-memory ledger service. When it has a path, its state is loaded from and saved to that
/// JSON file so that state carries over between CLI invocations.
#[derive(Debug, Clone)]
pub struct TestLedger {
    path: Option<PathBuf>,
    state: TestLedgerState,
    requests: usize,
}

impl Default for TestLedger {
    fn default() -> Self {
        Self {
            path: None,
            state: TestLedgerState::seeded(),
            requests: 0,
        }
    }
}

impl TestLedger {
    /// Loads the ledger persisted at `path`, or a freshly seeded one if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match utils::read_if_exists(&path).await? {
            Some(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse the test ledger at {}", path.display()))?,
            None => TestLedgerState::seeded(),
        };
        Ok(Self {
            path: Some(path),
            state,
            requests: 0,
        })
    }

    /// The number of requests this instance has answered.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Invalidates every session token, as the service does when sessions time out.
    pub async fn expire_sessions(&mut self) -> Result<()> {
        self.state.sessions.clear();
        self.save().await
    }

    /// The stored record for `id`.
    pub fn transaction(&self, id: &TransactionId) -> Option<&WireTransaction> {
        self.state.transactions.get(id.as_str())
    }

    /// Stores `transaction` under `id` directly, bypassing validation.
    pub async fn put_transaction(
        &mut self,
        id: &TransactionId,
        transaction: WireTransaction,
    ) -> Result<()> {
        self.state
            .transactions
            .insert(id.as_str().to_string(), transaction);
        self.save().await
    }

    async fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => utils::save_json(path, &self.state, false).await,
            None => Ok(()),
        }
    }

    fn is_valid_session(&self, token: &str) -> bool {
        self.state.sessions.contains(token)
    }

    fn begin(&mut self, action: &str) {
        self.requests += 1;
        debug!("TestLedger received '{action}'");
    }
}

fn expired() -> Reply {
    Reply::failed(format!("{SESSION_EXPIRED}. Please login again."))
}

/// Converts the form data into the stored representation, packing the date.
fn to_wire(form_data: &FormFields) -> std::result::Result<WireTransaction, Reply> {
    let date = parse_form_date(&form_data.date)
        .ok_or_else(|| Reply::failed(format!("Invalid date: {}", form_data.date)))?;
    Ok(WireTransaction {
        date: WireDate::new(date).to_string(),
        fields: WireFields {
            transaction_type: form_data.transaction_type.clone(),
            year: form_data.year.clone(),
            month: form_data.month.clone(),
            month_num: form_data.month_num.clone(),
            family_member: form_data.family_member.clone(),
            amount: form_data.amount.clone(),
            category: form_data.category.clone(),
            description: form_data.description.clone(),
        },
    })
}

#[async_trait::async_trait]
impl Ledger for TestLedger {
    async fn login(&mut self, email: &str, password: &str) -> Result<LoginReply> {
        self.begin("login");
        let account = match self.state.accounts.get(email.trim()) {
            Some(account) if account.password == password => account.clone(),
            _ => {
                return Ok(LoginReply {
                    reply: Reply::failed("Invalid email or password"),
                    ..LoginReply::default()
                })
            }
        };
        let token = Uuid::new_v4().to_string();
        self.state.sessions.insert(token.clone());
        self.save().await?;
        Ok(LoginReply {
            reply: Reply::ok("Login successful"),
            user: Some(account.user),
            session_token: Some(token),
        })
    }

    async fn submit(&mut self, session_token: &str, form_data: &FormFields) -> Result<SubmitReply> {
        self.begin("submit");
        if !self.is_valid_session(session_token) {
            return Ok(SubmitReply {
                reply: expired(),
                transaction_id: None,
            });
        }
        let transaction = match to_wire(form_data) {
            Ok(t) => t,
            Err(reply) => {
                return Ok(SubmitReply {
                    reply,
                    transaction_id: None,
                })
            }
        };
        let id = TransactionId::new(self.state.next_id.to_string());
        self.state.next_id += 1;
        self.state
            .transactions
            .insert(id.as_str().to_string(), transaction);
        self.save().await?;
        Ok(SubmitReply {
            reply: Reply::ok("Transaction recorded successfully!"),
            transaction_id: Some(id),
        })
    }

    async fn get_transaction(
        &mut self,
        session_token: &str,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReply> {
        self.begin("getTransaction");
        if !self.is_valid_session(session_token) {
            return Ok(TransactionReply {
                reply: expired(),
                transaction: None,
            });
        }
        Ok(match self.transaction(transaction_id) {
            Some(t) => TransactionReply {
                reply: Reply::ok("Transaction found"),
                transaction: Some(t.clone()),
            },
            None => TransactionReply {
                reply: Reply::failed(format!("Transaction {transaction_id} not found")),
                transaction: None,
            },
        })
    }

    async fn update_transaction(
        &mut self,
        session_token: &str,
        transaction_id: &TransactionId,
        form_data: &FormFields,
    ) -> Result<Reply> {
        self.begin("updateTransaction");
        if !self.is_valid_session(session_token) {
            return Ok(expired());
        }
        if self.transaction(transaction_id).is_none() {
            return Ok(Reply::failed(format!(
                "Transaction {transaction_id} not found"
            )));
        }
        let transaction = match to_wire(form_data) {
            Ok(t) => t,
            Err(reply) => return Ok(reply),
        };
        self.state
            .transactions
            .insert(transaction_id.as_str().to_string(), transaction);
        self.save().await?;
        Ok(Reply::ok("Transaction updated successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn form_data() -> FormFields {
        FormFields {
            transaction_type: "Monthly Dues".into(),
            date: "2024-03-05".into(),
            year: "2024".into(),
            month: "March".into(),
            month_num: "3".into(),
            family_member: "Esi".into(),
            amount: "20".into(),
            category: "Regular Monthly Dues".into(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_login() {
        let mut ledger = TestLedger::default();
        let bad = ledger.login(TEST_EMAIL, "nope").await.unwrap();
        assert!(!bad.reply.success);
        assert!(bad.session_token.is_none());

        let good = ledger.login(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
        assert!(good.reply.success);
        assert_eq!(good.user.unwrap().name, TEST_NAME);
        assert!(good.session_token.is_some());
        assert_eq!(ledger.requests(), 2);
    }

    #[tokio::test]
    async fn test_submit_stores_packed_date() {
        let mut ledger = TestLedger::default();
        let token = ledger
            .login(TEST_EMAIL, TEST_PASSWORD)
            .await
            .unwrap()
            .session_token
            .unwrap();
        let reply = ledger.submit(&token, &form_data()).await.unwrap();
        let id = reply.transaction_id.unwrap();
        assert_eq!(id.as_str(), "1");
        assert_eq!(ledger.transaction(&id).unwrap().date, "05032024");
    }

    #[tokio::test]
    async fn test_expired_session() {
        let mut ledger = TestLedger::default();
        let token = ledger
            .login(TEST_EMAIL, TEST_PASSWORD)
            .await
            .unwrap()
            .session_token
            .unwrap();
        ledger.expire_sessions().await.unwrap();
        let reply = ledger.submit(&token, &form_data()).await.unwrap();
        assert!(reply.reply.is_session_expired());
    }

    #[tokio::test]
    async fn test_state_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_ledger.json");
        let mut ledger = TestLedger::open(&path).await.unwrap();
        let token = ledger
            .login(TEST_EMAIL, TEST_PASSWORD)
            .await
            .unwrap()
            .session_token
            .unwrap();
        ledger.submit(&token, &form_data()).await.unwrap();

        let mut reopened = TestLedger::open(&path).await.unwrap();
        let reply = reopened
            .get_transaction(&token, &TransactionId::new("1"))
            .await
            .unwrap();
        assert!(reply.reply.success);
        assert_eq!(reply.transaction.unwrap().fields.family_member, "Esi");
    }

    #[tokio::test]
    async fn test_update_unknown_transaction() {
        let mut ledger = TestLedger::default();
        let token = ledger
            .login(TEST_EMAIL, TEST_PASSWORD)
            .await
            .unwrap()
            .session_token
            .unwrap();
        let reply = ledger
            .update_transaction(&token, &TransactionId::new("404"), &form_data())
            .await
            .unwrap();
        assert!(!reply.success);
        assert!(!reply.is_session_expired());
    }
}
