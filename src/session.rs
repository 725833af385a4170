//! The Session Manager: the single authority on whether a user is logged in.

use crate::model::{TransactionId, User};
use crate::store::LocalStore;
use crate::Result;
use anyhow::Context;
use tracing::{debug, warn};

/// Key of the persisted session token.
pub const SESSION_TOKEN_KEY: &str = "ledger_session_token";

/// Key of the persisted user identity, stored as serialized JSON.
pub const USER_DATA_KEY: &str = "ledger_user_data";

/// Key of the persisted id of the most recently submitted transaction.
pub const LAST_TRANSACTION_KEY: &str = "ledger_last_transaction";

/// An authenticated identity and the opaque token that proves it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Session {
    user: User,
    token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Holds the session token and identity in a `LocalStore`. Nothing is cached: every `restore`
/// reads the stored values so that `clear` takes effect everywhere at once.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: LocalStore,
}

impl SessionManager {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// The current session, or `None` if the token or identity is missing or the identity cannot
    /// be parsed.
    pub fn restore(&self) -> Option<Session> {
        let token = self.store.get(SESSION_TOKEN_KEY).filter(|t| !t.is_empty())?;
        let user_data = self.store.get(USER_DATA_KEY)?;
        match serde_json::from_str::<User>(user_data) {
            Ok(user) => Some(Session::new(user, token)),
            Err(e) => {
                warn!("Ignoring stored user data that cannot be parsed: {e}");
                None
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.restore().is_some()
    }

    /// Stores `user` and `token`. They are returned by `restore` until `clear` is called.
    pub async fn start(&mut self, user: &User, token: &str) -> Result<()> {
        let user_data = serde_json::to_string(user).context("Unable to serialize user data")?;
        self.store
            .set_all([
                (SESSION_TOKEN_KEY, token.to_string()),
                (USER_DATA_KEY, user_data),
            ])
            .await
            .context("Unable to save the session")?;
        debug!("Session started for {}", user.display_name());
        Ok(())
    }

    /// Erases the token and identity.
    pub async fn clear(&mut self) -> Result<()> {
        self.store
            .remove(&[SESSION_TOKEN_KEY, USER_DATA_KEY])
            .await
            .context("Unable to clear the session")?;
        debug!("Session cleared");
        Ok(())
    }
}

/// Remembers the id of the most recently submitted transaction, the only one that can be edited.
#[derive(Debug, Clone)]
pub struct LastTransaction {
    store: LocalStore,
}

impl LastTransaction {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Option<TransactionId> {
        self.store
            .get(LAST_TRANSACTION_KEY)
            .filter(|id| !id.is_empty())
            .map(TransactionId::new)
    }

    /// Replaces the remembered id.
    pub async fn set(&mut self, id: &TransactionId) -> Result<()> {
        self.store
            .set(LAST_TRANSACTION_KEY, id.as_str())
            .await
            .context("Unable to save the last transaction id")
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.store
            .remove(&[LAST_TRANSACTION_KEY])
            .await
            .context("Unable to clear the last transaction id")
    }
}

/// The mutable state shared by the client's operations. It is owned by the `Client` and handed to
/// the submit and edit functions explicitly.
#[derive(Debug, Clone)]
pub struct ClientState {
    pub session: SessionManager,
    pub last_transaction: LastTransaction,
}

impl ClientState {
    pub fn new(session: SessionManager, last_transaction: LastTransaction) -> Self {
        Self {
            session,
            last_transaction,
        }
    }

    /// State that is never written to disk.
    pub fn in_memory() -> Self {
        Self::new(
            SessionManager::new(LocalStore::in_memory()),
            LastTransaction::new(LocalStore::in_memory()),
        )
    }
}
