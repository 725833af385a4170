//! The operations a user performs: logging in and out, submitting the create form, and loading
//! and saving the edit form.
//!
//! Each operation returns an `Outcome`. The `Err` side of the returned `Result` is reserved for
//! failures of local storage; everything that can go wrong with the form or the ledger service is
//! one of the `Outcome` variants.

mod edit;
mod submit;

pub use edit::{load_for_edit, save_edit, EditTarget};
pub use submit::submit;

use crate::api::{self, Ledger, Mode};
use crate::error::ErrorType;
use crate::form::{today, FormInstance, Forms};
use crate::model::{TransactionId, User};
use crate::session::{ClientState, LastTransaction, Session, SessionManager};
use crate::store::LocalStore;
use crate::validate::ValidationResult;
use crate::{Config, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Prefix of the message reported when no response was obtained from the ledger service.
pub const NETWORK_ERROR: &str = "Network error";

/// The result of one user operation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The ledger service accepted the request.
    Success { message: String, value: T },
    /// The form did not pass validation. No request was sent.
    Invalid(ValidationResult),
    /// No user is logged in. No request was sent.
    Unauthenticated,
    /// The ledger service reported that the session expired. The client has logged out.
    SessionExpired { message: String },
    /// The ledger service answered with `success: false`. The message is the server's.
    Rejected { message: String },
    /// No response was obtained from the ledger service.
    NetworkError { message: String },
    /// No transaction has been submitted that could be edited. No request was sent.
    NothingToEdit,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// The value carried by a successful outcome.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The text that should be shown to the user.
    pub fn message(&self) -> String {
        match self {
            Outcome::Success { message, .. } => message.clone(),
            Outcome::Invalid(report) => report.message(),
            Outcome::Unauthenticated => "You are not logged in. Please login first.".to_string(),
            Outcome::SessionExpired { message } => message.clone(),
            Outcome::Rejected { message } => message.clone(),
            Outcome::NetworkError { message } => message.clone(),
            Outcome::NothingToEdit => "No recent transaction to edit".to_string(),
        }
    }

    /// The class of failure, or `None` for a success.
    pub fn error_type(&self) -> Option<ErrorType> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Invalid(_) | Outcome::NothingToEdit => Some(ErrorType::Validation),
            Outcome::Unauthenticated | Outcome::SessionExpired { .. } => Some(ErrorType::Session),
            Outcome::Rejected { .. } => Some(ErrorType::Server),
            Outcome::NetworkError { .. } => Some(ErrorType::Network),
        }
    }

    /// Converts the value of a successful outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success { message, value } => Outcome::Success {
                message,
                value: f(value),
            },
            Outcome::Invalid(report) => Outcome::Invalid(report),
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::SessionExpired { message } => Outcome::SessionExpired { message },
            Outcome::Rejected { message } => Outcome::Rejected { message },
            Outcome::NetworkError { message } => Outcome::NetworkError { message },
            Outcome::NothingToEdit => Outcome::NothingToEdit,
        }
    }

    pub(crate) fn network_error(action: &str, e: &crate::Error) -> Self {
        warn!("No response to '{action}': {e:#}");
        Outcome::NetworkError {
            message: format!("{NETWORK_ERROR}: {e:#}"),
        }
    }
}

/// Forgets the session and the last transaction. This is what logout does, and what happens when
/// the server reports that the session expired.
pub(crate) async fn end_session(state: &mut ClientState) -> Result<()> {
    state.session.clear().await?;
    state.last_transaction.clear().await?;
    Ok(())
}

/// Uses `message` unless the server sent an empty one.
pub(crate) fn or_default(message: String, default: &str) -> String {
    if message.trim().is_empty() {
        default.to_string()
    } else {
        message
    }
}

/// Owns everything a user session needs: the ledger service, the persisted client state and the
/// two forms.
pub struct Client {
    ledger: Box<dyn Ledger + Send>,
    state: ClientState,
    forms: Forms,
}

impl Client {
    pub fn new(ledger: Box<dyn Ledger + Send>, state: ClientState, forms: Forms) -> Self {
        Self {
            ledger,
            state,
            forms,
        }
    }

    /// Creates the ledger for `mode` and opens the stored session and client state.
    pub async fn open(config: &Config, mode: Mode) -> Result<Self> {
        let ledger = api::ledger(config, mode).await?;
        let session = SessionManager::new(LocalStore::open(config.session_path(), true).await?);
        let last = LastTransaction::new(LocalStore::open(config.state_path(), false).await?);
        Ok(Self::new(
            ledger,
            ClientState::new(session, last),
            Forms::new(),
        ))
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    pub fn forms_mut(&mut self) -> &mut Forms {
        &mut self.forms
    }

    /// The current session, read from the session store.
    pub fn session(&self) -> Option<Session> {
        self.state.session.restore()
    }

    pub fn last_transaction(&self) -> Option<TransactionId> {
        self.state.last_transaction.get()
    }

    /// Authenticates with the ledger service and stores the session it returns.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Outcome<User>> {
        let reply = match self.ledger.login(email, password).await {
            Ok(reply) => reply,
            Err(e) => return Ok(Outcome::network_error("login", &e)),
        };
        if !reply.reply.success {
            return Ok(Outcome::Rejected {
                message: reply.reply.message,
            });
        }
        let (user, token) = match (reply.user, reply.session_token) {
            (Some(user), Some(token)) if !token.is_empty() => (user, token),
            _ => {
                return Ok(Outcome::Rejected {
                    message: "The login response did not include a user and session token"
                        .to_string(),
                })
            }
        };
        self.state.session.start(&user, &token).await?;
        info!("Logged in as {}", user.display_name());
        Ok(Outcome::Success {
            message: or_default(reply.reply.message, "Login successful"),
            value: user,
        })
    }

    /// Forgets the session and the last transaction and clears the create form.
    pub async fn logout(&mut self) -> Result<()> {
        end_session(&mut self.state).await?;
        self.forms.get_mut(FormInstance::Create).reset(today());
        debug!("Logged out");
        Ok(())
    }

    /// Submits the create form. On success the form is cleared for the next entry.
    pub async fn submit(&mut self) -> Result<Outcome<TransactionId>> {
        let fields = self.forms.get(FormInstance::Create).fields().clone();
        let outcome = submit(self.ledger.as_mut(), &mut self.state, &fields).await?;
        self.after(&outcome, FormInstance::Create);
        Ok(outcome)
    }

    /// Fetches the last submitted transaction and fills the edit form with it.
    pub async fn load_for_edit(&mut self) -> Result<Outcome<TransactionId>> {
        let outcome = load_for_edit(self.ledger.as_mut(), &mut self.state).await?;
        self.after(&outcome, FormInstance::Edit);
        let form = self.forms.get_mut(FormInstance::Edit);
        Ok(outcome.map(|EditTarget { id, fields }| {
            form.populate(fields);
            id
        }))
    }

    /// Saves the edit form over the last submitted transaction.
    pub async fn save_edit(&mut self) -> Result<Outcome<()>> {
        let id = match self.state.last_transaction.get() {
            Some(id) => id,
            None => return Ok(Outcome::NothingToEdit),
        };
        let fields = self.forms.get(FormInstance::Edit).fields().clone();
        let outcome = save_edit(self.ledger.as_mut(), &mut self.state, &id, &fields).await?;
        self.after(&outcome, FormInstance::Edit);
        Ok(outcome)
    }

    /// A successful create and an expired session both leave the create form blank.
    fn after<T>(&mut self, outcome: &Outcome<T>, instance: FormInstance) {
        let clear = match outcome {
            Outcome::Success { .. } => instance == FormInstance::Create,
            Outcome::SessionExpired { .. } => true,
            _ => false,
        };
        if clear {
            self.forms.get_mut(FormInstance::Create).reset(today());
        }
    }
}
