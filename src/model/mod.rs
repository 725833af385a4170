//! Types that represent the core data model, such as `FormFields`, `FormEntry` and
//! `TransactionType`.
mod amount;
mod entry;
mod month;
mod transaction_type;
pub(crate) mod wire;

pub use amount::{Amount, AmountError};
pub use entry::{Field, FormEntry, FormFields};
pub use month::Month;
pub use transaction_type::{categories_for, TransactionType};
pub use wire::{parse_form_date, TransactionId, WireDate, FORM_DATE_FORMAT};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The identity of the logged-in user as returned by the ledger service. Nothing in it is required;
/// whatever the service sends is kept so that it survives being persisted and restored.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub other_fields: BTreeMap<String, serde_json::Value>,
}

impl User {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            name: name.into(),
            email,
            other_fields: BTreeMap::new(),
        }
    }

    /// The name to greet the user by: `name`, else `email`, else a placeholder.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return &self.name;
        }
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => email,
            _ => "unknown user",
        }
    }
}
