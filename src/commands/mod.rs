//! Command handlers for the ledger CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod auth;
mod categories;
mod edit;
mod init;
mod submit;

use crate::args::EntryArgs;
use crate::client::Outcome;
use crate::error::{ErrorType, IntoResult};
use crate::form::Form;
use crate::Result;
use anyhow::anyhow;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use auth::{login, logout, status, Status};
pub use categories::categories;
pub use edit::edit;
pub use init::init;
pub use submit::submit;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Turns a successful outcome into command output and any other outcome into an error tagged with
/// its `ErrorType`.
fn finish<T>(outcome: Outcome<T>) -> Result<Out<T>>
where
    T: Serialize + Clone + Debug,
{
    match outcome {
        Outcome::Success { message, value } => Ok(Out::new(message, value)),
        failure => {
            let error_type = failure.error_type().unwrap_or(ErrorType::Server);
            Err::<Out<T>, _>(anyhow!(failure.message())).pub_result(error_type)
        }
    }
}

/// Copies the values given on the command line into `form`. The type is set before the category
/// and the date before the year and month so that the form's own synchronization runs first and
/// explicit values win.
fn apply(form: &mut Form, entry: &EntryArgs) {
    if let Some(v) = &entry.transaction_type {
        form.set_transaction_type(v.as_str());
    }
    if let Some(v) = &entry.date {
        form.set_date(v.as_str());
    }
    if let Some(v) = &entry.year {
        form.set_year(v.as_str());
    }
    if let Some(v) = &entry.month {
        form.set_month(v.as_str());
    }
    if let Some(v) = &entry.month_num {
        form.set_month_num(v.as_str());
    }
    if let Some(v) = &entry.family_member {
        form.set_family_member(v.as_str());
    }
    if let Some(v) = &entry.amount {
        form.set_amount(v.as_str());
    }
    if let Some(v) = &entry.category {
        form.set_category(v.as_str());
    }
    if let Some(v) = &entry.description {
        form.set_description(v.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormInstance;
    use chrono::NaiveDate;

    #[test]
    fn test_apply_order() {
        let mut form = Form::new(
            FormInstance::Create,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        let entry = EntryArgs {
            transaction_type: Some("Expenditure".into()),
            date: Some("2024-03-15".into()),
            category: Some("Expenditure: Gadzekpo".into()),
            amount: Some("12".into()),
            ..EntryArgs::default()
        };
        apply(&mut form, &entry);
        assert_eq!(form.fields().category, "Expenditure: Gadzekpo");
        assert_eq!(form.fields().month, "March");
        assert_eq!(form.fields().year, "2024");
        assert_eq!(form.fields().amount, "12");
    }

    #[test]
    fn test_finish_tags_failures() {
        let e = finish::<()>(Outcome::NothingToEdit).unwrap_err();
        assert_eq!(ErrorType::of(&e), Some(ErrorType::Validation));
        assert!(format!("{e:#}").contains("No recent transaction to edit"));

        let e = finish::<()>(Outcome::NetworkError {
            message: "Network error: timed out".into(),
        })
        .unwrap_err();
        assert_eq!(ErrorType::of(&e), Some(ErrorType::Network));

        let out = finish(Outcome::Success {
            message: "ok".into(),
            value: 1u8,
        })
        .unwrap();
        assert_eq!(out.message(), "ok");
        assert_eq!(out.structure(), Some(&1));
    }
}
