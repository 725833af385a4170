//! A client for a household ledger service.
//!
//! Transactions are entered through a form that keeps its date fields in sync, checked locally by
//! the validator and then sent to the ledger service. The most recently submitted transaction can
//! be loaded back into a second form, corrected and saved.

pub mod api;
pub mod args;
pub mod client;
pub mod commands;
mod config;
mod error;
pub mod form;
pub mod model;
pub mod session;
pub mod store;
mod utils;
pub mod validate;


pub use api::Mode;
pub use config::Config;
pub use error::Error;
pub use error::ErrorType;
pub use error::IntoResult;
pub use error::Result;
