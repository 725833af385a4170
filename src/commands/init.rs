use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories and an initial `config.json` file that points
/// at `api_url`.
///
/// # Arguments
/// - `ledger_home` - The directory that will be the root of data directory, e.g. `$HOME/ledger`
/// - `api_url` - The URL of the ledger service endpoint.
///
/// # Errors
/// - Returns an error if the URL is invalid or any file operations fail.
pub async fn init(ledger_home: &Path, api_url: &str) -> Result<Out<()>> {
    let config = Config::create(ledger_home, api_url)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the ledger directory at {}. Run 'ledger login' next.",
        config.root().display()
    )
    .into())
}
