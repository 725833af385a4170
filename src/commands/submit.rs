use crate::api::Mode;
use crate::args::EntryArgs;
use crate::client::Client;
use crate::commands::{apply, finish, Out};
use crate::error::{ErrorType, IntoResult};
use crate::form::FormInstance;
use crate::model::TransactionId;
use crate::{Config, Result};

/// Fills the create form from `entry` and submits it. The returned id can be changed afterwards
/// with `ledger edit`.
pub async fn submit(config: Config, mode: Mode, entry: EntryArgs) -> Result<Out<TransactionId>> {
    let mut client = Client::open(&config, mode)
        .await
        .pub_result(ErrorType::Config)?;
    apply(client.forms_mut().get_mut(FormInstance::Create), &entry);
    let outcome = client.submit().await.pub_result(ErrorType::Storage)?;
    finish(outcome)
}
