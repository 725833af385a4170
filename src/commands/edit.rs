use crate::api::Mode;
use crate::args::EditArgs;
use crate::client::Client;
use crate::commands::{apply, finish, Out};
use crate::error::{ErrorType, IntoResult};
use crate::form::FormInstance;
use crate::model::{Field, FormFields};
use crate::{Config, Result};

/// Loads the most recently submitted transaction into the edit form, applies the values given in
/// `args` and saves it. With `--show` the transaction is only loaded.
pub async fn edit(config: Config, mode: Mode, args: EditArgs) -> Result<Out<FormFields>> {
    let mut client = Client::open(&config, mode)
        .await
        .pub_result(ErrorType::Config)?;
    let loaded = client.load_for_edit().await.pub_result(ErrorType::Storage)?;
    let loaded = finish(loaded)?;
    let id = loaded.structure().cloned();

    if args.show() {
        let fields = client.forms().get(FormInstance::Edit).fields().clone();
        let message = match id {
            Some(id) => format!("Transaction {id}:\n{}", describe(&fields)),
            None => loaded.message().to_string(),
        };
        return Ok(Out::new(message, fields));
    }

    apply(client.forms_mut().get_mut(FormInstance::Edit), args.entry());
    let saved = client.save_edit().await.pub_result(ErrorType::Storage)?;
    let saved = finish(saved)?;
    let fields = client.forms().get(FormInstance::Edit).fields().clone();
    Ok(Out::new(saved.message(), fields))
}

fn describe(fields: &FormFields) -> String {
    [
        Field::TransactionType,
        Field::Date,
        Field::Year,
        Field::Month,
        Field::MonthNum,
        Field::FamilyMember,
        Field::Amount,
        Field::Category,
        Field::Description,
    ]
    .iter()
    .map(|f| format!("  {}: {}", f.label(), fields.get(*f)))
    .collect::<Vec<_>>()
    .join("\n")
}
