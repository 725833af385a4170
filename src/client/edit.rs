use crate::api::{Ledger, WireTransaction};
use crate::client::{end_session, or_default, Outcome};
use crate::model::{FormEntry, FormFields, TransactionId, WireDate};
use crate::session::ClientState;
use crate::validate::validate;
use crate::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A transaction fetched for editing: its id and its values as form text.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTarget {
    pub id: TransactionId,
    pub fields: FormFields,
}

/// Fetches the last submitted transaction so that it can be edited. Returns
/// `Outcome::NothingToEdit` without a request when nothing has been submitted.
pub async fn load_for_edit(
    ledger: &mut (dyn Ledger + Send),
    state: &mut ClientState,
) -> Result<Outcome<EditTarget>> {
    let id = match state.last_transaction.get() {
        Some(id) => id,
        None => return Ok(Outcome::NothingToEdit),
    };
    let session = match state.session.restore() {
        Some(session) => session,
        None => return Ok(Outcome::Unauthenticated),
    };

    let reply = match ledger.get_transaction(session.token(), &id).await {
        Ok(reply) => reply,
        Err(e) => return Ok(Outcome::network_error("getTransaction", &e)),
    };
    if reply.reply.is_session_expired() {
        info!("The session expired, logging out");
        end_session(state).await?;
        return Ok(Outcome::SessionExpired {
            message: reply.reply.message,
        });
    }
    if !reply.reply.success {
        return Ok(Outcome::Rejected {
            message: format!("Error loading transaction: {}", reply.reply.message),
        });
    }
    let transaction = match reply.transaction {
        Some(t) => t,
        None => {
            return Ok(Outcome::Rejected {
                message: format!("The server did not return transaction {id}"),
            })
        }
    };
    debug!("Loaded transaction {id} for editing");
    Ok(Outcome::Success {
        message: or_default(reply.reply.message, "Transaction loaded"),
        value: EditTarget {
            id,
            fields: to_form_fields(transaction),
        },
    })
}

/// Validates `fields` and sends them to the ledger service as the new values of transaction `id`.
/// Validation and outcomes are the same as for `submit`; the last transaction is not changed.
pub async fn save_edit(
    ledger: &mut (dyn Ledger + Send),
    state: &mut ClientState,
    id: &TransactionId,
    fields: &FormFields,
) -> Result<Outcome<()>> {
    let report = validate(fields);
    if !report.is_valid() {
        debug!("Not saving, {} validation errors", report.errors().len());
        return Ok(Outcome::Invalid(report));
    }
    let session = match state.session.restore() {
        Some(session) => session,
        None => return Ok(Outcome::Unauthenticated),
    };
    let entry = FormEntry::try_from(fields)?;

    let reply = match ledger
        .update_transaction(session.token(), id, &entry.to_fields())
        .await
    {
        Ok(reply) => reply,
        Err(e) => return Ok(Outcome::network_error("updateTransaction", &e)),
    };
    if reply.is_session_expired() {
        info!("The session expired, logging out");
        end_session(state).await?;
        return Ok(Outcome::SessionExpired {
            message: reply.message,
        });
    }
    if !reply.success {
        return Ok(Outcome::Rejected {
            message: reply.message,
        });
    }
    info!("Updated transaction {id}");
    Ok(Outcome::Success {
        message: or_default(reply.message, "Transaction updated successfully!"),
        value: (),
    })
}

/// Converts a stored transaction into form text. A date that is not a packed `DDMMYYYY` date is
/// left empty for the user to fill in.
fn to_form_fields(transaction: WireTransaction) -> FormFields {
    let WireTransaction { date, fields } = transaction;
    let date = match WireDate::parse(&date) {
        Some(d) => d.to_form_date(),
        None => {
            warn!("The stored date '{date}' is not a DDMMYYYY date");
            String::new()
        }
    };
    FormFields {
        transaction_type: fields.transaction_type,
        date,
        year: fields.year,
        month: fields.month,
        month_num: fields.month_num,
        family_member: fields.family_member,
        amount: fields.amount,
        category: fields.category,
        description: fields.description,
    }
}
