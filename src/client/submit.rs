use crate::api::Ledger;
use crate::client::{end_session, or_default, Outcome};
use crate::model::{FormEntry, FormFields, TransactionId};
use crate::session::ClientState;
use crate::validate::validate;
use crate::Result;
use tracing::{debug, info, warn};

/// Validates `fields` and, if they are valid and a user is logged in, sends them to the ledger
/// service as a new transaction.
///
/// - An invalid form returns `Outcome::Invalid` without a request.
/// - On success the returned id becomes the last transaction.
/// - A session-expiry failure ends the session, exactly as logout does.
/// - When no response is obtained the last transaction is left alone.
pub async fn submit(
    ledger: &mut (dyn Ledger + Send),
    state: &mut ClientState,
    fields: &FormFields,
) -> Result<Outcome<TransactionId>> {
    let report = validate(fields);
    if !report.is_valid() {
        debug!("Not submitting, {} validation errors", report.errors().len());
        return Ok(Outcome::Invalid(report));
    }
    let session = match state.session.restore() {
        Some(session) => session,
        None => return Ok(Outcome::Unauthenticated),
    };
    let entry = FormEntry::try_from(fields)?;

    let reply = match ledger.submit(session.token(), &entry.to_fields()).await {
        Ok(reply) => reply,
        Err(e) => return Ok(Outcome::network_error("submit", &e)),
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
            message: reply.reply.message,
        });
    }
    let id = match reply.transaction_id {
        Some(id) => id,
        None => {
            warn!("The ledger service accepted the transaction but did not return its id");
            return Ok(Outcome::Rejected {
                message: "The transaction was saved but the server did not return its id"
                    .to_string(),
            });
        }
    };
    state.last_transaction.set(&id).await?;
    info!("Submitted transaction {id}");
    Ok(Outcome::Success {
        message: or_default(reply.reply.message, "Transaction submitted successfully!"),
        value: id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SubmitReply, TestLedger};
    use crate::model::Field;
    use crate::test::{logged_in, valid_fields, FailingLedger, ScriptedLedger};

    #[tokio::test]
    async fn test_submit_success_records_last_transaction() {
        let mut ledger = TestLedger::default();
        let mut state = logged_in(&mut ledger).await;
        let outcome = submit(&mut ledger, &mut state, &valid_fields())
            .await
            .unwrap();
        let id = outcome.value().unwrap().clone();
        assert_eq!(state.last_transaction.get(), Some(id.clone()));
        assert_eq!(outcome.message(), "Transaction recorded successfully!");
        assert_eq!(ledger.transaction(&id).unwrap().date, "15032024");
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let mut ledger = TestLedger::default();
        let mut state = logged_in(&mut ledger).await;
        let before = ledger.requests();
        let outcome = submit(&mut ledger, &mut state, &FormFields::default())
            .await
            .unwrap();
        let report = match outcome {
            Outcome::Invalid(report) => report,
            other => panic!("expected Invalid, got {other:?}"),
        };
        assert_eq!(report.errors().len(), 7);
        assert!(!report.errors().iter().any(|e| e.contains("not valid for")));
        assert!(report.is_invalid(Field::Amount));
        assert_eq!(ledger.requests(), before);
    }

    #[tokio::test]
    async fn test_mismatched_category_sends_nothing() {
        let mut ledger = TestLedger::default();
        let mut state = logged_in(&mut ledger).await;
        let before = ledger.requests();
        let mut fields = valid_fields();
        fields.category = "Gadzekpo".into();
        let outcome = submit(&mut ledger, &mut state, &fields).await.unwrap();
        assert!(matches!(outcome, Outcome::Invalid(_)));
        assert_eq!(ledger.requests(), before);
    }

    #[tokio::test]
    async fn test_not_logged_in() {
        let mut ledger = TestLedger::default();
        let mut state = ClientState::in_memory();
        let outcome = submit(&mut ledger, &mut state, &valid_fields())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Unauthenticated);
        assert_eq!(ledger.requests(), 0);
    }

    #[tokio::test]
    async fn test_session_expired_logs_out() {
        let mut ledger = TestLedger::default();
        let mut state = logged_in(&mut ledger).await;
        state
            .last_transaction
            .set(&TransactionId::new("3"))
            .await
            .unwrap();
        ledger.expire_sessions().await.unwrap();

        let outcome = submit(&mut ledger, &mut state, &valid_fields())
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::SessionExpired { .. }));
        assert!(state.session.restore().is_none());
        assert!(!state.session.is_logged_in());
        assert!(state.last_transaction.get().is_none());
    }

    #[tokio::test]
    async fn test_server_rejection_is_verbatim() {
        let mut ledger = ScriptedLedger::submit_reply(SubmitReply {
            reply: crate::api::Reply::failed("Duplicate entry for March"),
            transaction_id: None,
        });
        let mut state = logged_in(&mut TestLedger::default()).await;
        let outcome = submit(&mut ledger, &mut state, &valid_fields())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Rejected {
                message: "Duplicate entry for March".into()
            }
        );
        assert!(state.session.is_logged_in());
    }

    #[tokio::test]
    async fn test_network_error_keeps_last_transaction() {
        let mut state = logged_in(&mut TestLedger::default()).await;
        state
            .last_transaction
            .set(&TransactionId::new("8"))
            .await
            .unwrap();
        let mut ledger = FailingLedger;
        let outcome = submit(&mut ledger, &mut state, &valid_fields())
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::NetworkError { .. }));
        assert!(outcome.message().starts_with("Network error"));
        assert_eq!(state.last_transaction.get().unwrap().as_str(), "8");
        assert!(state.session.is_logged_in());
    }

    #[tokio::test]
    async fn test_smallest_amount_is_accepted() {
        let mut ledger = TestLedger::default();
        let mut state = logged_in(&mut ledger).await;
        let mut fields = valid_fields();
        fields.amount = "0.01".into();
        let outcome = submit(&mut ledger, &mut state, &fields).await.unwrap();
        assert!(outcome.is_success());
    }
}
