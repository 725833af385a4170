//! Implements the `Ledger` trait by posting JSON to the ledger service endpoint with `reqwest`.

use crate::api::{Ledger, LoginReply, Reply, Request, SubmitReply, TransactionReply};
use crate::model::{FormFields, TransactionId};
use crate::{Config, Result};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Sends every request to the single configured endpoint. Each call makes exactly one attempt.
pub(crate) struct RemoteLedger {
    url: Url,
    http: reqwest::Client,
}

impl RemoteLedger {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let url = Url::parse(config.api_url())
            .with_context(|| format!("Invalid ledger service URL '{}'", config.api_url()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { url, http })
    }

    async fn post<T>(&self, request: &Request) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let action = request.action();
        debug!("Sending '{action}' request to {}", self.url);
        let response = self
            .http
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to send the '{action}' request"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read the '{action}' response"))?;
        trace!("'{action}' response ({status}): {body}");

        serde_json::from_str(&body).with_context(|| {
            format!("The '{action}' response (HTTP {status}) is not a valid ledger reply")
        })
    }
}

#[async_trait::async_trait]
impl Ledger for RemoteLedger {
    async fn login(&mut self, email: &str, password: &str) -> Result<LoginReply> {
        self.post(&Request::Login {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    async fn submit(&mut self, session_token: &str, form_data: &FormFields) -> Result<SubmitReply> {
        self.post(&Request::Submit {
            session_token: session_token.to_string(),
            form_data: form_data.clone(),
        })
        .await
    }

    async fn get_transaction(
        &mut self,
        session_token: &str,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReply> {
        self.post(&Request::GetTransaction {
            session_token: session_token.to_string(),
            transaction_id: transaction_id.clone(),
        })
        .await
    }

    async fn update_transaction(
        &mut self,
        session_token: &str,
        transaction_id: &TransactionId,
        form_data: &FormFields,
    ) -> Result<Reply> {
        self.post(&Request::UpdateTransaction {
            session_token: session_token.to_string(),
            transaction_id: transaction_id.clone(),
            form_data: form_data.clone(),
        })
        .await
    }
}
