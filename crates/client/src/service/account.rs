use async_trait::async_trait;
use prometheus_client::registry::Registry;
use reqwest::Client;
use shared::{
    abstract_trait::AccountServiceTrait,
    domain::{
        request::RegisterRequest,
        response::{AccountReply, CreateAccountResponse},
    },
    utils::{AppError, Method, Metrics},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::{complete_tracing, start_tracing};

/// Posts registration records to the account-creation endpoint.
#[derive(Debug)]
pub struct AccountService {
    client: Client,
    create_url: String,
    metrics: Arc<Mutex<Metrics>>,
}

impl AccountService {
    pub async fn new(
        client: Client,
        create_url: impl Into<String>,
        metrics: Arc<Mutex<Metrics>>,
        registry: &mut Registry,
    ) -> Self {
        metrics
            .lock()
            .await
            .register("account_service", "AccountService", registry);

        Self {
            client,
            create_url: create_url.into(),
            metrics,
        }
    }

    async fn post(&self, input: &RegisterRequest) -> Result<AccountReply, AppError> {
        let response = self.client.post(&self.create_url).json(input).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: CreateAccountResponse = serde_json::from_str(&text)?;

        Ok(AccountReply::new(status, body))
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, input: &RegisterRequest) -> Result<AccountReply, AppError> {
        info!("Creating account: {}", input.email);

        let method = Method::Post;
        let tracing_ctx = start_tracing("CreateAccount");

        match self.post(input).await {
            Ok(reply) => {
                let accepted = reply.is_success_status() && reply.body.success == Some(true);

                complete_tracing(
                    &self.metrics,
                    &tracing_ctx,
                    method,
                    accepted,
                    &format!("Account {} answered with {reply}", input.email),
                )
                .await;

                Ok(reply)
            }
            Err(err) => {
                complete_tracing(
                    &self.metrics,
                    &tracing_ctx,
                    method,
                    false,
                    &format!("Failed to create account {}: {err}", input.email),
                )
                .await;

                Err(err)
            }
        }
    }
}
