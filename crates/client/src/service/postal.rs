use async_trait::async_trait;
use prometheus_client::registry::Registry;
use reqwest::Client;
use shared::{
    abstract_trait::PostalLookupTrait,
    domain::response::{PostalAddress, PostalCodeResponse},
    utils::{AppError, Method, Metrics},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::{complete_tracing, start_tracing};

/// ViaCEP-compatible lookup: `GET {base_url}/{zip_code}/json/`.
#[derive(Debug)]
pub struct PostalLookupService {
    client: Client,
    base_url: String,
    metrics: Arc<Mutex<Metrics>>,
}

impl PostalLookupService {
    pub async fn new(
        client: Client,
        base_url: impl Into<String>,
        metrics: Arc<Mutex<Metrics>>,
        registry: &mut Registry,
    ) -> Self {
        metrics
            .lock()
            .await
            .register("postal_lookup", "PostalLookupService", registry);

        Self {
            client,
            base_url: base_url.into(),
            metrics,
        }
    }

    pub fn lookup_url(&self, zip_code: &str) -> String {
        format!("{}/{}/json/", self.base_url, zip_code)
    }

    async fn fetch(&self, url: &str) -> Result<PostalCodeResponse, AppError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AppError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl PostalLookupTrait for PostalLookupService {
    async fn lookup(&self, zip_code: &str) -> Result<Option<PostalAddress>, AppError> {
        info!("Looking up zip code: {zip_code}");

        let method = Method::Get;
        let tracing_ctx = start_tracing("LookupZipCode");
        let url = self.lookup_url(zip_code);

        match self.fetch(&url).await {
            Ok(body) if body.is_not_found() => {
                complete_tracing(
                    &self.metrics,
                    &tracing_ctx,
                    method,
                    true,
                    &format!("Zip code {zip_code} not found"),
                )
                .await;

                Ok(None)
            }
            Ok(body) => {
                let address = PostalAddress::from(body);

                complete_tracing(
                    &self.metrics,
                    &tracing_ctx,
                    method,
                    true,
                    &format!("Zip code {zip_code} resolved to {}", address.city),
                )
                .await;

                Ok(Some(address))
            }
            Err(err) => {
                complete_tracing(
                    &self.metrics,
                    &tracing_ctx,
                    method,
                    false,
                    &format!("Failed to look up zip code {zip_code}: {err}"),
                )
                .await;

                Err(err)
            }
        }
    }
}
