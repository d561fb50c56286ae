use anyhow::{Context, Result};
use prometheus_client::{encoding::text::encode, registry::Registry};
use shared::config::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{di::DependenciesInject, service::HttpClients};

#[derive(Debug)]
pub struct AppState {
    pub registry: Arc<Mutex<Registry>>,
    pub di_container: DependenciesInject,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        let registry = Arc::new(Mutex::new(Registry::default()));

        let clients = HttpClients::init(&config).context("Failed to build HTTP clients")?;

        let di_container = {
            let mut registry = registry.lock().await;
            DependenciesInject::new(clients, &config, &mut registry)
                .await
                .context("Failed to initialize dependency injection container")?
        };

        Ok(Self {
            registry,
            di_container,
            config,
        })
    }

    /// Prometheus text exposition of every registered metric.
    pub async fn encode_metrics(&self) -> Result<String> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry).context("Failed to encode metrics")?;
        Ok(buffer)
    }
}
