use crate::service::{AccountService, HttpClients, PostalLookupService};
use shared::{
    abstract_trait::{DynAccountService, DynPostalLookup},
    config::Config,
    utils::Metrics,
};

use anyhow::Result;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub postal_lookup: DynPostalLookup,
    pub account_service: DynAccountService,
}

impl std::fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("postal_lookup", &"DynPostalLookup")
            .field("account_service", &"DynAccountService")
            .finish()
    }
}

impl DependenciesInject {
    pub async fn new(
        clients: HttpClients,
        config: &Config,
        registry: &mut Registry,
    ) -> Result<Self> {
        let postal_lookup: DynPostalLookup = Arc::new(
            PostalLookupService::new(
                clients.postal,
                config.postal_lookup_url.clone(),
                Arc::new(Mutex::new(Metrics::new())),
                registry,
            )
            .await,
        );
        let account_service: DynAccountService = Arc::new(
            AccountService::new(
                clients.account,
                config.account_create_url(),
                Arc::new(Mutex::new(Metrics::new())),
                registry,
            )
            .await,
        );

        Ok(Self {
            postal_lookup,
            account_service,
        })
    }
}
