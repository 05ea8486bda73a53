use std::sync::Arc;

use anyhow::Context;

use ledger_infra::repository::seed_operation_types;
use ledger_infra::{
    AccountService, AppConfig, InMemoryLedgerStore, LedgerStore, PostgresLedgerStore, StoreConfig,
    TransactionService,
};

/// Shared store handle; Postgres in production, in-memory for dev/tests.
pub type SharedStore = Arc<dyn LedgerStore>;

/// Services available to every handler (injected via `Extension`).
#[derive(Clone)]
pub struct AppServices {
    pub accounts: AccountService<SharedStore>,
    pub transactions: TransactionService<SharedStore>,
}

impl AppServices {
    pub fn new(store: SharedStore) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            transactions: TransactionService::new(store),
        }
    }
}

/// Select and prepare the store described by `config`, then wire the services.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: SharedStore = match &config.store {
        StoreConfig::InMemory => {
            tracing::warn!("USE_PERSISTENT_STORES not set; using the in-memory store");
            Arc::new(InMemoryLedgerStore::new())
        }
        StoreConfig::Postgres { database_url } => {
            let store = PostgresLedgerStore::connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            store
                .ensure_schema()
                .await
                .context("failed to create ledger schema")?;
            Arc::new(store)
        }
    };

    if config.seed_operation_types {
        seed_operation_types(store.as_ref())
            .await
            .context("failed to seed operation types")?;
    }

    Ok(AppServices::new(store))
}

/// In-memory services with the default operation types (dev/test).
pub async fn build_in_memory_services() -> anyhow::Result<AppServices> {
    build_services(&AppConfig::default()).await
}
