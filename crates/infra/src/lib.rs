//! Infrastructure layer: configuration, persistence and application services.

pub mod config;
pub mod repository;
pub mod services;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use repository::{InMemoryLedgerStore, LedgerStore, PostgresLedgerStore, RepositoryError};
pub use services::{AccountService, PostedTransaction, ServiceError, TransactionService};
