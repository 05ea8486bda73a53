//! Postgres-backed ledger store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` |
//! | Database (other) | Any other | `Storage` |
//! | PoolClosed / Io / Decode / other | N/A | `Storage` |
//!
//! `PostgresLedgerStore` is `Send + Sync`; all access goes through the SQLx pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use ledger_accounts::{
    Account, DocumentNumber, NewTransaction, OperationType, Transaction, TransactionType,
};
use ledger_core::{AccountId, OperationTypeId, TransactionId};

use super::{
    AccountRepository, OperationTypeRepository, RepositoryError, RepositoryResult,
    TransactionRepository,
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        account_id      BIGSERIAL PRIMARY KEY,
        document_number TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS operation_types (
        operation_type_id BIGINT PRIMARY KEY,
        description       TEXT NOT NULL,
        transaction_type  SMALLINT NOT NULL CHECK (transaction_type IN (0, 1))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        transaction_id    BIGSERIAL PRIMARY KEY,
        account_id        BIGINT NOT NULL REFERENCES accounts (account_id),
        operation_type_id BIGINT NOT NULL REFERENCES operation_types (operation_type_id),
        amount            NUMERIC(31, 2) NOT NULL,
        event_date        TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Postgres-backed store for accounts, operation types and transactions.
#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and return a store over a fresh pool.
    pub async fn connect(database_url: &str) -> RepositoryResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the ledger tables when they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PostgresLedgerStore {
    #[instrument(skip_all, fields(document_number = %document_number), err)]
    async fn insert_account(&self, document_number: &DocumentNumber) -> RepositoryResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (document_number)
            VALUES ($1)
            RETURNING account_id, document_number
            "#,
        )
        .bind(document_number.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_account", e))?;

        row.try_into()
    }

    #[instrument(skip_all, fields(account_id = %account_id), err)]
    async fn find_account(&self, account_id: AccountId) -> RepositoryResult<Option<Account>> {
        sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, document_number FROM accounts WHERE account_id = $1",
        )
        .bind(account_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_account", e))?
        .map(Account::try_from)
        .transpose()
    }

    #[instrument(skip_all, fields(document_number = %document_number), err)]
    async fn find_account_by_document(
        &self,
        document_number: &DocumentNumber,
    ) -> RepositoryResult<Option<Account>> {
        sqlx::query_as::<_, AccountRow>(
            "SELECT account_id, document_number FROM accounts WHERE document_number = $1",
        )
        .bind(document_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_account_by_document", e))?
        .map(Account::try_from)
        .transpose()
    }
}

#[async_trait]
impl OperationTypeRepository for PostgresLedgerStore {
    #[instrument(skip_all, fields(operation_type_id = %operation_type_id), err)]
    async fn find_operation_type(
        &self,
        operation_type_id: OperationTypeId,
    ) -> RepositoryResult<Option<OperationType>> {
        sqlx::query_as::<_, OperationTypeRow>(
            r#"
            SELECT operation_type_id, description, transaction_type
            FROM operation_types
            WHERE operation_type_id = $1
            "#,
        )
        .bind(operation_type_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_operation_type", e))?
        .map(OperationType::try_from)
        .transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_operation_types(&self) -> RepositoryResult<Vec<OperationType>> {
        let rows = sqlx::query_as::<_, OperationTypeRow>(
            r#"
            SELECT operation_type_id, description, transaction_type
            FROM operation_types
            ORDER BY operation_type_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_operation_types", e))?;

        rows.into_iter().map(OperationType::try_from).collect()
    }

    #[instrument(skip_all, fields(operation_type_id = %operation_type.operation_type_id), err)]
    async fn upsert_operation_type(&self, operation_type: &OperationType) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO operation_types (operation_type_id, description, transaction_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (operation_type_id)
            DO UPDATE SET description = EXCLUDED.description,
                          transaction_type = EXCLUDED.transaction_type
            "#,
        )
        .bind(operation_type.operation_type_id.get())
        .bind(&operation_type.description)
        .bind(operation_type.transaction_type.code())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_operation_type", e))?;
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for PostgresLedgerStore {
    #[instrument(
        skip_all,
        fields(
            account_id = %transaction.account_id,
            operation_type_id = %transaction.operation_type_id
        ),
        err
    )]
    async fn insert_transaction(&self, transaction: NewTransaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO transactions (account_id, operation_type_id, amount, event_date)
            VALUES ($1, $2, $3, $4)
            RETURNING transaction_id, account_id, operation_type_id, amount, event_date
            "#,
        )
        .bind(transaction.account_id.get())
        .bind(transaction.operation_type_id.get())
        .bind(transaction.amount)
        .bind(transaction.event_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_transaction", e))?;

        Ok(row.into())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code() {
                Some(code) if &*code == "23505" => RepositoryError::UniqueViolation(msg),
                _ => RepositoryError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Storage(format!("connection pool closed in {}", operation))
        }
        _ => RepositoryError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}

// SQLx row types

#[derive(Debug)]
struct AccountRow {
    account_id: i64,
    document_number: String,
}

impl<'r> sqlx::FromRow<'r, PgRow> for AccountRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(AccountRow {
            account_id: row.try_get("account_id")?,
            document_number: row.try_get("document_number")?,
        })
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let document_number = DocumentNumber::parse(row.document_number)
            .map_err(|e| RepositoryError::Storage(format!("corrupt account row {}: {e}", row.account_id)))?;
        Ok(Account {
            account_id: AccountId::new(row.account_id),
            document_number,
        })
    }
}

#[derive(Debug)]
struct OperationTypeRow {
    operation_type_id: i64,
    description: String,
    transaction_type: i16,
}

impl<'r> sqlx::FromRow<'r, PgRow> for OperationTypeRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(OperationTypeRow {
            operation_type_id: row.try_get("operation_type_id")?,
            description: row.try_get("description")?,
            transaction_type: row.try_get("transaction_type")?,
        })
    }
}

impl TryFrom<OperationTypeRow> for OperationType {
    type Error = RepositoryError;

    fn try_from(row: OperationTypeRow) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::try_from(row.transaction_type).map_err(|e| {
            RepositoryError::Storage(format!("corrupt operation type row {}: {e}", row.operation_type_id))
        })?;
        Ok(OperationType {
            operation_type_id: OperationTypeId::new(row.operation_type_id),
            description: row.description,
            transaction_type,
        })
    }
}

#[derive(Debug)]
struct TransactionRow {
    transaction_id: i64,
    account_id: i64,
    operation_type_id: i64,
    amount: Decimal,
    event_date: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for TransactionRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(TransactionRow {
            transaction_id: row.try_get("transaction_id")?,
            account_id: row.try_get("account_id")?,
            operation_type_id: row.try_get("operation_type_id")?,
            amount: row.try_get("amount")?,
            event_date: row.try_get("event_date")?,
        })
    }
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            transaction_id: TransactionId::new(row.transaction_id),
            account_id: AccountId::new(row.account_id),
            operation_type_id: OperationTypeId::new(row.operation_type_id),
            amount: row.amount,
            event_date: row.event_date,
        }
    }
}
