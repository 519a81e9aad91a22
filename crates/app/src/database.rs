//! Database connection management

use std::{future::Future, pin::Pin, time::Duration};

use sqlx::{
    PgPool, Postgres, Row, Transaction,
    error::DatabaseError,
    postgres::{PgPoolOptions, PgRow},
    query,
};
use thiserror::Error;
use tracing::warn;

/// SQL used to bound every statement issued inside a transaction.
pub const SET_STATEMENT_TIMEOUT_SQL: &str = "SELECT set_config('statement_timeout', $1, true)";

/// Default upper bound for a single unit of transactional work.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Boxed future returned by a unit of transactional work.
pub type TxFuture<'c, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>;

/// SQLSTATE raised when `statement_timeout` cancels a query.
pub const QUERY_CANCELED: &str = "57014";

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("storage error")]
    Sql(#[from] sqlx::Error),

    #[error("transaction exceeded {0:?}")]
    TimedOut(Duration),
}

/// Errors able to report that the database cancelled a statement for running
/// past the transaction's `statement_timeout`.
pub trait StatementTimeout {
    fn is_statement_timeout(&self) -> bool;
}

impl StatementTimeout for TransactionError {
    fn is_statement_timeout(&self) -> bool {
        match self {
            Self::Sql(error) => is_query_canceled(error),
            Self::TimedOut(_) => false,
        }
    }
}

/// Whether `error` is a query cancelled by the server.
#[must_use]
pub fn is_query_canceled(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(DatabaseError::code)
        .is_some_and(|code| code == QUERY_CANCELED)
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
    transaction_timeout: Duration,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout = timeout;
        self
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a plain read transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Run `work` inside a single transaction.
    ///
    /// Commits when `work` returns `Ok`. Rolls back when it returns `Err` or
    /// exceeds the configured timeout; the connection goes back to the pool on
    /// every path. A statement cancelled by the database-side limit is reported
    /// as [`TransactionError::TimedOut`] as well.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a [`TransactionError`] converted
    /// into `E` when beginning, committing or bounding the transaction fails.
    pub async fn with_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut Transaction<'static, Postgres>) -> TxFuture<'c, T, E>,
        E: From<TransactionError> + StatementTimeout,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|error| E::from(TransactionError::Sql(error)))?;

        let timeout_ms = self.transaction_timeout.as_millis().to_string();

        if let Err(error) = query(SET_STATEMENT_TIMEOUT_SQL)
            .bind(timeout_ms)
            .execute(&mut *tx)
            .await
        {
            rollback(tx).await;

            return Err(E::from(TransactionError::Sql(error)));
        }

        let outcome = tokio::time::timeout(self.transaction_timeout, work(&mut tx)).await;

        match outcome {
            Ok(Ok(value)) => {
                tx.commit()
                    .await
                    .map_err(|error| E::from(TransactionError::Sql(error)))?;

                Ok(value)
            }
            Ok(Err(error)) => {
                rollback(tx).await;

                if error.is_statement_timeout() {
                    return Err(E::from(TransactionError::TimedOut(
                        self.transaction_timeout,
                    )));
                }

                Err(error)
            }
            Err(_elapsed) => {
                rollback(tx).await;

                Err(E::from(TransactionError::TimedOut(self.transaction_timeout)))
            }
        }
    }
}

async fn rollback(tx: Transaction<'static, Postgres>) {
    if let Err(source) = tx.rollback().await {
        warn!("failed to roll back transaction: {source}");
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns an error when a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Convert an unsigned amount to its `BIGINT` column value.
pub(crate) fn encode_u64(value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Convert an unsigned count to its `INTEGER` column value.
pub(crate) fn encode_u32(value: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// Decode a non-negative `BIGINT` column.
pub(crate) fn decode_u64(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Decode a non-negative `INTEGER` column.
pub(crate) fn decode_u32(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let value: i32 = row.try_get(column)?;

    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
