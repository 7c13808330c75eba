//! Database transaction utilities
//!
//! This module provides utilities for working with database transactions,
//! particularly for multi-step operations that need atomicity.

use sqlx::{PgPool, Postgres, Transaction};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by `with_transaction` closures.
pub type TxFuture<'a, R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'a>>;

/// Execute a closure within a database transaction.
///
/// Begins a transaction, executes the closure, and commits if successful or
/// rolls back on error. Generic over the caller's error type so domain errors
/// survive the transaction boundary intact (a commit failure is converted via
/// `E: From<sqlx::Error>`).
///
/// # Example
///
/// ```ignore
/// use crewdesk_db::db::transaction::with_transaction;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), crewdesk_core::AppError> {
///     with_transaction(pool, |tx| {
///         Box::pin(async move {
///             sqlx::query("INSERT INTO ...").execute(&mut **tx).await?;
///             sqlx::query("UPDATE ...").execute(&mut **tx).await?;
///             Ok(())
///         })
///     })
///     .await
/// }
/// ```
pub async fn with_transaction<F, R, E>(pool: &PgPool, f: F) -> Result<R, E>
where
    F: for<'c> FnOnce(&'c mut Transaction<'static, Postgres>) -> TxFuture<'c, R, E>,
    E: From<sqlx::Error>,
{
    let mut tx = pool.begin().await.map_err(E::from)?;

    match f(&mut tx).await {
        Ok(result) => {
            tx.commit().await.map_err(E::from)?;
            Ok(result)
        }
        Err(e) => {
            // Ignore rollback errors; the original error is what matters
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Failed to roll back transaction");
            }
            Err(e)
        }
    }
}
