use favorites_core::Result;
use futures::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;

/// Runs units of work as all-or-nothing transactions
///
/// Writers are serialized by an in-process lock so two rank shifts never
/// interleave; readers go straight to the pool and, with WAL journaling,
/// only ever see committed states.
pub struct Atomic {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl Atomic {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    /// Run `work` inside a transaction
    ///
    /// Commits when `work` returns `Ok`. On `Err` every statement it issued is
    /// rolled back and the error is returned unchanged.
    pub async fn run<T, F>(&self, work: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T>> + Send,
        T: Send,
    {
        let _writer = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        match work(&mut *tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!("Rollback failed after {}: {}", err, rollback_err);
                }
                Err(err)
            }
        }
    }
}
