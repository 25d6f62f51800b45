//! Favorites Storage
//!
//! `SQLite` database layer for the ranked favorites collection.
//!
//! # Architecture
//!
//! - **Explicit Handle**: a [`LocalFavoritesStore`] is built once from a pool and
//!   passed to whoever serves requests; there is no global connection
//! - **Atomic Units of Work**: every rank-mutating operation runs through
//!   [`Atomic::run`], one transaction per operation, writers serialized
//! - **Vertical Slicing**: the [`favorites`] module owns its queries and the
//!   rank-shift logic
//!
//! # Example
//!
//! ```rust,no_run
//! use favorites_core::{CreateFavorite, FavoritesStore};
//! use favorites_storage::{create_pool, run_migrations, LocalFavoritesStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://music.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = LocalFavoritesStore::new(pool);
//! store
//!     .insert(CreateFavorite::new(1, "Blue Train", "John Coltrane").with_year(1958))
//!     .await?;
//!
//! let favorites = store.list_by_rank().await?;
//! # Ok(())
//! # }
//! ```

mod atomic;
mod context;
mod error;

pub mod favorites;
pub mod import;

pub use atomic::Atomic;
pub use context::LocalFavoritesStore;
pub use error::StorageError;
pub use favorites::RankCheck;
pub use import::{import_legacy, ImportReport};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> error::Result<()> {
    MIGRATOR.run(pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://music.db`)
pub async fn create_pool(database_url: &str) -> error::Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        // Readers see the last committed state while a writer is mid-transaction
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("Database pool ready");

    Ok(pool)
}
