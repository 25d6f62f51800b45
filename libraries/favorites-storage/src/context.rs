use crate::{create_pool, favorites, run_migrations, Atomic, RankCheck};
use async_trait::async_trait;
use favorites_core::{
    CreateFavorite, Favorite, FavoriteId, FavoritesStore, Rank, Result, UpdateFavorite,
};
use sqlx::SqlitePool;

/// Local favorites store using `SQLite`
///
/// Construct one at startup and share it (e.g. behind an `Arc`) with whatever
/// serves requests.
pub struct LocalFavoritesStore {
    pool: SqlitePool,
    atomic: Atomic,
}

impl LocalFavoritesStore {
    pub fn new(pool: SqlitePool) -> Self {
        let atomic = Atomic::new(pool.clone());
        Self { pool, atomic }
    }

    /// Open (creating if needed) the database at `database_url` and migrate it
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn atomic(&self) -> &Atomic {
        &self.atomic
    }

    /// Check the rank invariant against what is stored
    pub async fn check_ranks(&self) -> Result<RankCheck> {
        favorites::check_ranks(&self.pool).await
    }
}

#[async_trait]
impl FavoritesStore for LocalFavoritesStore {
    async fn list_by_rank(&self) -> Result<Vec<Favorite>> {
        favorites::get_all(&self.pool).await
    }

    async fn list_by_recency(&self) -> Result<Vec<Favorite>> {
        favorites::get_by_recent(&self.pool).await
    }

    async fn get_by_id(&self, id: FavoriteId) -> Result<Option<Favorite>> {
        favorites::get_by_id(&self.pool, id).await
    }

    async fn get_max_rank(&self) -> Result<Rank> {
        favorites::get_max_rank(&self.pool).await
    }

    async fn count(&self) -> Result<i64> {
        favorites::count(&self.pool).await
    }

    async fn insert(&self, favorite: CreateFavorite) -> Result<Favorite> {
        self.atomic
            .run(move |conn| Box::pin(favorites::insert(conn, favorite)))
            .await
    }

    async fn update(&self, id: FavoriteId, update: UpdateFavorite) -> Result<Option<Favorite>> {
        self.atomic
            .run(move |conn| Box::pin(favorites::update(conn, id, update)))
            .await
    }

    async fn delete(&self, id: FavoriteId) -> Result<bool> {
        self.atomic
            .run(move |conn| Box::pin(favorites::delete(conn, id)))
            .await
    }

    async fn mark_played(&self, id: FavoriteId) -> Result<Option<Favorite>> {
        let today = chrono::Local::now().date_naive();
        self.atomic
            .run(move |conn| Box::pin(favorites::mark_played_on(conn, id, today)))
            .await
    }
}
