//! Store contract for the ranked favorites collection

use crate::error::Result;
use crate::types::{CreateFavorite, Favorite, FavoriteId, Rank, UpdateFavorite};
use async_trait::async_trait;

/// Ranked collection store
///
/// Every mutating operation runs as one atomic unit: when it returns `Ok`,
/// the ranks of all favorites form `1..=N` again (the permissive insert case
/// aside, see [`FavoritesStore::insert`]), and no reader ever sees a
/// half-shifted collection.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// All favorites, ascending rank
    async fn list_by_rank(&self) -> Result<Vec<Favorite>>;

    /// All favorites, most recently played first
    ///
    /// Never-played favorites come last; ties are broken by ascending rank.
    async fn list_by_recency(&self) -> Result<Vec<Favorite>>;

    /// Favorite by ID
    async fn get_by_id(&self, id: FavoriteId) -> Result<Option<Favorite>>;

    /// Highest rank in use, or 0 when the collection is empty
    ///
    /// Advisory only: it is read outside any transaction, so two callers can
    /// both compute `max + 1`. Inserting at a taken rank still succeeds.
    async fn get_max_rank(&self) -> Result<Rank>;

    /// Number of favorites
    async fn count(&self) -> Result<i64>;

    /// Insert a favorite at `favorite.rank`, moving every favorite at or
    /// after that rank back by one
    ///
    /// A rank beyond `N + 1` is taken as is and leaves a gap. A rank outside
    /// `1..=MAX_RANK` is rejected.
    async fn insert(&self, favorite: CreateFavorite) -> Result<Favorite>;

    /// Apply a partial update, moving the favorite if the rank changes
    ///
    /// A target rank outside `1..=max rank` is clamped into that range rather
    /// than written as given, so a move never opens a gap.
    ///
    /// Returns `None` if no favorite has this ID.
    async fn update(&self, id: FavoriteId, update: UpdateFavorite) -> Result<Option<Favorite>>;

    /// Delete a favorite and close the gap it leaves
    ///
    /// Returns `false` if no favorite has this ID.
    async fn delete(&self, id: FavoriteId) -> Result<bool>;

    /// Set `last_played` to today's local date
    ///
    /// Returns `None` if no favorite has this ID.
    async fn mark_played(&self, id: FavoriteId) -> Result<Option<Favorite>>;
}
