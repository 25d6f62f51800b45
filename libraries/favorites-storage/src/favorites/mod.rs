//! Favorites vertical slice
//!
//! Reads take any executor (the pool, or a connection inside a transaction).
//! Writes take the transaction's connection and are only ever called from
//! [`crate::Atomic::run`], so a failure halfway through a shift is rolled back.
//!
//! Ranks are shifted in two phases. SQLite checks the UNIQUE index on `rank`
//! row by row, so `SET rank = rank + 1` over a range can collide with a
//! neighbour that has not been moved yet. Instead the range is first written
//! as negated targets, then flipped back to positive.

use chrono::NaiveDate;
use favorites_core::{
    is_contiguous, is_valid_rank, CreateFavorite, Favorite, FavoriteId, FavoritesError, Rank,
    Result, UpdateFavorite, MAX_RANK,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqliteConnection};

/// Rank a favorite is parked at while it is being moved
const PARKED_RANK: Rank = 0;

fn map_row(row: &SqliteRow) -> Result<Favorite> {
    Ok(Favorite {
        id: row.try_get("id")?,
        rank: row.try_get("rank")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        year: row.try_get("year")?,
        last_played: row.try_get("last_played")?,
    })
}

/// All favorites, ascending rank
pub async fn get_all<'e, E>(executor: E) -> Result<Vec<Favorite>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT id, rank, title, artist, year, last_played
         FROM favorites
         ORDER BY rank",
    )
    .fetch_all(executor)
    .await?;

    rows.iter().map(map_row).collect()
}

/// All favorites by last play, newest first, never-played last, then by rank
pub async fn get_by_recent<'e, E>(executor: E) -> Result<Vec<Favorite>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT id, rank, title, artist, year, last_played
         FROM favorites
         ORDER BY last_played IS NULL, last_played DESC, rank",
    )
    .fetch_all(executor)
    .await?;

    rows.iter().map(map_row).collect()
}

pub async fn get_by_id<'e, E>(executor: E, id: FavoriteId) -> Result<Option<Favorite>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT id, rank, title, artist, year, last_played
         FROM favorites
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(map_row).transpose()
}

/// Highest rank in use, 0 for an empty collection
pub async fn get_max_rank<'e, E>(executor: E) -> Result<Rank>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT COALESCE(MAX(rank), 0) AS max_rank FROM favorites")
        .fetch_one(executor)
        .await?;

    Ok(row.try_get("max_rank")?)
}

pub async fn count<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT COUNT(*) AS total FROM favorites")
        .fetch_one(executor)
        .await?;

    Ok(row.try_get("total")?)
}

/// Every rank in use, ascending
pub async fn get_ranks<'e, E>(executor: E) -> Result<Vec<Rank>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("SELECT rank FROM favorites ORDER BY rank")
        .fetch_all(executor)
        .await?;

    rows.iter()
        .map(|row| row.try_get("rank").map_err(FavoritesError::from))
        .collect()
}

/// Result of checking the rank invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankCheck {
    pub total: usize,
    pub max_rank: Rank,
    /// Ranks in `1..=max_rank` that no favorite holds
    pub missing: Vec<Rank>,
    /// Ranks below 1
    pub invalid: Vec<Rank>,
}

impl RankCheck {
    /// Ranks are exactly `1..=total`
    pub fn is_contiguous(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty() && self.max_rank == self.total as Rank
    }

    fn from_ranks(ranks: &[Rank]) -> Self {
        let max_rank = ranks.iter().copied().max().unwrap_or(0);
        let invalid: Vec<Rank> = ranks.iter().copied().filter(|rank| *rank < 1).collect();
        let missing = if is_contiguous(ranks) {
            Vec::new()
        } else {
            (1..=max_rank)
                .filter(|rank| ranks.binary_search(rank).is_err())
                .collect()
        };

        Self {
            total: ranks.len(),
            max_rank,
            missing,
            invalid,
        }
    }
}

/// Check that the stored ranks are exactly `1..=N`
pub async fn check_ranks<'e, E>(executor: E) -> Result<RankCheck>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ranks = get_ranks(executor).await?;
    let check = RankCheck::from_ranks(&ranks);

    if !check.is_contiguous() {
        tracing::error!(
            "Rank invariant broken: {} favorites, max rank {}, missing {:?}, invalid {:?}",
            check.total,
            check.max_rank,
            check.missing,
            check.invalid
        );
    }

    Ok(check)
}

/// Add `delta` to the rank of every favorite ranked in `from..=to`
///
/// Returns how many favorites moved. Fails without writing anything if a
/// shifted rank would leave `1..=MAX_RANK`.
async fn shift_ranks(conn: &mut SqliteConnection, from: Rank, to: Rank, delta: i64) -> Result<u64> {
    if from > to {
        return Ok(0);
    }

    let row = sqlx::query(
        "SELECT MIN(rank) AS lowest, MAX(rank) AS highest
         FROM favorites
         WHERE rank BETWEEN ? AND ?",
    )
    .bind(from)
    .bind(to)
    .fetch_one(&mut *conn)
    .await?;

    let lowest: Option<Rank> = row.try_get("lowest")?;
    let highest: Option<Rank> = row.try_get("highest")?;
    let (Some(lowest), Some(highest)) = (lowest, highest) else {
        return Ok(0);
    };

    let in_range = |rank: Rank| rank.checked_add(delta).is_some_and(is_valid_rank);
    if !in_range(lowest) || !in_range(highest) {
        return Err(FavoritesError::storage(format!(
            "Cannot shift ranks {lowest}..={highest} by {delta}: result outside 1..={MAX_RANK}"
        )));
    }

    let shifted = sqlx::query("UPDATE favorites SET rank = -(rank + ?) WHERE rank BETWEEN ? AND ?")
        .bind(delta)
        .bind(from)
        .bind(to)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("UPDATE favorites SET rank = -rank WHERE rank < 0")
        .execute(&mut *conn)
        .await?;

    Ok(shifted)
}

/// Insert a row at exactly `favorite.rank` without touching other ranks
///
/// The rank must be free.
pub async fn insert_at(conn: &mut SqliteConnection, favorite: &CreateFavorite) -> Result<FavoriteId> {
    let result = sqlx::query(
        r#"
        INSERT INTO favorites (rank, title, artist, year, last_played)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(favorite.rank)
    .bind(&favorite.title)
    .bind(&favorite.artist)
    .bind(favorite.year)
    .bind(favorite.last_played)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Insert a favorite at `favorite.rank`, moving everything at or after it back by one
///
/// Fails if `favorite.rank` is outside `1..=MAX_RANK`.
pub async fn insert(conn: &mut SqliteConnection, favorite: CreateFavorite) -> Result<Favorite> {
    if !is_valid_rank(favorite.rank) {
        return Err(FavoritesError::storage(format!(
            "Rank {} is outside 1..={MAX_RANK}",
            favorite.rank
        )));
    }

    let shifted = shift_ranks(conn, favorite.rank, Rank::MAX, 1).await?;
    let id = insert_at(conn, &favorite).await?;

    tracing::debug!(
        "Inserted favorite {} at rank {} ({} shifted)",
        id,
        favorite.rank,
        shifted
    );

    get_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| FavoritesError::storage("Failed to retrieve created favorite"))
}

/// Apply `update` to favorite `id`, moving it when the rank changes
///
/// A target rank outside `1..=max_rank` is clamped into that range so the
/// collection stays dense.
pub async fn update(
    conn: &mut SqliteConnection,
    id: FavoriteId,
    update: UpdateFavorite,
) -> Result<Option<Favorite>> {
    let Some(mut favorite) = get_by_id(&mut *conn, id).await? else {
        return Ok(None);
    };

    if let Some(requested) = update.rank.filter(|rank| *rank != favorite.rank) {
        let max_rank = get_max_rank(&mut *conn).await?;
        let target = requested.clamp(1, max_rank.max(1));

        if target != favorite.rank {
            move_rank(conn, id, favorite.rank, target).await?;
            favorite.rank = target;
        }
    }

    update.apply_fields(&mut favorite);

    sqlx::query(
        r#"
        UPDATE favorites
        SET rank = ?, title = ?, artist = ?, year = ?, last_played = ?
        WHERE id = ?
        "#,
    )
    .bind(favorite.rank)
    .bind(&favorite.title)
    .bind(&favorite.artist)
    .bind(favorite.year)
    .bind(favorite.last_played)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(Some(favorite))
}

/// Take favorite `id` out of the sequence and make room for it at `to`
///
/// The favorite is left parked; the caller writes its final rank.
async fn move_rank(conn: &mut SqliteConnection, id: FavoriteId, from: Rank, to: Rank) -> Result<()> {
    sqlx::query("UPDATE favorites SET rank = ? WHERE id = ?")
        .bind(PARKED_RANK)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    let shifted = if to < from {
        // Moving up: everything in [to, from) moves back one
        shift_ranks(conn, to, from - 1, 1).await?
    } else {
        // Moving down: everything in (from, to] moves forward one
        shift_ranks(conn, from + 1, to, -1).await?
    };

    tracing::debug!(
        "Moving favorite {} from rank {} to {} ({} shifted)",
        id,
        from,
        to,
        shifted
    );

    Ok(())
}

/// Delete favorite `id` and close the gap behind it
///
/// Returns `false` when there is no such favorite.
pub async fn delete(conn: &mut SqliteConnection, id: FavoriteId) -> Result<bool> {
    let Some(favorite) = get_by_id(&mut *conn, id).await? else {
        return Ok(false);
    };

    sqlx::query("DELETE FROM favorites WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    let shifted = match favorite.rank.checked_add(1) {
        Some(next) => shift_ranks(conn, next, Rank::MAX, -1).await?,
        None => 0,
    };

    tracing::debug!(
        "Deleted favorite {} at rank {} ({} shifted)",
        id,
        favorite.rank,
        shifted
    );

    Ok(true)
}

/// Set `last_played` of favorite `id` to `date`
pub async fn mark_played_on(
    conn: &mut SqliteConnection,
    id: FavoriteId,
    date: NaiveDate,
) -> Result<Option<Favorite>> {
    let result = sqlx::query("UPDATE favorites SET last_played = ? WHERE id = ?")
        .bind(date)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_by_id(&mut *conn, id).await
}
