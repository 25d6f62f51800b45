//! One-time import from the legacy albums database
//!
//! The legacy database is opened read-only and never modified. Its `albums`
//! table is copied into an empty favorites collection in a single
//! transaction; if the collection already holds anything the import is
//! skipped so running it twice never duplicates favorites.

use crate::{favorites, LocalFavoritesStore};
use chrono::NaiveDate;
use favorites_core::{CreateFavorite, FavoritesError, Rank, Result};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, Row, SqliteConnection};
use std::path::Path;

/// Outcome of a legacy import
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportReport {
    /// The collection was not empty, nothing was written
    Skipped { existing: i64 },
    /// Rows were copied
    Imported {
        count: usize,
        /// Legacy rows whose rank had to change to make the sequence dense
        renumbered: usize,
    },
}

/// Album row as stored by the legacy application
#[derive(Debug, Clone)]
struct LegacyAlbum {
    rank: Rank,
    title: String,
    artist: String,
    year: Option<i64>,
    last_played: Option<String>,
}

/// Reduce a legacy `last_played` value (`YYYY-MM-DD HH:MM:SS` or a plain date)
/// to its calendar date
fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

async fn read_legacy_albums(legacy_path: &Path) -> Result<Vec<LegacyAlbum>> {
    if !legacy_path.exists() {
        return Err(FavoritesError::import(format!(
            "Legacy database not found at {}",
            legacy_path.display()
        )));
    }

    let mut source = SqliteConnectOptions::new()
        .filename(legacy_path)
        .read_only(true)
        .connect()
        .await?;

    let rows = sqlx::query(
        "SELECT id, rank, title, artist, year, last_played
         FROM albums
         ORDER BY rank",
    )
    .fetch_all(&mut source)
    .await?;

    let albums = rows
        .iter()
        .map(|row| -> std::result::Result<LegacyAlbum, sqlx::Error> {
            Ok(LegacyAlbum {
                rank: row.try_get("rank")?,
                title: row.try_get("title")?,
                artist: row.try_get("artist")?,
                year: row.try_get("year")?,
                last_played: row.try_get("last_played")?,
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    source.close().await?;

    Ok(albums)
}

fn to_create(album: LegacyAlbum, rank: Rank) -> CreateFavorite {
    let year = album.year.and_then(|year| match i32::try_from(year) {
        Ok(year) => Some(year),
        Err(_) => {
            tracing::warn!("Dropping out-of-range year {} for '{}'", year, album.title);
            None
        }
    });

    let last_played = album.last_played.as_deref().and_then(|raw| {
        let date = parse_legacy_date(raw);
        if date.is_none() {
            tracing::warn!("Dropping unreadable last_played '{}' for '{}'", raw, album.title);
        }
        date
    });

    CreateFavorite {
        rank,
        title: album.title,
        artist: album.artist,
        year,
        last_played,
    }
}

/// Write `albums` into an empty collection with dense ranks in legacy order
async fn copy_albums(conn: &mut SqliteConnection, albums: Vec<LegacyAlbum>) -> Result<ImportReport> {
    let existing = favorites::count(&mut *conn).await?;
    if existing > 0 {
        return Ok(ImportReport::Skipped { existing });
    }

    let count = albums.len();
    let mut renumbered = 0;
    for (index, album) in albums.into_iter().enumerate() {
        let rank = index as Rank + 1;
        if album.rank != rank {
            renumbered += 1;
        }
        favorites::insert_at(conn, &to_create(album, rank)).await?;
    }

    Ok(ImportReport::Imported { count, renumbered })
}

/// Copy every album of the legacy database at `legacy_path` into `store`
///
/// Albums keep their legacy order; ranks are rewritten to `1..=N` in that
/// order so gaps in the legacy data do not carry over.
pub async fn import_legacy(store: &LocalFavoritesStore, legacy_path: &Path) -> Result<ImportReport> {
    let albums = read_legacy_albums(legacy_path).await?;
    tracing::info!(
        "Found {} albums in legacy database {}",
        albums.len(),
        legacy_path.display()
    );

    let report = store
        .atomic()
        .run(move |conn| Box::pin(copy_albums(conn, albums)))
        .await?;

    match &report {
        ImportReport::Skipped { existing } => tracing::info!(
            "Collection already has {} favorites, skipping import",
            existing
        ),
        ImportReport::Imported { count, renumbered } => tracing::info!(
            "Imported {} favorites ({} renumbered)",
            count,
            renumbered
        ),
    }

    Ok(report)
}
