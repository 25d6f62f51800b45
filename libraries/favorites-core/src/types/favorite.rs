//! Favorite types

use super::{FieldUpdate, Rank};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type FavoriteId = i64;

/// A ranked favorite album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub rank: Rank,
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    /// Calendar date of the last play, serialized as `YYYY-MM-DD`
    pub last_played: Option<NaiveDate>,
}

/// Data for creating a new favorite
///
/// The store trusts these values. Checking for empty titles or out-of-range
/// years is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFavorite {
    /// Rank the new favorite takes; favorites at or after it move back by one
    pub rank: Rank,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub last_played: Option<NaiveDate>,
}

impl CreateFavorite {
    pub fn new(rank: Rank, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            rank,
            title: title.into(),
            artist: artist.into(),
            year: None,
            last_played: None,
        }
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_last_played(mut self, date: NaiveDate) -> Self {
        self.last_played = Some(date);
        self
    }
}

/// Partial update of a favorite
///
/// `None`/`Unchanged` fields keep their stored value. Setting `rank` to a
/// different value moves the favorite and renumbers the ones in between.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFavorite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub year: FieldUpdate<i32>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub last_played: FieldUpdate<NaiveDate>,
}

impl UpdateFavorite {
    /// Patch that only moves the favorite to `rank`
    pub fn move_to(rank: Rank) -> Self {
        Self {
            rank: Some(rank),
            ..Self::default()
        }
    }

    /// Whether applying this patch to a favorite at `current` is a move
    pub fn changes_rank(&self, current: Rank) -> bool {
        self.rank.is_some_and(|rank| rank != current)
    }

    /// Apply every non-rank field of the patch to `favorite`
    pub fn apply_fields(self, favorite: &mut Favorite) {
        if let Some(title) = self.title {
            favorite.title = title;
        }
        if let Some(artist) = self.artist {
            favorite.artist = artist;
        }
        favorite.year = self.year.apply(favorite.year);
        favorite.last_played = self.last_played.apply(favorite.last_played);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Favorite {
        Favorite {
            id: 7,
            rank: 2,
            title: "Kind of Blue".to_string(),
            artist: "Miles Davis".to_string(),
            year: Some(1959),
            last_played: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    #[test]
    fn create_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let create = CreateFavorite::new(3, "Abbey Road", "The Beatles")
            .with_year(1969)
            .with_last_played(date);

        assert_eq!(create.rank, 3);
        assert_eq!(create.year, Some(1969));
        assert_eq!(create.last_played, Some(date));
    }

    #[test]
    fn same_rank_is_not_a_move() {
        let patch = UpdateFavorite::move_to(2);
        assert!(!patch.changes_rank(2));
        assert!(patch.changes_rank(5));
        assert!(!UpdateFavorite::default().changes_rank(1));
    }

    #[test]
    fn apply_fields_is_partial() {
        let mut favorite = sample();
        UpdateFavorite {
            title: Some("Sketches of Spain".to_string()),
            last_played: FieldUpdate::Clear,
            ..UpdateFavorite::default()
        }
        .apply_fields(&mut favorite);

        assert_eq!(favorite.title, "Sketches of Spain");
        assert_eq!(favorite.artist, "Miles Davis");
        assert_eq!(favorite.year, Some(1959));
        assert_eq!(favorite.last_played, None);
        assert_eq!(favorite.rank, 2);
    }

    #[test]
    fn favorite_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["last_played"], "2024-03-01");
        assert_eq!(json["rank"], 2);
        assert_eq!(json["year"], 1959);
    }

    #[test]
    fn update_from_json_distinguishes_null() {
        let patch: UpdateFavorite =
            serde_json::from_str(r#"{"rank": 4, "year": null, "title": null}"#).unwrap();

        assert_eq!(patch.rank, Some(4));
        assert_eq!(patch.title, None);
        assert_eq!(patch.year, FieldUpdate::Clear);
        assert_eq!(patch.last_played, FieldUpdate::Unchanged);
    }
}
