//! Favorites Core
//!
//! Platform-agnostic types, the store contract, and error handling for the
//! ranked favorites collection.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Favorite`, `CreateFavorite`, `UpdateFavorite`
//! - **Store Contract**: `FavoritesStore`, the narrow surface every caller goes through
//! - **Error Handling**: Unified `FavoritesError` and `Result` types
//!
//! Every favorite holds a rank. Across the whole collection the ranks are
//! exactly `1..=N`, and every store implementation has to keep it that way
//! across inserts, moves and deletes.
//!
//! # Example
//!
//! ```rust
//! use favorites_core::types::{CreateFavorite, FieldUpdate, UpdateFavorite};
//!
//! let create = CreateFavorite::new(1, "Blue Train", "John Coltrane").with_year(1958);
//! assert_eq!(create.rank, 1);
//!
//! // Move to rank 3 and clear the year, leaving everything else untouched
//! let patch = UpdateFavorite {
//!     rank: Some(3),
//!     year: FieldUpdate::Clear,
//!     ..UpdateFavorite::default()
//! };
//! assert!(patch.changes_rank(1));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

pub use error::{FavoritesError, Result};
pub use storage::FavoritesStore;

pub use types::{
    is_contiguous, is_valid_rank, CreateFavorite, Favorite, FavoriteId, FieldUpdate, Rank,
    UpdateFavorite, MAX_RANK,
};
