mod favorite;
mod field_update;
mod rank;

pub use favorite::{CreateFavorite, Favorite, FavoriteId, UpdateFavorite};
pub use field_update::FieldUpdate;
pub use rank::{is_contiguous, is_valid_rank, Rank, MAX_RANK};
