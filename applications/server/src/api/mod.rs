/// API route modules
pub mod favorites;
pub mod health;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router with every route nested under `/api`
pub fn router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        // Favorites
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::create_favorite),
        )
        .route("/favorites/recent", get(favorites::list_recent))
        .route("/favorites/max-rank", get(favorites::max_rank))
        .route(
            "/favorites/:id",
            get(favorites::get_favorite)
                .put(favorites::update_favorite)
                .delete(favorites::delete_favorite),
        )
        .route("/favorites/:id/played", post(favorites::mark_played));

    Router::new()
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
