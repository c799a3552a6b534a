use axum::routing::{get, put};
use axum::Router;

use crate::handlers::conversation;
use crate::state::AppState;

/// Routes mounted at `/conversations`.
///
/// ```text
/// GET    /        -> find_for_character
/// POST   /        -> create
/// PUT    /{id}    -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(conversation::find_for_character).post(conversation::create),
        )
        .route("/{id}", put(conversation::update))
}
