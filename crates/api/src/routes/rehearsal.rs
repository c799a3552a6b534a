use axum::routing::{get, put};
use axum::Router;

use crate::handlers::rehearsal;
use crate::state::AppState;

/// Routes mounted at `/rehearsals`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// PUT    /{id}    -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rehearsal::list).post(rehearsal::create))
        .route("/{id}", put(rehearsal::update))
}
