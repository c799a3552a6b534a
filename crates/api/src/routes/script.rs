use axum::routing::get;
use axum::Router;

use crate::handlers::script;
use crate::state::AppState;

/// Routes mounted at `/scripts`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(script::list).post(script::create))
        .route("/{id}", get(script::get_by_id).put(script::update))
}
