use axum::routing::post;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// POST   /        -> stream_chat
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat::stream_chat))
}
