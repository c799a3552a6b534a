use axum::routing::get;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Identity routes, merged at the `/api` root.
///
/// ```text
/// GET /auth/user   -> current_user
/// GET /login       -> login
/// GET /logout      -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/user", get(auth::current_user))
        .route("/login", get(auth::login))
        .route("/logout", get(auth::logout))
}
