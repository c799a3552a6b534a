pub mod auth;
pub mod character;
pub mod chat;
pub mod conversation;
pub mod health;
pub mod rehearsal;
pub mod script;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/user                      current (mocked) user
/// /login, /logout                 redirect to /
///
/// /characters                     list (?play=), create
/// /characters/{id}                get
///
/// /conversations                  find (?characterId=), create
/// /conversations/{id}             replace messages
///
/// /scripts                        list own, create
/// /scripts/{id}                   get, update
///
/// /rehearsals                     list own, create
/// /rehearsals/{id}                update
///
/// /chat                           streaming completion proxy (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/characters", character::router())
        .nest("/conversations", conversation::router())
        .nest("/scripts", script::router())
        .nest("/rehearsals", rehearsal::router())
        .nest("/chat", chat::router())
}
