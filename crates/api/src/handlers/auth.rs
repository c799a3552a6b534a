//! Handlers for the mocked identity endpoints.

use axum::extract::State;
use axum::response::Redirect;
use axum::Json;
use stagecraft_db::models::user::User;
use stagecraft_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::state::AppState;

/// GET /api/auth/user
pub async fn current_user(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<User>> {
    // The extractor registers unknown users, so a miss here is a store fault.
    let record = UserRepo::find_by_id(&state.pool, &user.user_id)
        .await
        .ok_or_else(|| AppError::InternalError(format!("user {} vanished", user.user_id)))?;
    Ok(Json(record))
}

/// GET /api/login
pub async fn login() -> Redirect {
    Redirect::to("/")
}

/// GET /api/logout
pub async fn logout() -> Redirect {
    Redirect::to("/")
}
