//! Request identity.
//!
//! There is no real identity provider: each request acts as the user named
//! in the `x-user-id` header, or as the configured mock user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stagecraft_core::types::{UserId, USER_ID_HEADER};
use stagecraft_db::models::user::UpsertUser;
use stagecraft_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// The user a request acts as. The user record is created on first use.
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = &state.config.identity;
        let requested = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let user_id = requested.unwrap_or(&identity.user_id).to_string();

        if UserRepo::find_by_id(&state.pool, &user_id).await.is_none() {
            let email = (user_id == identity.user_id)
                .then(|| identity.email.clone())
                .flatten();
            UserRepo::upsert(
                &state.pool,
                &UpsertUser {
                    id: user_id.clone(),
                    email,
                    ..Default::default()
                },
            )
            .await;
            tracing::debug!(user_id = %user_id, "Registered user on first request");
        }

        Ok(CurrentUser { user_id })
    }
}
