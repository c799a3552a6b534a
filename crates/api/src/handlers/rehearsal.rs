//! Handlers for the `/rehearsals` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stagecraft_core::error::CoreError;
use stagecraft_core::types::DbId;
use stagecraft_core::validation::validate_reference;
use stagecraft_db::models::rehearsal::{CreateRehearsal, Rehearsal, UpdateRehearsal};
use stagecraft_db::repositories::RehearsalRepo;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::state::AppState;

/// GET /api/rehearsals
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Rehearsal>>> {
    Ok(Json(RehearsalRepo::list(&state.pool, Some(&user.user_id)).await))
}

/// POST /api/rehearsals
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateRehearsal>,
) -> AppResult<(StatusCode, Json<Rehearsal>)> {
    validate_reference("Script", input.script_id)?;
    let rehearsal = RehearsalRepo::create(&state.pool, &user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(rehearsal)))
}

/// PUT /api/rehearsals/{id}
///
/// Rehearsals owned by another user answer `404`.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRehearsal>,
) -> AppResult<Json<Rehearsal>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Rehearsal",
            id,
        })
    };
    let existing = RehearsalRepo::find_by_id(&state.pool, id)
        .await
        .ok_or_else(not_found)?;
    if existing.user_id != user.user_id {
        return Err(not_found());
    }

    if let Some(script_id) = input.script_id {
        validate_reference("Script", script_id)?;
    }
    let rehearsal = RehearsalRepo::update(&state.pool, id, &input).await?;
    Ok(Json(rehearsal))
}
