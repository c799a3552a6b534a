//! Handlers for the `/scripts` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stagecraft_core::error::CoreError;
use stagecraft_core::types::DbId;
use stagecraft_core::validation::{
    validate_script_content, validate_script_description, validate_script_genre,
    validate_script_title,
};
use stagecraft_db::models::script::{CreateScript, Script, UpdateScript};
use stagecraft_db::repositories::ScriptRepo;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Script",
        id,
    })
}

/// GET /api/scripts
pub async fn list(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<Vec<Script>>> {
    let scripts = ScriptRepo::list(&state.pool, Some(&user.user_id)).await;
    Ok(Json(scripts))
}

/// GET /api/scripts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Script>> {
    let script = ScriptRepo::find_by_id(&state.pool, id)
        .await
        .ok_or_else(|| not_found(id))?;
    Ok(Json(script))
}

/// POST /api/scripts
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateScript>,
) -> AppResult<(StatusCode, Json<Script>)> {
    validate_script_title(&input.title)?;
    validate_script_content(&input.content)?;
    validate_script_genre(&input.genre)?;
    if let Some(description) = &input.description {
        validate_script_description(description)?;
    }

    let script = ScriptRepo::create(&state.pool, &user.user_id, &input).await;
    tracing::info!(script_id = script.id, user_id = %user.user_id, "Script saved");
    Ok((StatusCode::CREATED, Json(script)))
}

/// PUT /api/scripts/{id}
///
/// Only the owner may update; other users see 404.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScript>,
) -> AppResult<Json<Script>> {
    if let Some(title) = &input.title {
        validate_script_title(title)?;
    }
    if let Some(content) = &input.content {
        validate_script_content(content)?;
    }
    if let Some(genre) = &input.genre {
        validate_script_genre(genre)?;
    }
    if let Some(description) = &input.description {
        validate_script_description(description)?;
    }

    let existing = ScriptRepo::find_by_id(&state.pool, id)
        .await
        .ok_or_else(|| not_found(id))?;
    if existing.user_id != user.user_id {
        return Err(not_found(id));
    }

    let script = ScriptRepo::update(&state.pool, id, &input)
        .await
        .ok_or_else(|| not_found(id))?;
    Ok(Json(script))
}
