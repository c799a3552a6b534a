//! Handlers for the `/characters` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stagecraft_core::error::CoreError;
use stagecraft_core::types::DbId;
use stagecraft_core::validation::{validate_character_name, validate_play_name};
use stagecraft_db::models::character::{Character, CreateCharacter};
use stagecraft_db::repositories::CharacterRepo;

use crate::error::{AppError, AppResult};
use crate::query::PlayFilter;
use crate::state::AppState;

/// GET /api/characters[?play=]
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PlayFilter>,
) -> AppResult<Json<Vec<Character>>> {
    let characters = match filter.play.as_deref().filter(|p| !p.is_empty()) {
        Some(play) => CharacterRepo::list_by_play(&state.pool, play).await,
        None => CharacterRepo::list(&state.pool).await,
    };
    Ok(Json(characters))
}

/// POST /api/characters
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    validate_character_name(&input.name)?;
    validate_play_name(&input.play_name)?;

    let character = CharacterRepo::create(&state.pool, &input).await;
    tracing::info!(character_id = character.id, name = %character.name, "Character created");
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Character>> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    Ok(Json(character))
}
