//! Handlers for the `/conversations` resource.
//!
//! A user has at most one conversation per character in practice; lookups
//! go by character id rather than conversation id.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stagecraft_core::error::CoreError;
use stagecraft_core::types::DbId;
use stagecraft_core::validation::validate_reference;
use stagecraft_db::models::conversation::{Conversation, CreateConversation, UpdateConversation};
use stagecraft_db::repositories::ConversationRepo;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::query::CharacterSelector;
use crate::state::AppState;

/// GET /api/conversations?characterId=
///
/// Responds with `null` when the user has no conversation with the character.
pub async fn find_for_character(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(selector): Query<CharacterSelector>,
) -> AppResult<Json<Option<Conversation>>> {
    let character_id = selector
        .character_id
        .ok_or_else(|| AppError::BadRequest("characterId is required".into()))?;
    let conversation =
        ConversationRepo::find_for_user(&state.pool, &user.user_id, character_id).await;
    Ok(Json(conversation))
}

/// POST /api/conversations
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateConversation>,
) -> AppResult<(StatusCode, Json<Conversation>)> {
    validate_reference("Character", input.character_id)?;
    let conversation = ConversationRepo::create(&state.pool, &user.user_id, &input).await?;
    tracing::debug!(
        conversation_id = conversation.id,
        character_id = conversation.character_id,
        user_id = %user.user_id,
        "Conversation created",
    );
    Ok((StatusCode::CREATED, Json(conversation)))
}

/// PUT /api/conversations/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateConversation>,
) -> AppResult<Json<Conversation>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Conversation",
            id,
        })
    };
    let existing = ConversationRepo::find_by_id(&state.pool, id)
        .await
        .ok_or_else(not_found)?;
    if existing.user_id != user.user_id {
        return Err(not_found());
    }

    let conversation = ConversationRepo::update_messages(&state.pool, id, input.messages).await?;
    Ok(Json(conversation))
}
