//! Handler for the `/chat` streaming proxy.
//!
//! The client sends dialogue history only. The server resolves the
//! character, prepends the system prompt for the requested kind, and calls
//! the upstream API with the key it holds. Deltas are re-emitted as
//! `data:` records in the upstream format, so clients decode the proxy and
//! the upstream identically.

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{self, StreamExt};
use stagecraft_core::chat::upstream_history;
use stagecraft_core::error::CoreError;
use stagecraft_core::validation::validate_reference;
use stagecraft_db::repositories::CharacterRepo;
use stagecraft_llm::decoder::DONE_SENTINEL;
use stagecraft_llm::messages::{ChatCompletionRequest, ProxyChatRequest};
use stagecraft_llm::sse::encode_delta;
use stagecraft_llm::{DeltaStream, LlmError};

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::state::AppState;

/// POST /api/chat
///
/// Responds `503` when no upstream key is configured and `502` when the
/// upstream call fails before streaming starts. A failure mid-stream aborts
/// the response body without a `[DONE]` record.
pub async fn stream_chat(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<ProxyChatRequest>,
) -> AppResult<Response> {
    if !state.llm.has_credentials() {
        return Err(LlmError::NotConfigured.into());
    }

    validate_reference("Character", input.character_id)?;
    let character = CharacterRepo::find_by_id(&state.pool, input.character_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id: input.character_id,
        }))?;

    let history: Vec<_> = upstream_history(&input.messages).cloned().collect();
    if history.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "messages must contain at least one user or assistant message".into(),
        )));
    }

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(input.kind.system_prompt(&character.profile()));
    messages.extend(history);

    let request = ChatCompletionRequest::streaming(
        state.llm_config.model.clone(),
        input.kind.temperature(),
        messages,
    );

    let deltas = state.llm.stream_chat(&request).await?;

    tracing::info!(
        character_id = character.id,
        kind = ?input.kind,
        user_id = %user.user_id,
        history = request.messages.len() - 1,
        "Proxying completion stream",
    );

    Ok(Sse::new(relay(deltas)).into_response())
}

/// Re-encode deltas as SSE events, ending with `[DONE]` on a clean finish.
///
/// An upstream error is passed through as a body error, which aborts the
/// response so the client sees a transport failure rather than a clean end.
fn relay(
    deltas: DeltaStream,
) -> impl futures::Stream<Item = Result<Event, LlmError>> + Send + 'static {
    stream::unfold(Some(deltas), |pending| async move {
        let mut deltas = pending?;
        match deltas.next().await {
            Some(Ok(text)) => Some((Ok(Event::default().data(encode_delta(&text))), Some(deltas))),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Upstream stream failed mid-response");
                Some((Err(e), None))
            }
            None => Some((Ok(Event::default().data(DONE_SENTINEL)), None)),
        }
    })
}
