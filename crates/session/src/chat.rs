//! Chat session state machine.
//!
//! ```text
//! Idle --submit--> AwaitingResponse --first delta--> Streaming
//!   ^                    |                              |
//!   +----finish/fail/cancel------------------------------+
//! ```
//!
//! The streaming placeholder is appended when the first delta arrives and
//! replaced by a finalized assistant message before anything is persisted.

use std::sync::Arc;

use futures::StreamExt;
use stagecraft_core::chat::{upstream_history, Message, Role, FAILURE_NOTICE};
use stagecraft_core::prompts::CompletionKind;
use stagecraft_llm::messages::ProxyChatRequest;
use stagecraft_llm::LlmError;
use tokio_util::sync::CancellationToken;

use crate::error::SessionError;
use crate::history::HistoryStore;
use crate::source::CompletionSource;
use crate::SessionCharacter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    /// Request sent, no delta received yet.
    AwaitingResponse,
    /// At least one delta received; the last message is the placeholder.
    Streaming,
}

/// How a [`ChatSession::send`] call ended.
#[derive(Debug)]
pub enum SendOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    /// The stream ended normally.
    Completed,
    /// The stream failed; the failure notice was appended.
    Failed(LlmError),
    /// The caller cancelled; received fragments were kept.
    Cancelled,
}

pub struct ChatSession {
    character: SessionCharacter,
    messages: Vec<Message>,
    state: ChatState,
    received: String,
    store: Arc<dyn HistoryStore>,
}

impl ChatSession {
    /// Open a session, restoring any saved transcript.
    ///
    /// Load failures start an empty transcript.
    pub async fn open(character: SessionCharacter, store: Arc<dyn HistoryStore>) -> Self {
        let messages = match store.load(&character.profile.name).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(
                    character = %character.profile.name,
                    error = %e,
                    "Failed to load chat history; starting empty",
                );
                Vec::new()
            }
        };

        Self {
            character,
            messages: messages
                .into_iter()
                .filter(|m| !m.is_placeholder())
                .collect(),
            state: ChatState::Idle,
            received: String::new(),
            store,
        }
    }

    pub fn character(&self) -> &SessionCharacter {
        &self.character
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state != ChatState::Idle
    }

    /// Append the user's message and build the request to send.
    ///
    /// Returns `Ok(None)` for blank input and [`SessionError::Busy`] while a
    /// previous response is still in progress.
    pub async fn submit(&mut self, input: &str) -> Result<Option<ProxyChatRequest>, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        self.messages.push(Message::user(input));
        self.persist().await;

        self.state = ChatState::AwaitingResponse;
        self.received.clear();

        Ok(Some(ProxyChatRequest {
            character_id: self.character.id,
            kind: CompletionKind::Chat,
            messages: upstream_history(&self.messages).cloned().collect(),
        }))
    }

    /// Fold one fragment into the placeholder. Ignored while idle.
    pub fn apply_delta(&mut self, fragment: &str) {
        match self.state {
            ChatState::Idle => {
                tracing::debug!("Dropping delta received while idle");
                return;
            }
            ChatState::AwaitingResponse => {
                self.messages.push(Message::placeholder());
                self.state = ChatState::Streaming;
            }
            ChatState::Streaming => {}
        }

        self.received.push_str(fragment);
        if let Some(last) = self.messages.last_mut() {
            last.content.clone_from(&self.received);
        }
    }

    /// The stream ended normally. An empty response adds no message.
    pub async fn finish(&mut self) {
        if self.state == ChatState::Idle {
            return;
        }
        self.finalize_placeholder();
        self.settle().await;
    }

    /// The stream failed. Partial content is kept and the failure notice
    /// appended as an assistant message.
    pub async fn fail(&mut self, error: &LlmError) {
        if self.state == ChatState::Idle {
            return;
        }
        tracing::warn!(
            character = %self.character.profile.name,
            error = %error,
            received = self.received.len(),
            "Chat stream failed",
        );
        self.finalize_placeholder();
        self.messages.push(Message::assistant(FAILURE_NOTICE));
        self.settle().await;
    }

    /// Stop listening. Fragments received so far become the reply.
    pub async fn cancel(&mut self) {
        if self.state == ChatState::Idle {
            return;
        }
        tracing::info!(
            character = %self.character.profile.name,
            received = self.received.len(),
            "Chat stream cancelled",
        );
        self.finalize_placeholder();
        self.settle().await;
    }

    /// Submit `input` and drive the resulting stream to completion.
    ///
    /// `on_delta` sees each fragment as it is applied.
    pub async fn send(
        &mut self,
        input: &str,
        source: &dyn CompletionSource,
        cancel: &CancellationToken,
        mut on_delta: impl FnMut(&str) + Send,
    ) -> Result<SendOutcome, SessionError> {
        let Some(request) = self.submit(input).await? else {
            return Ok(SendOutcome::Ignored);
        };

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            opened = source.open(&request) => Some(opened),
        };
        let mut stream = match opened {
            None => {
                self.cancel().await;
                return Ok(SendOutcome::Cancelled);
            }
            Some(Err(e)) => {
                self.fail(&e).await;
                return Ok(SendOutcome::Failed(e));
            }
            Some(Ok(stream)) => stream,
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.cancel().await;
                    return Ok(SendOutcome::Cancelled);
                }
                next = stream.next() => next,
            };
            match next {
                Some(Ok(fragment)) => {
                    self.apply_delta(&fragment);
                    on_delta(&fragment);
                }
                Some(Err(e)) => {
                    self.fail(&e).await;
                    return Ok(SendOutcome::Failed(e));
                }
                None => break,
            }
        }

        self.finish().await;
        Ok(SendOutcome::Completed)
    }

    fn finalize_placeholder(&mut self) {
        if self.state != ChatState::Streaming {
            return;
        }
        let content = std::mem::take(&mut self.received);
        if !self.messages.last().is_some_and(|m| m.role == Role::Streaming) {
            return;
        }
        if content.is_empty() {
            self.messages.pop();
        } else if let Some(last) = self.messages.last_mut() {
            *last = Message::assistant(content);
        }
    }

    async fn settle(&mut self) {
        self.state = ChatState::Idle;
        self.received.clear();
        self.persist().await;
    }

    async fn persist(&self) {
        if let Err(e) = self
            .store
            .save(&self.character.profile.name, &self.messages)
            .await
        {
            tracing::warn!(
                character = %self.character.profile.name,
                error = %e,
                "Failed to persist chat history",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use stagecraft_core::chat::is_persistable;
    use stagecraft_core::prompts::CharacterProfile;

    use super::*;
    use crate::history::MemoryHistoryStore;
    use crate::source::testing::{Reply, ScriptedSource};

    fn viola() -> SessionCharacter {
        SessionCharacter {
            id: 1,
            profile: CharacterProfile {
                name: "薇奥拉".into(),
                description: "女扮男装的少女".into(),
                personality: "机智".into(),
                background: "海难幸存者".into(),
            },
        }
    }

    async fn open_session() -> (ChatSession, Arc<MemoryHistoryStore>) {
        let store = Arc::new(MemoryHistoryStore::new());
        let session = ChatSession::open(viola(), store.clone()).await;
        (session, store)
    }

    async fn send(session: &mut ChatSession, source: &ScriptedSource, input: &str) -> SendOutcome {
        session
            .send(input, source, &CancellationToken::new(), |_| {})
            .await
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // Streaming
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fragments_become_one_persisted_reply() {
        let (mut session, store) = open_session().await;
        let source = ScriptedSource::new(vec![Reply::Deltas(vec!["你", "好", "呀"])]);

        let mut seen = Vec::new();
        let outcome = session
            .send("你好", &source, &CancellationToken::new(), |d| {
                seen.push(d.to_string())
            })
            .await
            .unwrap();

        assert_matches!(outcome, SendOutcome::Completed);
        assert_eq!(seen, ["你", "好", "呀"]);
        let expected = vec![Message::user("你好"), Message::assistant("你好呀")];
        assert_eq!(session.messages(), expected);
        assert_eq!(store.load("薇奥拉").await.unwrap(), expected);
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn request_carries_history_without_system_prompt() {
        let (mut session, _) = open_session().await;
        let source = ScriptedSource::new(vec![
            Reply::Deltas(vec!["第一"]),
            Reply::Deltas(vec!["第二"]),
        ]);

        send(&mut session, &source, "一").await;
        send(&mut session, &source, "二").await;

        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].character_id, 1);
        assert_eq!(requests[1].kind, CompletionKind::Chat);
        assert_eq!(
            requests[1].messages,
            vec![
                Message::user("一"),
                Message::assistant("第一"),
                Message::user("二"),
            ]
        );
    }

    #[tokio::test]
    async fn placeholder_appears_on_first_delta_only() {
        let (mut session, store) = open_session().await;
        let request = session.submit("你好").await.unwrap();
        assert!(request.is_some());
        assert_eq!(session.state(), ChatState::AwaitingResponse);
        assert_eq!(session.messages().len(), 1);
        // The user message is saved before any network activity.
        assert_eq!(store.load("薇奥拉").await.unwrap(), vec![Message::user("你好")]);

        session.apply_delta("你");
        assert_eq!(session.state(), ChatState::Streaming);
        assert!(session.messages()[1].is_placeholder());
        session.apply_delta("好");
        assert_eq!(session.messages()[1].content, "你好");
        assert!(!is_persistable(session.messages()));

        session.finish().await;
        assert!(is_persistable(session.messages()));
        assert_eq!(session.messages()[1], Message::assistant("你好"));
    }

    #[tokio::test]
    async fn empty_response_adds_no_message() {
        let (mut session, store) = open_session().await;
        let source = ScriptedSource::new(vec![Reply::Deltas(vec![])]);

        assert_matches!(send(&mut session, &source, "在吗").await, SendOutcome::Completed);
        assert_eq!(session.messages(), [Message::user("在吗")]);
        assert_eq!(store.load("薇奥拉").await.unwrap(), [Message::user("在吗")]);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let (mut session, _) = open_session().await;
        let source = ScriptedSource::new(vec![]);

        assert_matches!(send(&mut session, &source, "   ").await, SendOutcome::Ignored);
        assert!(session.messages().is_empty());
        assert!(source.requests().is_empty());
    }

    // -----------------------------------------------------------------------
    // Concurrency guard
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn second_submit_while_busy_is_rejected() {
        let (mut session, _) = open_session().await;
        session.submit("一").await.unwrap();

        assert_matches!(session.submit("二").await, Err(SessionError::Busy));
        session.apply_delta("回");
        assert_matches!(session.submit("二").await, Err(SessionError::Busy));

        session.finish().await;
        assert!(session.submit("二").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn stale_delta_while_idle_is_dropped() {
        let (mut session, _) = open_session().await;
        session.apply_delta("孤立");
        assert!(session.messages().is_empty());
    }

    // -----------------------------------------------------------------------
    // Failure
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn refused_request_appends_failure_notice() {
        let (mut session, store) = open_session().await;
        let source = ScriptedSource::new(vec![Reply::Refuse]);

        let outcome = send(&mut session, &source, "你好").await;
        assert_matches!(outcome, SendOutcome::Failed(LlmError::Api { status: 502, .. }));

        let expected = vec![Message::user("你好"), Message::assistant(FAILURE_NOTICE)];
        assert_eq!(session.messages(), expected);
        assert_eq!(store.load("薇奥拉").await.unwrap(), expected);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn mid_stream_failure_keeps_partial_reply() {
        let (mut session, store) = open_session().await;
        let source = ScriptedSource::new(vec![Reply::FailAfter(vec!["我", "是"])]);

        let outcome = send(&mut session, &source, "你是谁").await;
        assert_matches!(outcome, SendOutcome::Failed(LlmError::Stream(_)));

        let expected = vec![
            Message::user("你是谁"),
            Message::assistant("我是"),
            Message::assistant(FAILURE_NOTICE),
        ];
        assert_eq!(session.messages(), expected);
        assert_eq!(store.load("薇奥拉").await.unwrap(), expected);
    }

    // -----------------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn cancel_keeps_received_fragments() {
        let (mut session, store) = open_session().await;
        let source = ScriptedSource::new(vec![Reply::Hang(vec!["半", "句"])]);
        let token = CancellationToken::new();

        let mut count = 0;
        let trigger = token.clone();
        let outcome = session
            .send("说吧", &source, &token, move |_| {
                count += 1;
                if count == 2 {
                    trigger.cancel();
                }
            })
            .await
            .unwrap();

        assert_matches!(outcome, SendOutcome::Cancelled);
        let expected = vec![Message::user("说吧"), Message::assistant("半句")];
        assert_eq!(session.messages(), expected);
        assert_eq!(store.load("薇奥拉").await.unwrap(), expected);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn cancel_before_first_delta_leaves_no_reply() {
        let (mut session, _) = open_session().await;
        let source = ScriptedSource::new(vec![Reply::Hang(vec![])]);
        let token = CancellationToken::new();
        token.cancel();

        let outcome = session.send("说吧", &source, &token, |_| {}).await.unwrap();
        assert_matches!(outcome, SendOutcome::Cancelled);
        assert_eq!(session.messages(), [Message::user("说吧")]);
    }

    // -----------------------------------------------------------------------
    // Restore
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn reopened_session_restores_transcript() {
        let (mut session, store) = open_session().await;
        let source = ScriptedSource::new(vec![Reply::Deltas(vec!["在"])]);
        send(&mut session, &source, "在吗").await;

        let reopened = ChatSession::open(viola(), store.clone()).await;
        assert_eq!(reopened.messages(), session.messages());
        assert_eq!(reopened.state(), ChatState::Idle);
    }
}
