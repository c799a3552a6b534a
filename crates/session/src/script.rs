//! Script generation session with preview and edit modes.
//!
//! Generation streams into a buffer. Once it completes, the text becomes an
//! editable draft; preview mode re-derives [`ScriptBlock`]s from whatever
//! the draft currently holds, so switching modes never loses edits.

use futures::StreamExt;
use stagecraft_core::chat::{upstream_history, Message};
use stagecraft_core::prompts::{default_script_seed, CompletionKind, FALLBACK_SCRIPT_PROMPT};
use stagecraft_core::script_blocks::{is_viewpoint_line, parse_script, ScriptBlock};
use stagecraft_db::models::script::CreateScript;
use stagecraft_llm::messages::ProxyChatRequest;
use stagecraft_llm::LlmError;
use tokio_util::sync::CancellationToken;

use crate::chat::ChatSession;
use crate::error::SessionError;
use crate::source::CompletionSource;
use crate::SessionCharacter;

/// Genre recorded when a generated script is saved without one.
pub const DEFAULT_SCRIPT_GENRE: &str = "舞台剧";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMode {
    Preview,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptState {
    Streaming,
    Ready { mode: ScriptMode, draft: String },
    /// Generation failed; whatever arrived before the failure is kept.
    Failed,
}

/// What a script is generated from.
#[derive(Debug, Clone)]
pub struct ScriptSeed {
    pub character: SessionCharacter,
    pub history: Vec<Message>,
    pub prompt: Option<String>,
}

impl ScriptSeed {
    /// Seed from an ongoing chat: its transcript plus the default opening
    /// prompt for the character.
    pub fn from_chat(chat: &ChatSession) -> Self {
        let character = chat.character().clone();
        let prompt = default_script_seed(&character.profile);
        Self {
            history: upstream_history(chat.messages()).cloned().collect(),
            character,
            prompt: Some(prompt),
        }
    }
}

pub struct ScriptSession {
    seed: ScriptSeed,
    content: String,
    state: ScriptState,
}

impl ScriptSession {
    pub fn new(seed: ScriptSeed) -> Self {
        Self {
            seed,
            content: String::new(),
            state: ScriptState::Streaming,
        }
    }

    pub fn state(&self) -> &ScriptState {
        &self.state
    }

    pub fn character(&self) -> &SessionCharacter {
        &self.seed.character
    }

    pub fn mode(&self) -> Option<ScriptMode> {
        match &self.state {
            ScriptState::Ready { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    /// The request that starts generation: prior dialogue plus the seed
    /// prompt, or the fallback prompt when none was given.
    pub fn request(&self) -> ProxyChatRequest {
        let prompt = self
            .seed
            .prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(FALLBACK_SCRIPT_PROMPT);

        let mut messages: Vec<Message> = upstream_history(&self.seed.history).cloned().collect();
        messages.push(Message::user(prompt));

        ProxyChatRequest {
            character_id: self.seed.character.id,
            kind: CompletionKind::Script,
            messages,
        }
    }

    /// Append a fragment. Ignored once generation has ended.
    pub fn apply_delta(&mut self, fragment: &str) {
        if self.state == ScriptState::Streaming {
            self.content.push_str(fragment);
        }
    }

    /// Generation ended normally; the content becomes the draft.
    pub fn complete(&mut self) {
        if self.state == ScriptState::Streaming {
            self.state = ScriptState::Ready {
                mode: ScriptMode::Preview,
                draft: self.content.clone(),
            };
        }
    }

    pub fn fail(&mut self, error: &LlmError) {
        if self.state == ScriptState::Streaming {
            tracing::warn!(
                character = %self.seed.character.profile.name,
                error = %error,
                received = self.content.len(),
                "Script generation failed",
            );
            self.state = ScriptState::Failed;
        }
    }

    pub fn toggle_mode(&mut self) -> Result<ScriptMode, SessionError> {
        let next = match self.mode() {
            Some(ScriptMode::Preview) => ScriptMode::Edit,
            Some(ScriptMode::Edit) => ScriptMode::Preview,
            None => return Err(SessionError::NotReady),
        };
        self.set_mode(next)?;
        Ok(next)
    }

    pub fn set_mode(&mut self, next: ScriptMode) -> Result<(), SessionError> {
        match &mut self.state {
            ScriptState::Ready { mode, .. } => {
                *mode = next;
                Ok(())
            }
            _ => Err(SessionError::NotReady),
        }
    }

    /// Replace the draft. Only allowed in edit mode.
    pub fn edit_draft(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        match &mut self.state {
            ScriptState::Ready {
                mode: ScriptMode::Edit,
                draft,
            } => {
                *draft = text.into();
                Ok(())
            }
            ScriptState::Ready { .. } => Err(SessionError::NotEditing),
            _ => Err(SessionError::NotReady),
        }
    }

    /// The current text: the draft once ready, otherwise what has streamed.
    pub fn text(&self) -> &str {
        match &self.state {
            ScriptState::Ready { draft, .. } => draft,
            _ => &self.content,
        }
    }

    pub fn blocks(&self) -> Vec<ScriptBlock> {
        parse_script(self.text())
    }

    /// Whether a block is spoken by this session's character.
    pub fn is_viewpoint(&self, block: &ScriptBlock) -> bool {
        is_viewpoint_line(block, &self.seed.character.profile.name)
    }

    /// `<character>.txt`, or `script.txt` for an unnamed character.
    pub fn download_file_name(&self) -> String {
        let name = self.seed.character.profile.name.trim();
        if name.is_empty() {
            "script.txt".to_string()
        } else {
            format!("{name}.txt")
        }
    }

    /// Body for saving the current text as a script.
    pub fn to_create_script(&self, title: Option<&str>) -> CreateScript {
        let name = &self.seed.character.profile.name;
        CreateScript {
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .unwrap_or_else(|| format!("{name}·开场")),
            content: self.text().to_string(),
            genre: DEFAULT_SCRIPT_GENRE.to_string(),
            description: Some(format!("与{name}的对话生成")),
        }
    }

    /// Run generation to the end, reporting each fragment to `on_delta`.
    ///
    /// A cancelled generation keeps what arrived and becomes a draft.
    pub async fn generate(
        &mut self,
        source: &dyn CompletionSource,
        cancel: &CancellationToken,
        mut on_delta: impl FnMut(&str) + Send,
    ) -> Result<(), LlmError> {
        let request = self.request();
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            opened = source.open(&request) => Some(opened),
        };
        let mut stream = match opened {
            None => {
                self.complete();
                return Ok(());
            }
            Some(Err(e)) => {
                self.fail(&e);
                return Err(e);
            }
            Some(Ok(stream)) => stream,
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = stream.next() => next,
            };
            match next {
                Some(Ok(fragment)) => {
                    self.apply_delta(&fragment);
                    on_delta(&fragment);
                }
                Some(Err(e)) => {
                    self.fail(&e);
                    return Err(e);
                }
                None => break,
            }
        }

        self.complete();
        Ok(())
    }
}
