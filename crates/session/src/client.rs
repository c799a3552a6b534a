//! HTTP client for the stagecraft server.

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use stagecraft_core::types::{DbId, USER_ID_HEADER};
use stagecraft_db::models::character::Character;
use stagecraft_db::models::conversation::{Conversation, CreateConversation, UpdateConversation};
use stagecraft_db::models::script::{CreateScript, Script};
use stagecraft_llm::api::CompletionApi;
use stagecraft_llm::messages::ProxyChatRequest;
use stagecraft_llm::{decode_stream, DeltaStream, LlmError};

use crate::error::ClientError;
use crate::SessionContext;

/// Thin wrapper over the server's REST and streaming endpoints.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
}

impl ApiClient {
    pub fn new(context: &SessionContext) -> Self {
        Self::with_client(reqwest::Client::new(), context)
    }

    pub fn with_client(http: reqwest::Client, context: &SessionContext) -> Self {
        Self {
            http,
            base_url: context.base_url.trim_end_matches('/').to_string(),
            user: context.user.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header(USER_ID_HEADER, &self.user)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    // ---- characters ----

    pub async fn list_characters(&self, play: Option<&str>) -> Result<Vec<Character>, ClientError> {
        let mut builder = self.request(Method::GET, "/api/characters");
        if let Some(play) = play {
            builder = builder.query(&[("play", play)]);
        }
        Self::send_json(builder).await
    }

    pub async fn get_character(&self, id: DbId) -> Result<Character, ClientError> {
        Self::send_json(self.request(Method::GET, &format!("/api/characters/{id}"))).await
    }

    // ---- conversations ----

    /// The caller's conversation with a character, if one exists.
    pub async fn find_conversation(
        &self,
        character_id: DbId,
    ) -> Result<Option<Conversation>, ClientError> {
        let builder = self
            .request(Method::GET, "/api/conversations")
            .query(&[("characterId", character_id)]);
        Self::send_json(builder).await
    }

    pub async fn create_conversation(
        &self,
        input: &CreateConversation,
    ) -> Result<Conversation, ClientError> {
        Self::send_json(self.request(Method::POST, "/api/conversations").json(input)).await
    }

    pub async fn update_conversation(
        &self,
        id: DbId,
        input: &UpdateConversation,
    ) -> Result<Conversation, ClientError> {
        let path = format!("/api/conversations/{id}");
        Self::send_json(self.request(Method::PUT, &path).json(input)).await
    }

    // ---- scripts ----

    pub async fn create_script(&self, input: &CreateScript) -> Result<Script, ClientError> {
        Self::send_json(self.request(Method::POST, "/api/scripts").json(input)).await
    }

    // ---- streaming ----

    /// Open a completion stream through the server's `/api/chat` proxy.
    pub async fn open_chat(&self, request: &ProxyChatRequest) -> Result<DeltaStream, LlmError> {
        let response = self
            .request(Method::POST, "/api/chat")
            .json(request)
            .send()
            .await?;
        let response = CompletionApi::ensure_success(response).await?;
        Ok(decode_stream(response.bytes_stream()))
    }
}
