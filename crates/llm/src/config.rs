/// Upstream completion endpoint settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API, without trailing slash.
    pub api_url: String,
    /// Bearer token. `None` when unset or empty.
    pub api_key: Option<String>,
    /// Model name sent with every request.
    pub model: String,
}

impl LlmConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var       | Default                     |
    /// |---------------|-----------------------------|
    /// | `LLM_API_URL` | `https://api.openai.com/v1` |
    /// | `LLM_API_KEY` | unset                       |
    /// | `LLM_MODEL`   | `gpt-4o`                    |
    pub fn from_env() -> Self {
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into())
            .trim_end_matches('/')
            .to_string();

        let api_key = std::env::var("LLM_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".into());

        Self {
            api_url,
            api_key,
            model,
        }
    }
}
