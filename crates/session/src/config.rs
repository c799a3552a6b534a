use std::path::PathBuf;

use crate::SessionContext;

/// Terminal client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (default: `http://localhost:3000`).
    pub server_url: String,
    /// Identity presented to the server (default: `test-user-001`).
    pub user: String,
    /// Directory for local transcript files. When unset, transcripts are
    /// stored as server-side conversations.
    pub history_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `STAGECRAFT_URL`         | `http://localhost:3000` |
    /// | `STAGECRAFT_USER`        | `test-user-001`         |
    /// | `STAGECRAFT_HISTORY_DIR` | unset                   |
    pub fn from_env() -> Self {
        let server_url = std::env::var("STAGECRAFT_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let user = std::env::var("STAGECRAFT_USER").unwrap_or_else(|_| "test-user-001".into());

        let history_dir = std::env::var("STAGECRAFT_HISTORY_DIR")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);

        Self {
            server_url,
            user,
            history_dir,
        }
    }

    pub fn context(&self) -> SessionContext {
        SessionContext {
            user: self.user.clone(),
            base_url: self.server_url.clone(),
        }
    }
}
