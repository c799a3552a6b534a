/// Identity handed to every request that does not name its own user.
///
/// Stands in for an external identity provider.
#[derive(Debug, Clone)]
pub struct MockIdentity {
    pub user_id: String,
    pub email: Option<String>,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Applies until
    /// response headers are sent, so streamed bodies are not cut off.
    pub request_timeout_secs: u64,
    pub identity: MockIdentity,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MOCK_USER_ID`         | `test-user-001`            |
    /// | `MOCK_USER_EMAIL`      | `test@example.com`         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let identity = MockIdentity {
            user_id: std::env::var("MOCK_USER_ID").unwrap_or_else(|_| "test-user-001".into()),
            email: Some(
                std::env::var("MOCK_USER_EMAIL").unwrap_or_else(|_| "test@example.com".into()),
            )
            .filter(|e| !e.is_empty()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            identity,
        }
    }
}
