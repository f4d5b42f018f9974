//! Runtime configuration
//!
//! Only the provider credential and the listen port come from the
//! environment; everything else is fixed per build.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_MAX_TOKENS: u32 = 16_000;
/// Web searches the agent may run in one turn
pub const DEFAULT_MAX_SEARCHES: u32 = 5;
pub const DEFAULT_PORT: u16 = 8080;
/// Wall-clock ceiling for one search request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for the outbound agent call.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub max_searches: u32,
}

impl AgentConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_searches: DEFAULT_MAX_SEARCHES,
        }
    }

    /// Point the client at another host (tests, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Read `ANTHROPIC_API_KEY`, loading `.env` first. A missing key is not
    /// fatal here; the first search reports it.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::new(std::env::var("ANTHROPIC_API_KEY").unwrap_or_default())
    }
}

/// Listen port from `PORT` or `API_PORT`.
pub fn port_from_env() -> std::result::Result<u16, std::num::ParseIntError> {
    std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| DEFAULT_PORT.to_string())
        .parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::new("key".to_string());
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, "claude-haiku-4-5-20251001");
        assert_eq!(config.max_tokens, 16_000);
        assert_eq!(config.max_searches, 5);
    }

    #[test]
    fn test_with_api_base() {
        let config = AgentConfig::new("key".to_string()).with_api_base("http://127.0.0.1:9999");
        assert_eq!(config.api_base, "http://127.0.0.1:9999");
        assert_eq!(config.api_key, "key");
    }
}
