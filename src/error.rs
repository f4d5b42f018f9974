//! Error types for the job search service

use thiserror::Error;

/// Provider error text that marks a transient capacity failure
pub const RATE_LIMIT_SIGNAL: &str = "rate_limit";

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {

    // =============================
    // Core Pipeline Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    LlmError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl SearchError {
    /// True when the rendered message carries the provider's rate-limit signal.
    pub fn is_rate_limited(&self) -> bool {
        self.to_string().contains(RATE_LIMIT_SIGNAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection() {
        let err = SearchError::LlmError(
            "Anthropic API error (rate_limit_error): Number of request tokens has exceeded your per-minute rate limit".to_string(),
        );
        assert!(err.is_rate_limited());

        let err = SearchError::LlmError("Anthropic API error (invalid_request_error): bad".to_string());
        assert!(!err.is_rate_limited());

        let err = SearchError::Config("ANTHROPIC_API_KEY not configured".to_string());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_llm_error_message_is_surfaced_verbatim() {
        let err = SearchError::LlmError("connection reset".to_string());
        assert_eq!(err.to_string(), "connection reset");
    }
}
