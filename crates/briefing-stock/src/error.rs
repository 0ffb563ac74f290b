//! Error types for briefing operations

use briefing_utils::EnvError;
use thiserror::Error;

/// Briefing specific errors
#[derive(Debug, Error)]
pub enum BriefingError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// RSS feed could not be parsed
    #[error("Feed error: {0}")]
    FeedError(String),

    /// Watchlist could not be read
    #[error("Watchlist error: {0}")]
    WatchlistError(String),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generative-text provider error
    #[error("LLM error: {0}")]
    Llm(#[from] briefing_llm::LLMError),

    /// Prompt rendering error
    #[error("Prompt error: {0}")]
    Prompt(#[from] briefing_prompt::PromptError),

    /// Report rendering error
    #[error("Render error: {0}")]
    RenderError(String),

    /// Mail delivery error
    #[error("Mail error: {0}")]
    MailError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for briefing operations
pub type Result<T> = std::result::Result<T, BriefingError>;

impl From<EnvError> for BriefingError {
    fn from(err: EnvError) -> Self {
        BriefingError::ConfigError(err.to_string())
    }
}

impl From<minijinja::Error> for BriefingError {
    fn from(err: minijinja::Error) -> Self {
        BriefingError::RenderError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BriefingError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "No data found".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for AAPL: No data found");
    }

    #[test]
    fn test_env_error_conversion() {
        let err: BriefingError = EnvError::Invalid {
            key: "SMTP_PORT".to_string(),
            value: "smtp".to_string(),
            expected: "a port number".to_string(),
        }
        .into();
        match err {
            BriefingError::ConfigError(msg) => assert!(msg.contains("SMTP_PORT")),
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }
}
