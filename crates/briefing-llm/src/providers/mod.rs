//! Concrete LLM provider implementations

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};
#[cfg(feature = "openai")]
pub use openai::{OpenAIConfig, OpenAIProvider};

use crate::LLMError;

/// Map a non-success HTTP status to an [`LLMError`]
pub(crate) fn status_error(status: reqwest::StatusCode, body: String, model: &str) -> LLMError {
    match status.as_u16() {
        401 | 403 => LLMError::AuthenticationFailed,
        429 => LLMError::RateLimitExceeded(body),
        400 => LLMError::InvalidRequest(body),
        404 => LLMError::ModelNotFound(model.to_string()),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "quota".into(), "m"),
            LLMError::RateLimitExceeded(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, String::new(), "gemini-x"),
            LLMError::ModelNotFound(m) if m == "gemini-x"
        ));
        assert!(status_error(StatusCode::SERVICE_UNAVAILABLE, String::new(), "m").is_transient());
        assert!(!status_error(StatusCode::UNAUTHORIZED, String::new(), "m").is_transient());
    }
}
