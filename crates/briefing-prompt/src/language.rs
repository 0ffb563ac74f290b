//! Report and prompt languages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the briefing can be written in
///
/// ```
/// use briefing_prompt::Language;
///
/// assert_eq!(Language::from_code("ko"), Language::Korean);
/// assert_eq!(Language::from_code("한국어"), Language::Korean);
/// assert_eq!(Language::from_code("EN"), Language::English);
/// assert_eq!(Language::from_code("ja"), Language::Other("ja".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// Korean
    #[default]
    Korean,
    /// English
    English,
    /// Other languages (ISO 639-1 code)
    Other(String),
}

impl Language {
    /// ISO 639-1 language code
    pub fn code(&self) -> &str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
            Language::Other(code) => code,
        }
    }

    /// Language name for display and for prompts
    pub fn name(&self) -> &str {
        match self {
            Language::Korean => "Korean",
            Language::English => "English",
            Language::Other(code) => code,
        }
    }

    /// Parse from ISO 639-1 code or common name
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ko" | "kr" | "korean" | "한국어" | "ko-kr" => Language::Korean,
            "en" | "english" | "en-us" => Language::English,
            other => Language::Other(other.to_string()),
        }
    }

    /// Check if this is a known language (not Other)
    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Other(_))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Language::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(Language::Korean.code(), "ko");
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Other("ja".to_string()).code(), "ja");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("KO"), Language::Korean);
        assert_eq!(Language::from_code(" korean "), Language::Korean);
        assert_eq!(Language::from_code("english"), Language::English);
        assert_eq!(Language::from_code("de"), Language::Other("de".to_string()));
    }

    #[test]
    fn test_default_is_korean() {
        assert_eq!(Language::default(), Language::Korean);
        assert!(Language::default().is_known());
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Language::English).unwrap();
        let parsed: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Language::English);
    }
}
