//! Strict tokenizers for model replies
//!
//! Replies are plain text in a fixed line schema. Anything that deviates
//! is rejected; callers fall back to a deterministic default instead of
//! trying to salvage a partial answer.

use crate::model::Sentiment;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Upper bound on tickers accepted from one reply
pub const MAX_HOT_TICKERS: usize = 2;

static TICKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{1,5}([.-][A-Z]{1,2})?$").expect("ticker pattern is valid")
});

/// Why a reply was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("reply is empty")]
    Empty,

    #[error("expected {expected} lines, found {found}")]
    LineCount { expected: usize, found: usize },

    #[error("line {line}: expected prefix {prefix:?}")]
    MissingPrefix { line: usize, prefix: String },

    #[error("line {line} has no content")]
    EmptyLine { line: usize },

    #[error("unknown sentiment {0:?}")]
    Sentiment(String),

    #[error("invalid ticker {0:?}")]
    Ticker(String),

    #[error("expected 1 to {MAX_HOT_TICKERS} tickers, found {0}")]
    TickerCount(usize),
}

/// Non-blank lines, trimmed
fn content_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

/// Body of a `N. text` line
fn numbered_body(line: &str, number: usize, index: usize) -> Result<String, ReplyError> {
    let prefix = format!("{number}. ");
    let body = line
        .strip_prefix(&prefix)
        .ok_or_else(|| ReplyError::MissingPrefix {
            line: index + 1,
            prefix: prefix.clone(),
        })?;

    let body = body.trim();
    if body.is_empty() {
        return Err(ReplyError::EmptyLine { line: index + 1 });
    }
    Ok(body.to_string())
}

/// Parse the summary schema: `1. `, `2. `, `3. ` lines then `SENTIMENT: <value>`
///
/// ```
/// use briefing_stock::ai::parse::parse_summary_reply;
/// use briefing_stock::model::Sentiment;
///
/// let (lines, sentiment) =
///     parse_summary_reply("1. 매출 증가\n2. 신제품 호평\n3. 목표가 상향\nSENTIMENT: positive").unwrap();
/// assert_eq!(lines.len(), 3);
/// assert_eq!(sentiment, Sentiment::Positive);
/// ```
pub fn parse_summary_reply(text: &str) -> Result<(Vec<String>, Sentiment), ReplyError> {
    let lines = content_lines(text);
    if lines.is_empty() {
        return Err(ReplyError::Empty);
    }
    if lines.len() != 4 {
        return Err(ReplyError::LineCount {
            expected: 4,
            found: lines.len(),
        });
    }

    let summary = lines[..3]
        .iter()
        .enumerate()
        .map(|(i, line)| numbered_body(line, i + 1, i))
        .collect::<Result<Vec<_>, _>>()?;

    let value = lines[3]
        .strip_prefix("SENTIMENT:")
        .ok_or_else(|| ReplyError::MissingPrefix {
            line: 4,
            prefix: "SENTIMENT:".to_string(),
        })?
        .trim();
    let sentiment = match value {
        "positive" => Sentiment::Positive,
        "neutral" => Sentiment::Neutral,
        "negative" => Sentiment::Negative,
        other => return Err(ReplyError::Sentiment(other.to_string())),
    };

    Ok((summary, sentiment))
}

/// Parse exactly `expected` lines numbered `1. ` through `N. `
pub fn parse_numbered_lines(text: &str, expected: usize) -> Result<Vec<String>, ReplyError> {
    let lines = content_lines(text);
    if lines.is_empty() {
        return Err(ReplyError::Empty);
    }
    if lines.len() != expected {
        return Err(ReplyError::LineCount {
            expected,
            found: lines.len(),
        });
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| numbered_body(line, i + 1, i))
        .collect()
}

/// Parse the single-line `TICKERS: A, B` schema
pub fn parse_ticker_reply(text: &str) -> Result<Vec<String>, ReplyError> {
    let lines = content_lines(text);
    let line = match lines.as_slice() {
        [] => return Err(ReplyError::Empty),
        [line] => *line,
        more => {
            return Err(ReplyError::LineCount {
                expected: 1,
                found: more.len(),
            });
        }
    };

    let list = line
        .strip_prefix("TICKERS:")
        .ok_or_else(|| ReplyError::MissingPrefix {
            line: 1,
            prefix: "TICKERS:".to_string(),
        })?;

    let symbols: Vec<&str> = list.split(',').map(str::trim).collect();
    if symbols.len() > MAX_HOT_TICKERS || symbols.iter().all(|s| s.is_empty()) {
        return Err(ReplyError::TickerCount(
            symbols.iter().filter(|s| !s.is_empty()).count(),
        ));
    }

    let mut tickers: Vec<String> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if !TICKER_PATTERN.is_match(symbol) {
            return Err(ReplyError::Ticker(symbol.to_string()));
        }
        if !tickers.iter().any(|t| t == symbol) {
            tickers.push(symbol.to_string());
        }
    }

    Ok(tickers)
}
