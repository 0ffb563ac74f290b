//! Three-line news summaries with sentiment

use super::AiClient;
use super::parse::parse_summary_reply;
use crate::model::{NewsItem, NewsSummary};
use crate::prompts::{ANALYST_SYSTEM, SUMMARIZE_NEWS};
use briefing_prompt::{Language, PromptRegistry};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Fallback text: a fixed header and the collected titles
///
/// ```
/// use briefing_prompt::Language;
/// use briefing_stock::ai::fallback_summary;
///
/// let text = fallback_summary(&Language::English, &["Fed holds rates".to_string()]);
/// assert!(text.ends_with("\n- Fed holds rates"));
/// ```
pub fn fallback_summary(language: &Language, titles: &[String]) -> String {
    let header = match language {
        Language::Korean => "⚠️ AI 요약을 가져오지 못해 수집된 뉴스 제목을 그대로 전합니다:",
        _ => "⚠️ The AI summary is unavailable; here are the collected headlines:",
    };

    let mut text = header.to_string();
    for title in titles {
        text.push_str("\n- ");
        text.push_str(title);
    }
    text
}

/// Summarizes a ticker's news, falling back to the raw titles
pub struct Summarizer {
    client: AiClient,
    prompts: Arc<PromptRegistry>,
    language: Language,
}

impl Summarizer {
    pub fn new(client: AiClient, prompts: Arc<PromptRegistry>, language: Language) -> Self {
        Self {
            client,
            prompts,
            language,
        }
    }

    /// Summary for `name (ticker)`; never fails
    ///
    /// Returns `None` when there is no news to summarize.
    pub async fn summarize(&self, ticker: &str, name: &str, news: &[NewsItem]) -> Option<NewsSummary> {
        if news.is_empty() {
            return None;
        }
        let titles: Vec<String> = news.iter().map(|n| n.title.clone()).collect();

        let prompts = self
            .prompts
            .render_with_lang(ANALYST_SYSTEM, &self.language, &json!({}))
            .and_then(|system| {
                let user = self.prompts.render_with_lang(
                    SUMMARIZE_NEWS,
                    &self.language,
                    &json!({ "ticker": ticker, "name": name, "news": news }),
                )?;
                Ok((system, user))
            });
        let (system, user) = match prompts {
            Ok(pair) => pair,
            Err(e) => {
                warn!(ticker, error = %e, "summary prompt failed to render");
                return Some(NewsSummary::Fallback(fallback_summary(&self.language, &titles)));
            }
        };

        let reply = match self.client.complete("summarize", &system, &user).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(ticker, error = %e, "summary request failed, using headlines");
                return Some(NewsSummary::Fallback(fallback_summary(&self.language, &titles)));
            }
        };

        match parse_summary_reply(&reply) {
            Ok((lines, sentiment)) => {
                info!(ticker, ?sentiment, "news summarized");
                Some(NewsSummary::Parsed { lines, sentiment })
            }
            Err(e) => {
                warn!(ticker, error = %e, "summary reply rejected, using headlines");
                Some(NewsSummary::Fallback(fallback_summary(&self.language, &titles)))
            }
        }
    }
}
