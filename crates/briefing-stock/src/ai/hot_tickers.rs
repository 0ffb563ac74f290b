//! Trending ticker discovery from business headlines

use super::AiClient;
use super::parse::parse_ticker_reply;
use crate::error::Result;
use crate::model::NewsItem;
use crate::prompts::{ANALYST_SYSTEM, PICK_HOT_TICKERS};
use async_trait::async_trait;
use briefing_prompt::{Language, PromptRegistry};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Headlines fed to the model
pub const HEADLINE_LIMIT: usize = 10;

/// Source of general business headlines
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn headlines(&self, limit: usize) -> Result<Vec<NewsItem>>;
}

/// Picks up to two trending tickers, or the configured default pair
pub struct HotTickerDiscovery {
    headlines: Arc<dyn HeadlineSource>,
    client: AiClient,
    prompts: Arc<PromptRegistry>,
    language: Language,
    defaults: Vec<String>,
}

impl HotTickerDiscovery {
    pub fn new(
        headlines: Arc<dyn HeadlineSource>,
        client: AiClient,
        prompts: Arc<PromptRegistry>,
        language: Language,
        defaults: Vec<String>,
    ) -> Self {
        Self {
            headlines,
            client,
            prompts,
            language,
            defaults,
        }
    }

    /// Discovered tickers; never fails
    pub async fn discover(&self) -> Vec<String> {
        match self.try_discover().await {
            Ok(tickers) => {
                info!(?tickers, "trending tickers discovered");
                tickers
            }
            Err(reason) => {
                warn!(%reason, defaults = ?self.defaults, "ticker discovery failed, using defaults");
                self.defaults.clone()
            }
        }
    }

    async fn try_discover(&self) -> std::result::Result<Vec<String>, String> {
        let headlines = self
            .headlines
            .headlines(HEADLINE_LIMIT)
            .await
            .map_err(|e| e.to_string())?;
        if headlines.is_empty() {
            return Err("no headlines".to_string());
        }

        let titles: Vec<&str> = headlines.iter().map(|h| h.title.as_str()).collect();
        let system = self
            .prompts
            .render_with_lang(ANALYST_SYSTEM, &self.language, &json!({}))
            .map_err(|e| e.to_string())?;
        let user = self
            .prompts
            .render_with_lang(PICK_HOT_TICKERS, &self.language, &json!({ "headlines": titles }))
            .map_err(|e| e.to_string())?;

        let reply = self
            .client
            .complete("hot_tickers", &system, &user)
            .await
            .map_err(|e| e.to_string())?;

        parse_ticker_reply(&reply).map_err(|e| format!("{e} in reply {reply:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{ScriptedProvider, client, prompts};
    use crate::error::BriefingError;

    struct FixedHeadlines(Option<Vec<&'static str>>);

    #[async_trait]
    impl HeadlineSource for FixedHeadlines {
        async fn headlines(&self, _limit: usize) -> Result<Vec<NewsItem>> {
            match &self.0 {
                Some(titles) => Ok(titles
                    .iter()
                    .map(|t| NewsItem::new(*t, "https://news.example"))
                    .collect()),
                None => Err(BriefingError::ApiError("rateLimited".to_string())),
            }
        }
    }

    fn discovery(source: FixedHeadlines, provider: Arc<ScriptedProvider>) -> HotTickerDiscovery {
        HotTickerDiscovery::new(
            Arc::new(source),
            client(provider),
            prompts(),
            Language::English,
            vec!["NVDA".to_string(), "TSLA".to_string()],
        )
    }

    #[tokio::test]
    async fn test_discover() {
        let provider = ScriptedProvider::replies(["TICKERS: PLTR, AMD"]);
        let found = discovery(FixedHeadlines(Some(vec!["Palantir wins contract"])), provider.clone())
            .discover()
            .await;
        assert_eq!(found, ["PLTR", "AMD"]);
        assert!(provider.last_prompt().contains("Palantir wins contract"));
    }

    #[tokio::test]
    async fn test_malformed_reply_uses_defaults() {
        for reply in ["TICKERS: PLTR, AMD, INTC", "Sure! TICKERS: PLTR", "TICKERS: pltr"] {
            let provider = ScriptedProvider::replies([reply]);
            let found = discovery(FixedHeadlines(Some(vec!["Chips rally"])), provider)
                .discover()
                .await;
            assert_eq!(found, ["NVDA", "TSLA"], "reply {reply:?}");
        }
    }

    #[tokio::test]
    async fn test_headline_failure_uses_defaults() {
        let provider = ScriptedProvider::replies(Vec::<&str>::new());
        let found = discovery(FixedHeadlines(None), provider.clone()).discover().await;
        assert_eq!(found, ["NVDA", "TSLA"]);
        assert_eq!(provider.calls(), 0);
    }
}
