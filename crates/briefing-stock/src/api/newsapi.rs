//! NewsAPI client for ticker search and top business headlines

use crate::ai::HeadlineSource;
use crate::error::{BriefingError, Result};
use crate::model::{NewsItem, WatchlistEntry};
use crate::news::NewsSource;
use crate::rate_gate::RateGate;
use async_trait::async_trait;
use briefing_prompt::Language;
use chrono::{Duration as Days, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_NEWSAPI_BASE: &str = "https://newsapi.org/v2";

/// Articles NewsAPI returns for content taken down at the source
const REMOVED_MARKER: &str = "[Removed]";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl NewsApiResponse {
    fn into_items(self) -> Result<Vec<NewsItem>> {
        if self.status != "ok" {
            return Err(BriefingError::ApiError(format!(
                "NewsAPI {}: {}",
                self.code.as_deref().unwrap_or("error"),
                self.message.as_deref().unwrap_or("no message")
            )));
        }

        Ok(self
            .articles
            .into_iter()
            .filter_map(|article| {
                let title = article.title?.trim().to_string();
                if title.is_empty() || title == REMOVED_MARKER {
                    return None;
                }
                let item = NewsItem::new(title, article.url.unwrap_or_default());
                Some(match article.description.filter(|d| !d.trim().is_empty()) {
                    Some(description) => item.with_description(description.trim()),
                    None => item,
                })
            })
            .collect())
    }
}

/// NewsAPI client
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    api_base: String,
    language: Language,
    lookback_days: Option<u32>,
    gate: RateGate,
}

impl NewsApiClient {
    pub fn new(
        api_key: impl Into<String>,
        language: Language,
        gate: RateGate,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(BriefingError::ConfigError("NewsAPI key is empty".to_string()));
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_base: DEFAULT_NEWSAPI_BASE.to_string(),
            language,
            lookback_days: None,
            gate,
        })
    }

    /// Only search articles published in the last `days` days
    pub fn with_lookback_days(mut self, days: Option<u32>) -> Self {
        self.lookback_days = days;
        self
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<NewsItem>> {
        self.gate.wait().await;

        let response = self
            .client
            .get(format!("{}/{endpoint}", self.api_base))
            .header("X-Api-Key", &self.api_key)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, endpoint, "NewsAPI response");

        // Error replies carry a JSON body with the reason
        match serde_json::from_str::<NewsApiResponse>(&body) {
            Ok(parsed) => parsed.into_items(),
            Err(_) if !status.is_success() => Err(BriefingError::ApiError(format!(
                "NewsAPI error {status}: {body}"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Top business headlines in the US edition
    #[instrument(skip(self))]
    pub async fn top_business_headlines(&self, limit: usize) -> Result<Vec<NewsItem>> {
        let mut items = self
            .get(
                "top-headlines",
                &[
                    ("category", "business".to_string()),
                    ("country", "us".to_string()),
                    ("pageSize", limit.to_string()),
                ],
            )
            .await?;
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn base_query(&self, entry: &WatchlistEntry) -> String {
        if entry.display_name == entry.ticker {
            entry.ticker.clone()
        } else {
            format!("{} OR {}", entry.ticker, entry.display_name)
        }
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsItem>> {
        let mut params = vec![
            ("q", query.to_string()),
            ("language", self.language.code().to_string()),
            ("sortBy", "relevancy".to_string()),
            ("pageSize", limit.clamp(1, 100).to_string()),
        ];
        if let Some(days) = self.lookback_days {
            let from = Utc::now().date_naive() - Days::days(i64::from(days));
            params.push(("from", from.format("%Y-%m-%d").to_string()));
        }

        let mut items = self.get("everything", &params).await?;
        items.truncate(limit);
        Ok(items)
    }

    fn name(&self) -> &str {
        "newsapi"
    }
}

#[async_trait]
impl HeadlineSource for NewsApiClient {
    async fn headlines(&self, limit: usize) -> Result<Vec<NewsItem>> {
        self.top_business_headlines(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<Vec<NewsItem>> {
        serde_json::from_value::<NewsApiResponse>(value)
            .unwrap()
            .into_items()
    }

    #[test]
    fn test_parse_articles() {
        let items = parse(json!({
            "status": "ok",
            "totalResults": 3,
            "articles": [
                { "title": "Nvidia beats estimates", "description": "Revenue up.", "url": "https://a.example" },
                { "title": "[Removed]", "description": "[Removed]", "url": "https://removed.com" },
                { "title": "Chip stocks rally", "description": "  ", "url": "https://b.example" },
                { "title": null, "url": "https://c.example" }
            ]
        }))
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description.as_deref(), Some("Revenue up."));
        assert_eq!(items[1].title, "Chip stocks rally");
        assert!(items[1].description.is_none());
    }

    #[test]
    fn test_parse_error_reply() {
        let err = parse(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid."
        }))
        .unwrap_err();
        assert!(err.to_string().contains("apiKeyInvalid"));
    }

    #[test]
    fn test_base_query() {
        let client = NewsApiClient::new(
            "key",
            Language::English,
            RateGate::unlimited("news"),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            client.base_query(&WatchlistEntry::new("엔비디아", "NVDA")),
            "NVDA OR 엔비디아"
        );
        assert_eq!(client.base_query(&WatchlistEntry::trending("PLTR")), "PLTR");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(
            NewsApiClient::new(" ", Language::English, RateGate::unlimited("news"), Duration::from_secs(1))
                .is_err()
        );
    }

    #[tokio::test]
    #[ignore] // Requires NEWS_API_KEY and network access
    async fn test_live_headlines() {
        let key = std::env::var("NEWS_API_KEY").unwrap();
        let client = NewsApiClient::new(
            key,
            Language::English,
            RateGate::unlimited("news"),
            Duration::from_secs(10),
        )
        .unwrap();
        let items = client.top_business_headlines(5).await.unwrap();
        assert!(items.len() <= 5);
    }
}
