//! Google News RSS search client

use crate::error::{BriefingError, Result};
use crate::model::{NewsItem, WatchlistEntry};
use crate::news::NewsSource;
use crate::rate_gate::RateGate;
use async_trait::async_trait;
use briefing_prompt::Language;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const SEARCH_URL: &str = "https://news.google.com/rss/search";
const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
}

/// Parse an RSS 2.0 document into news items, keeping feed order
pub fn parse_rss(xml: &str) -> Result<Vec<NewsItem>> {
    let rss: Rss =
        quick_xml::de::from_str(xml).map_err(|e| BriefingError::FeedError(e.to_string()))?;

    Ok(rss
        .channel
        .items
        .into_iter()
        .map(|item| NewsItem::new(item.title.trim(), item.link.trim()))
        .collect())
}

/// Google News RSS search for one edition
pub struct GoogleNewsClient {
    client: Client,
    language: Language,
    query_suffix: String,
    gate: RateGate,
}

impl GoogleNewsClient {
    pub fn new(
        language: Language,
        query_suffix: impl Into<String>,
        gate: RateGate,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            language,
            query_suffix: query_suffix.into(),
            gate,
        })
    }

    /// `hl`, `gl` and `ceid` parameters of the edition
    fn edition(&self) -> (String, String, String) {
        match &self.language {
            Language::Korean => ("ko".into(), "KR".into(), "KR:ko".into()),
            Language::English => ("en-US".into(), "US".into(), "US:en".into()),
            Language::Other(code) => {
                let country = code.to_ascii_uppercase();
                (code.clone(), country.clone(), format!("{country}:{code}"))
            }
        }
    }

    /// Search URL for a query
    pub fn search_url(&self, query: &str) -> Result<Url> {
        let (hl, gl, ceid) = self.edition();
        Url::parse_with_params(
            SEARCH_URL,
            &[("q", query), ("hl", &hl), ("gl", &gl), ("ceid", &ceid)],
        )
        .map_err(|e| BriefingError::ConfigError(format!("invalid news URL: {e}")))
    }
}

#[async_trait]
impl NewsSource for GoogleNewsClient {
    fn base_query(&self, entry: &WatchlistEntry) -> String {
        if self.query_suffix.is_empty() {
            entry.display_name.clone()
        } else {
            format!("{} {}", entry.display_name, self.query_suffix)
        }
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsItem>> {
        self.gate.wait().await;

        let url = self.search_url(query)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BriefingError::ApiError(format!("Google News returned {status}")));
        }

        let body = response.text().await?;
        let mut items = parse_rss(&body)?;
        debug!(count = items.len(), "parsed RSS feed");
        items.truncate(limit);
        Ok(items)
    }

    fn name(&self) -> &str {
        "google-news"
    }
}
