//! News search, keyword exclusion and script filtering

use crate::error::Result;
use crate::model::{NewsItem, WatchlistEntry};
use async_trait::async_trait;
use briefing_prompt::Language;
use std::sync::Arc;
use tracing::{debug, warn};

/// Append one negated term per distinct exclude keyword, in input order
///
/// Keywords containing whitespace are quoted so the engine treats them as
/// one phrase. Keywords already present as negations are not repeated.
///
/// ```
/// use briefing_stock::news::build_search_query;
///
/// let query = build_search_query("애플 주식", &["사과", "다이어트", "사과"]);
/// assert_eq!(query, "애플 주식 -사과 -다이어트");
/// assert_eq!(build_search_query(&query, &["사과"]), query);
/// ```
pub fn build_search_query<S: AsRef<str>>(base: &str, excludes: &[S]) -> String {
    let mut query = base.trim().to_string();
    let mut present: Vec<String> = query
        .split_whitespace()
        .filter_map(|token| token.strip_prefix('-'))
        .map(ToString::to_string)
        .collect();

    for keyword in excludes {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            continue;
        }

        let (token, already) = if keyword.contains(char::is_whitespace) {
            let token = format!("\"{keyword}\"");
            let already = query.contains(&format!("-{token}"));
            (token, already)
        } else {
            let already = present.iter().any(|p| p == keyword);
            (keyword.to_string(), already)
        };

        if already {
            continue;
        }

        query.push_str(" -");
        query.push_str(&token);
        present.push(token);
    }

    query
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

/// Whether the title contains at least one character of the language's script
///
/// Languages without a known script always match.
pub fn matches_script(title: &str, language: &Language) -> bool {
    match language {
        Language::Korean => title.chars().any(is_hangul),
        Language::English => title.chars().any(|c| c.is_ascii_alphabetic()),
        Language::Other(_) => true,
    }
}

/// A searchable news provider
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Search text for an entry before exclusions are appended
    fn base_query(&self, entry: &WatchlistEntry) -> String;

    /// Run a search, returning at most `limit` items
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsItem>>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Fetches filtered headlines per entry; failures become an empty list
#[derive(Clone)]
pub struct NewsFetcher {
    source: Arc<dyn NewsSource>,
    max_items: usize,
    script_filter: Option<Language>,
}

impl NewsFetcher {
    pub fn new(source: Arc<dyn NewsSource>, max_items: usize) -> Self {
        Self {
            source,
            max_items,
            script_filter: None,
        }
    }

    /// Keep only titles written in `language`'s script
    pub fn with_script_filter(mut self, language: Language) -> Self {
        self.script_filter = Some(language);
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Headlines for one entry, at most `max_items`
    pub async fn fetch(&self, entry: &WatchlistEntry) -> Vec<NewsItem> {
        let query = build_search_query(&self.source.base_query(entry), entry.exclude_keywords());
        debug!(ticker = %entry.ticker, %query, source = self.source.name(), "searching news");

        // Over-fetch when filtering so dropped titles can be replaced
        let limit = if self.script_filter.is_some() {
            self.max_items.saturating_mul(3)
        } else {
            self.max_items
        };

        let items = match self.source.search(&query, limit).await {
            Ok(items) => items,
            Err(e) => {
                warn!(ticker = %entry.ticker, error = %e, "news search failed");
                return Vec::new();
            }
        };

        let mut kept: Vec<NewsItem> = items
            .into_iter()
            .filter(|item| !item.title.trim().is_empty())
            .filter(|item| {
                self.script_filter
                    .as_ref()
                    .is_none_or(|lang| matches_script(&item.title, lang))
            })
            .collect();
        kept.truncate(self.max_items);
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BriefingError;
    use std::sync::Mutex;

    #[test]
    fn test_one_token_per_keyword() {
        let query = build_search_query("애플 주식", &["사과", "다이어트"]);
        assert_eq!(query, "애플 주식 -사과 -다이어트");
        assert_eq!(query.matches("-사과").count(), 1);
        assert_eq!(query.matches("-다이어트").count(), 1);
    }

    #[test]
    fn test_query_is_idempotent() {
        let once = build_search_query("메타 주식", &["메타버스", "meta-verse", "가상현실"]);
        let twice = build_search_query(&once, &["메타버스", "meta-verse", "가상현실"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_multi_word_keywords_are_quoted() {
        let query = build_search_query("Visa", &["travel visa", "passport"]);
        assert_eq!(query, "Visa -\"travel visa\" -passport");
    }

    #[test]
    fn test_no_excludes() {
        let none: [&str; 0] = [];
        assert_eq!(build_search_query(" NVDA OR 엔비디아 ", &none), "NVDA OR 엔비디아");
    }

    #[test]
    fn test_script_filter() {
        assert!(matches_script("애플, 신제품 발표", &Language::Korean));
        assert!(!matches_script("Apple unveils new iPhone", &Language::Korean));
        assert!(matches_script("Apple unveils new iPhone", &Language::English));
        assert!(!matches_script("애플 ¥ 2026", &Language::English));
        assert!(matches_script("2026", &Language::Other("ja".to_string())));
    }

    struct FakeSource {
        items: Vec<NewsItem>,
        fail: bool,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NewsSource for FakeSource {
        fn base_query(&self, entry: &WatchlistEntry) -> String {
            format!("{} 주식", entry.display_name)
        }

        async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsItem>> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(BriefingError::FeedError("timeout".to_string()));
            }
            Ok(self.items.iter().take(limit).cloned().collect())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn source(titles: &[&str], fail: bool) -> Arc<FakeSource> {
        Arc::new(FakeSource {
            items: titles
                .iter()
                .map(|t| NewsItem::new(*t, "https://example.com"))
                .collect(),
            fail,
            queries: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_fetch_applies_excludes_and_limit() {
        let fake = source(&["하나", "둘", "셋", "넷"], false);
        let fetcher = NewsFetcher::new(fake.clone(), 3);
        let entry = WatchlistEntry::new("애플", "AAPL").with_excludes(["사과"]);

        let items = fetcher.fetch(&entry).await;
        assert_eq!(items.len(), 3);
        assert_eq!(fake.queries.lock().unwrap()[0], "애플 주식 -사과");
    }

    #[tokio::test]
    async fn test_fetch_filters_before_truncating() {
        let fake = source(&["Apple news", "애플 소식", "More English", "애플 실적"], false);
        let fetcher = NewsFetcher::new(fake, 2).with_script_filter(Language::Korean);

        let titles: Vec<_> = fetcher
            .fetch(&WatchlistEntry::new("애플", "AAPL"))
            .await
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, ["애플 소식", "애플 실적"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty() {
        let fetcher = NewsFetcher::new(source(&[], true), 3);
        assert!(fetcher.fetch(&WatchlistEntry::new("테슬라", "TSLA")).await.is_empty());
    }
}
