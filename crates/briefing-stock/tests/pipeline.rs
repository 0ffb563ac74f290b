//! End-to-end runs of the briefing pipeline against in-memory sources

use async_trait::async_trait;
use briefing_llm::{CompletionRequest, CompletionResponse, LLMError, LLMProvider, RetryPolicy};
use briefing_llm::{Message, StopReason, TokenUsage};
use briefing_prompt::PromptRegistry;
use briefing_stock::ai::{AiClient, HeadlineSource, HotTickerDiscovery, Summarizer, fallback_summary};
use briefing_stock::metrics::{Fundamentals, PriceHistory};
use briefing_stock::prompts::register_prompts;
use briefing_stock::watchlist::parse_watchlist_csv;
use briefing_stock::{
    BriefingError, BriefingPipeline, HtmlRenderer, Language, Mailer, MarketDataSource,
    NewsFetcher, NewsItem, NewsSource, QuoteFetcher, Report, Result, TextRenderer,
    WatchlistEntry, WatchlistSource,
};
use mockall::mock;
use tokio_test::assert_ok;
use std::sync::{Arc, Mutex};

mock! {
    pub Provider {}

    #[async_trait]
    impl LLMProvider for Provider {
        async fn complete(&self, request: CompletionRequest) -> briefing_llm::Result<CompletionResponse>;
        fn name(&self) -> &str;
    }
}

struct CsvWatchlist(String);

#[async_trait]
impl WatchlistSource for CsvWatchlist {
    async fn load(&self) -> Result<Vec<WatchlistEntry>> {
        parse_watchlist_csv(self.0.as_bytes())
    }

    fn describe(&self) -> String {
        "inline csv".to_string()
    }
}

struct FlatMarket;

#[async_trait]
impl MarketDataSource for FlatMarket {
    async fn price_history(&self, symbol: &str) -> Result<PriceHistory> {
        if symbol == "ZZZZ" {
            return Err(BriefingError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "delisted".to_string(),
            });
        }
        Ok(PriceHistory {
            last: 110.0,
            previous_close: 100.0,
            year_high: 150.0,
            year_low: 90.0,
        })
    }

    async fn fundamentals(&self, _symbol: &str) -> Result<Fundamentals> {
        Ok(Fundamentals::default())
    }
}

struct FixedNews(Vec<&'static str>);

#[async_trait]
impl NewsSource for FixedNews {
    fn base_query(&self, entry: &WatchlistEntry) -> String {
        entry.display_name.clone()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<NewsItem>> {
        Ok(self
            .0
            .iter()
            .take(limit)
            .map(|title| NewsItem::new(format!("{query}: {title}"), "https://news.example/a"))
            .collect())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct FixedHeadlines;

#[async_trait]
impl HeadlineSource for FixedHeadlines {
    async fn headlines(&self, _limit: usize) -> Result<Vec<NewsItem>> {
        Ok(vec![NewsItem::new("Palantir wins Army contract", "https://news.example/p")])
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<Report>>,
    fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn deliver(&self, report: &Report) -> Result<()> {
        if self.fail {
            return Err(BriefingError::MailError("535 authentication failed".to_string()));
        }
        self.sent.lock().unwrap().push(report.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

const WATCHLIST: &str = "Ticker,Name,Status,Exclude\n\
                         AAPL,애플,Active,사과\n\
                         MSFT,마이크로소프트,Inactive,\n\
                         NVDA,엔비디아,active,\n";

fn prompts() -> Arc<PromptRegistry> {
    let registry = PromptRegistry::with_language(Language::Korean);
    register_prompts(&registry).unwrap();
    Arc::new(registry)
}

fn reply(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(text),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

#[tokio::test]
async fn test_only_active_entries_are_reported() {
    let mailer = Arc::new(RecordingMailer::default());
    let pipeline = BriefingPipeline::builder(
        Arc::new(CsvWatchlist(WATCHLIST.into())),
        Box::new(HtmlRenderer::new(Language::Korean).unwrap()),
        mailer.clone(),
    )
    .quotes(QuoteFetcher::new(Arc::new(FlatMarket)))
    .news(NewsFetcher::new(Arc::new(FixedNews(vec!["실적 발표"])), 3))
    .build();

    let report = assert_ok!(pipeline.run().await).unwrap();

    assert!(report.body.contains("AAPL"));
    assert!(report.body.contains("NVDA"));
    assert!(!report.body.contains("MSFT"));
    assert!(report.body.contains("+10.00%"));
    assert!(report.subject.contains("월스트리트 2대 우량주 리포트"));
    // Exclude keywords reach the search query
    assert!(report.body.contains("애플 -사과: 실적 발표"));

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, report.subject);
}

#[tokio::test]
async fn test_unavailable_quote_keeps_its_section() {
    let watchlist = format!("{WATCHLIST}ZZZZ,Gone,Active,\n");
    let pipeline = BriefingPipeline::builder(
        Arc::new(CsvWatchlist(watchlist)),
        Box::new(TextRenderer::new(Language::Korean)),
        Arc::new(RecordingMailer::default()),
    )
    .quotes(QuoteFetcher::new(Arc::new(FlatMarket)))
    .build();

    let report = assert_ok!(pipeline.run().await).unwrap();

    assert!(report.body.contains("📊 [ZZZZ - Gone] (시세 정보를 가져오지 못했습니다.)\n"));
    assert!(report.body.contains("📊 [AAPL - 애플]\n"));
    assert!(report.body.contains("📊 [NVDA - 엔비디아]\n"));
    assert_eq!(report.body.matches("+10.00%").count(), 2);
    assert_eq!(report.body.matches("📊 [").count(), 3);
}

#[tokio::test]
async fn test_mail_failure_is_an_error() {
    let mailer = Arc::new(RecordingMailer {
        fail: true,
        ..RecordingMailer::default()
    });
    let pipeline = BriefingPipeline::builder(
        Arc::new(CsvWatchlist(WATCHLIST.into())),
        Box::new(TextRenderer::new(Language::Korean)),
        mailer,
    )
    .build();

    assert!(matches!(pipeline.run().await, Err(BriefingError::MailError(_))));
}

#[tokio::test]
async fn test_empty_watchlist_sends_nothing() {
    let mailer = Arc::new(RecordingMailer::default());
    let pipeline = BriefingPipeline::builder(
        Arc::new(CsvWatchlist("Ticker,Name,Status\nAAPL,애플,paused\n".into())),
        Box::new(TextRenderer::new(Language::Korean)),
        mailer.clone(),
    )
    .build();

    assert!(assert_ok!(pipeline.run().await).is_none());
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failing_ai_falls_back_verbatim() {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .times(2 * 3)
        .returning(|_| Err(LLMError::RateLimitExceeded("quota exceeded".to_string())));

    let client = AiClient::new(Arc::new(provider), "gemini-2.0-flash").with_retry(RetryPolicy::fast());
    let mailer = Arc::new(RecordingMailer::default());
    let pipeline = BriefingPipeline::builder(
        Arc::new(CsvWatchlist(WATCHLIST.into())),
        Box::new(TextRenderer::new(Language::Korean)),
        mailer.clone(),
    )
    .news(NewsFetcher::new(Arc::new(FixedNews(vec!["신제품", "목표가 상향"])), 3))
    .summarizer(Summarizer::new(client, prompts(), Language::Korean))
    .build();

    let report = pipeline.run().await.unwrap().unwrap();

    let expected = fallback_summary(
        &Language::Korean,
        &["애플 -사과: 신제품".to_string(), "애플 -사과: 목표가 상향".to_string()],
    );
    assert!(report.body.contains(&format!("📊 [AAPL - 애플]\n{expected}\n")));
}

#[tokio::test]
async fn test_parsed_summary_in_digest() {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .returning(|_| Ok(reply("1. 매출 증가\n2. 신제품 호평\n3. 목표가 상향\nSENTIMENT: positive")));

    let client = AiClient::new(Arc::new(provider), "gemini-2.0-flash").with_retry(RetryPolicy::fast());
    let pipeline = BriefingPipeline::builder(
        Arc::new(CsvWatchlist(WATCHLIST.into())),
        Box::new(TextRenderer::new(Language::Korean)),
        Arc::new(RecordingMailer::default()),
    )
    .news(NewsFetcher::new(Arc::new(FixedNews(vec!["신제품"])), 3))
    .summarizer(Summarizer::new(client, prompts(), Language::Korean))
    .build();

    let report = pipeline.run().await.unwrap().unwrap();
    assert!(report.body.contains("1. 매출 증가\n2. 신제품 호평\n3. 목표가 상향\n투자 심리: 긍정"));
}

#[tokio::test]
async fn test_html_escapes_titles() {
    let pipeline = BriefingPipeline::builder(
        Arc::new(CsvWatchlist(WATCHLIST.into())),
        Box::new(HtmlRenderer::new(Language::Korean).unwrap()),
        Arc::new(RecordingMailer::default()),
    )
    .news(NewsFetcher::new(Arc::new(FixedNews(vec!["<img src=x onerror=alert(1)>"])), 3))
    .build();

    let report = pipeline.run().await.unwrap().unwrap();
    assert!(!report.body.contains("<img"));
    assert!(report.body.contains("&lt;img"));
}

#[tokio::test]
async fn test_trending_tickers_are_appended() {
    let mut provider = MockProvider::new();
    provider
        .expect_complete()
        .times(1)
        .returning(|_| Ok(reply("TICKERS: PLTR, NVDA")));

    let client = AiClient::new(Arc::new(provider), "gemini-2.0-flash").with_retry(RetryPolicy::fast());
    let discovery = HotTickerDiscovery::new(
        Arc::new(FixedHeadlines),
        client,
        prompts(),
        Language::Korean,
        vec!["NVDA".to_string(), "TSLA".to_string()],
    );
    let pipeline = BriefingPipeline::builder(
        Arc::new(CsvWatchlist(WATCHLIST.into())),
        Box::new(TextRenderer::new(Language::Korean)),
        Arc::new(RecordingMailer::default()),
    )
    .quotes(QuoteFetcher::new(Arc::new(FlatMarket)))
    .hot_tickers(discovery)
    .build();

    let report = pipeline.run().await.unwrap().unwrap();
    assert!(report.body.contains("📊 [PLTR - PLTR]"));
    assert_eq!(report.body.matches("📊 [NVDA").count(), 1);
}
