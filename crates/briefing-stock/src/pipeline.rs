//! The briefing run: watchlist, quotes, news, AI stages, render, mail

use crate::ai::{AiClient, HeadlineSource, HotTickerDiscovery, Summarizer, Translator};
use crate::api::{GoogleNewsClient, NewsApiClient, SheetsClient, YahooFinanceClient};
use crate::config::{AiProviderKind, BriefingConfig, NewsSourceKind, WatchlistSpec};
use crate::error::{BriefingError, Result};
use crate::mailer::{DryRunMailer, Mailer, SmtpMailer};
use crate::model::{Report, ReportSection};
use crate::news::{NewsFetcher, NewsSource};
use crate::prompts::register_prompts;
use crate::quotes::QuoteFetcher;
use crate::rate_gate::RateGate;
use crate::render::{RendererFactory, ReportRenderer};
use crate::watchlist::{
    BuiltinWatchlist, CsvFileWatchlist, SheetWatchlist, WatchlistSource, merge_trending,
};
use briefing_llm::LLMProvider;
use briefing_llm::RetryPolicy;
use briefing_llm::providers::{GeminiConfig, GeminiProvider, OpenAIConfig, OpenAIProvider};
use briefing_prompt::PromptRegistry;
use chrono::Local;
use std::sync::Arc;
use tracing::{info, warn};

/// One configured briefing run
pub struct BriefingPipeline {
    watchlist: Arc<dyn WatchlistSource>,
    quotes: Option<QuoteFetcher>,
    market_overview: bool,
    news: Option<NewsFetcher>,
    translator: Option<Translator>,
    summarizer: Option<Summarizer>,
    hot_tickers: Option<HotTickerDiscovery>,
    renderer: Box<dyn ReportRenderer>,
    mailer: Arc<dyn Mailer>,
}

impl BriefingPipeline {
    pub fn builder(
        watchlist: Arc<dyn WatchlistSource>,
        renderer: Box<dyn ReportRenderer>,
        mailer: Arc<dyn Mailer>,
    ) -> BriefingPipelineBuilder {
        BriefingPipelineBuilder {
            pipeline: Self {
                watchlist,
                quotes: None,
                market_overview: false,
                news: None,
                translator: None,
                summarizer: None,
                hot_tickers: None,
                renderer,
                mailer,
            },
        }
    }

    /// Wire every client a validated configuration asks for
    pub fn from_config(config: &BriefingConfig) -> Result<Self> {
        let limits = &config.rate_limits;
        let stages = &config.stages;

        let watchlist: Arc<dyn WatchlistSource> = match &config.watchlist {
            WatchlistSpec::Builtin => Arc::new(BuiltinWatchlist),
            WatchlistSpec::Csv(path) => Arc::new(CsvFileWatchlist::new(path)),
            WatchlistSpec::Sheet { id, tab } => {
                let client = SheetsClient::new(&config.sheet_credentials, config.data_timeout)?;
                Arc::new(SheetWatchlist::new(client, id.as_str(), tab.clone()))
            }
        };

        let renderer = RendererFactory::create(config.format, config.language.clone())?;
        let mailer: Arc<dyn Mailer> = if config.dry_run {
            Arc::new(DryRunMailer)
        } else {
            Arc::new(SmtpMailer::new(&config.mail)?)
        };

        let mut builder = Self::builder(watchlist, renderer, mailer);

        if stages.quotes {
            let gate = RateGate::per_minute("yahoo", limits.yahoo_rpm);
            let yahoo = YahooFinanceClient::new(gate, config.data_timeout)?;
            builder = builder
                .quotes(QuoteFetcher::new(Arc::new(yahoo)))
                .market_overview(stages.market_overview);
        }

        let news_gate = RateGate::per_minute("news", limits.news_rpm);
        let newsapi = if (stages.news && config.news.source == NewsSourceKind::NewsApi)
            || stages.hot_tickers
        {
            let key = config.news.api_key.clone().ok_or_else(|| {
                BriefingError::ConfigError("NEWS_API_KEY is not set".to_string())
            })?;
            let client = NewsApiClient::new(
                key,
                config.news.language.clone(),
                news_gate.clone(),
                config.data_timeout,
            )?
            .with_lookback_days(config.news.lookback_days);
            Some(Arc::new(client))
        } else {
            None
        };

        if stages.news {
            let source: Arc<dyn NewsSource> = match (config.news.source, &newsapi) {
                (NewsSourceKind::NewsApi, Some(client)) => client.clone(),
                (NewsSourceKind::NewsApi, None) => {
                    return Err(BriefingError::ConfigError(
                        "NewsAPI client was not configured".to_string(),
                    ));
                }
                (NewsSourceKind::GoogleRss, _) => Arc::new(GoogleNewsClient::new(
                    config.news.language.clone(),
                    config.news.query_suffix.as_str(),
                    news_gate.clone(),
                    config.data_timeout,
                )?),
            };

            let mut fetcher = NewsFetcher::new(source, config.news.max_items);
            if config.news.script_filter {
                fetcher = fetcher.with_script_filter(config.news.language.clone());
            }
            builder = builder.news(fetcher);
        }

        if stages.needs_ai() {
            let prompts = PromptRegistry::with_language(config.language.clone());
            register_prompts(&prompts)?;
            let prompts = Arc::new(prompts);
            let client = ai_client(config)?;

            if stages.news && stages.translate {
                builder = builder.translator(Translator::new(
                    client.clone(),
                    prompts.clone(),
                    config.language.clone(),
                ));
            }
            if stages.news && stages.summarize {
                builder = builder.summarizer(Summarizer::new(
                    client.clone(),
                    prompts.clone(),
                    config.language.clone(),
                ));
            }
            if stages.hot_tickers {
                let headlines: Arc<dyn HeadlineSource> = newsapi.clone().ok_or_else(|| {
                    BriefingError::ConfigError("NewsAPI client was not configured".to_string())
                })?;
                builder = builder.hot_tickers(HotTickerDiscovery::new(
                    headlines,
                    client,
                    prompts,
                    config.language.clone(),
                    config.default_hot_tickers.clone(),
                ));
            }
        }

        Ok(builder.build())
    }

    /// Run once; `Ok(None)` when the watchlist has no active entries
    ///
    /// Per-ticker failures degrade the report. Watchlist, render and mail
    /// failures are returned.
    pub async fn run(&self) -> Result<Option<Report>> {
        info!(source = %self.watchlist.describe(), "loading watchlist");
        let mut entries = self.watchlist.load().await?;
        if entries.is_empty() {
            warn!("watchlist has no active entries, nothing to report");
            return Ok(None);
        }

        if let Some(discovery) = &self.hot_tickers {
            let tickers = discovery.discover().await;
            merge_trending(&mut entries, &tickers);
        }

        let generated_at = Local::now();
        let today = generated_at.date_naive();

        let overview = match &self.quotes {
            Some(quotes) if self.market_overview => quotes.market_overview().await,
            _ => None,
        };

        let total = entries.len();
        let mut sections = Vec::with_capacity(total);
        for (i, entry) in entries.into_iter().enumerate() {
            info!(ticker = %entry.ticker, "[{}/{}] processing {}", i + 1, total, entry.display_name);
            let mut section = ReportSection::new(entry);

            if let Some(quotes) = &self.quotes {
                section.snapshot = Some(quotes.snapshot(&section.entry.ticker, today).await);
            }

            if let Some(news) = &self.news {
                let mut items = news.fetch(&section.entry).await;
                if let Some(translator) = &self.translator {
                    items = translator.translate_items(items).await;
                }
                section.news = items;
            }

            if let Some(summarizer) = &self.summarizer {
                section.summary = summarizer
                    .summarize(&section.entry.ticker, &section.entry.display_name, &section.news)
                    .await;
            }

            sections.push(section);
        }

        let body = self.renderer.render(&sections, overview.as_ref(), generated_at)?;
        let report = Report {
            subject: self.renderer.subject(sections.len(), generated_at),
            format: self.renderer.format(),
            body,
            generated_at,
        };

        info!(mailer = self.mailer.name(), subject = %report.subject, "delivering report");
        self.mailer.deliver(&report).await?;
        Ok(Some(report))
    }
}

fn ai_client(config: &BriefingConfig) -> Result<AiClient> {
    let timeout_secs = config.ai_timeout.as_secs();
    let provider: Arc<dyn LLMProvider> = match config.ai.provider {
        AiProviderKind::Gemini => {
            let key = config.ai.api_key.clone().unwrap_or_default();
            let gemini = GeminiConfig::new(key).with_timeout(timeout_secs);
            Arc::new(GeminiProvider::with_config(gemini)?)
        }
        AiProviderKind::OpenAi => {
            let key = config.ai.api_key.clone().unwrap_or_default();
            let mut openai = OpenAIConfig::new(key).with_timeout(timeout_secs);
            if let Some(base) = &config.ai.api_base {
                openai = openai.with_api_base(base.as_str());
            }
            Arc::new(OpenAIProvider::with_config(openai)?)
        }
    };

    let retry = RetryPolicy::linear(config.ai.max_attempts, config.ai.backoff_step);
    Ok(AiClient::new(provider, config.ai.model.as_str())
        .with_gate(RateGate::per_minute("ai", config.rate_limits.ai_rpm))
        .with_retry(retry)
        .with_max_tokens(config.ai.max_tokens))
}

/// Builder for [`BriefingPipeline`]; stages left unset are skipped
pub struct BriefingPipelineBuilder {
    pipeline: BriefingPipeline,
}

impl BriefingPipelineBuilder {
    pub fn quotes(mut self, quotes: QuoteFetcher) -> Self {
        self.pipeline.quotes = Some(quotes);
        self
    }

    /// Only takes effect together with a quote fetcher
    pub fn market_overview(mut self, enabled: bool) -> Self {
        self.pipeline.market_overview = enabled;
        self
    }

    pub fn news(mut self, news: NewsFetcher) -> Self {
        self.pipeline.news = Some(news);
        self
    }

    pub fn translator(mut self, translator: Translator) -> Self {
        self.pipeline.translator = Some(translator);
        self
    }

    pub fn summarizer(mut self, summarizer: Summarizer) -> Self {
        self.pipeline.summarizer = Some(summarizer);
        self
    }

    pub fn hot_tickers(mut self, discovery: HotTickerDiscovery) -> Self {
        self.pipeline.hot_tickers = Some(discovery);
        self
    }

    pub fn build(self) -> BriefingPipeline {
        self.pipeline
    }
}
