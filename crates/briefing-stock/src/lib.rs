//! Daily stock briefing
//!
//! This crate builds one report per run for a watchlist of US tickers:
//!
//! - Quotes and derived metrics from Yahoo Finance (percent change, upside
//!   to analyst target, distance from the 52-week low, badge flags)
//! - Headlines from Google News RSS or NewsAPI, with keyword exclusion and
//!   an optional script filter
//! - Optional AI stages: headline translation, three-line summaries with
//!   sentiment, and trending-ticker discovery
//! - An HTML or plain-text report, mailed over SMTP
//!
//! # Architecture
//!
//! [`BriefingPipeline`] runs the stages in order. Which stages run is set
//! by [`BriefingConfig`], whose profiles reproduce the classic variants:
//! - `quote-report`: quotes, market overview and Korean headlines as HTML
//! - `ai-digest`: English NewsAPI headlines summarized into a text digest
//! - `translated`: quotes plus translated headlines and trending tickers
//!
//! Every per-ticker stage degrades instead of failing: a missing quote
//! becomes a placeholder row, a failed search an empty list and a failed
//! AI call a fixed fallback text.
//!
//! # Example
//!
//! ```rust,no_run
//! use briefing_stock::{BriefingConfig, BriefingPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BriefingConfig::from_env()?;
//!     config.validate()?;
//!
//!     let pipeline = BriefingPipeline::from_config(&config)?;
//!     if let Some(report) = pipeline.run().await? {
//!         println!("sent {}", report.subject);
//!     }
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod api;
pub mod config;
pub mod error;
pub mod mailer;
pub mod metrics;
pub mod model;
pub mod news;
pub mod pipeline;
pub mod prompts;
pub mod quotes;
pub mod rate_gate;
pub mod render;
pub mod watchlist;

// Re-export main types
pub use config::{
    AiConfig, AiProviderKind, BriefingConfig, BriefingConfigBuilder, MailConfig, NewsConfig,
    NewsSourceKind, Profile, RateLimits, SheetCredentials, StageToggles, WatchlistSpec,
};
pub use error::{BriefingError, Result};
pub use mailer::{DryRunMailer, Mailer, SmtpMailer};
pub use model::{
    BadgeFlag, EntryOrigin, MarketOverview, NewsItem, NewsSummary, QuoteMetrics, QuoteSnapshot,
    Report, ReportFormat, ReportSection, Sentiment, WatchlistEntry,
};
pub use news::{NewsFetcher, NewsSource, build_search_query};
pub use pipeline::{BriefingPipeline, BriefingPipelineBuilder};
pub use quotes::{MarketDataSource, QuoteFetcher};
pub use rate_gate::RateGate;
pub use render::{HtmlRenderer, RendererFactory, ReportRenderer, TextRenderer};
pub use watchlist::{BuiltinWatchlist, CsvFileWatchlist, SheetWatchlist, WatchlistSource};

pub use briefing_prompt::Language;
