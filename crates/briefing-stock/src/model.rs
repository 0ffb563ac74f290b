//! Domain types shared by every briefing stage

use briefing_prompt::Language;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a watchlist entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryOrigin {
    /// Configured watchlist
    Watchlist,
    /// Added by hot-ticker discovery
    Trending,
}

/// One ticker to report on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawWatchlistEntry")]
pub struct WatchlistEntry {
    pub display_name: String,
    pub ticker: String,
    exclude_keywords: Vec<String>,
    pub origin: EntryOrigin,
}

impl WatchlistEntry {
    pub fn new(display_name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ticker: ticker.into(),
            exclude_keywords: Vec::new(),
            origin: EntryOrigin::Watchlist,
        }
    }

    /// An entry discovered from trending headlines; named after its ticker
    pub fn trending(ticker: impl Into<String>) -> Self {
        let ticker = ticker.into();
        Self {
            display_name: ticker.clone(),
            ticker,
            exclude_keywords: Vec::new(),
            origin: EntryOrigin::Trending,
        }
    }

    /// Set the exclude keywords. Blanks are skipped and duplicates dropped,
    /// keeping the first occurrence.
    pub fn with_excludes<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_keywords.clear();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if !keyword.is_empty() && !self.exclude_keywords.iter().any(|k| k == keyword) {
                self.exclude_keywords.push(keyword.to_string());
            }
        }
        self
    }

    pub fn exclude_keywords(&self) -> &[String] {
        &self.exclude_keywords
    }
}

/// Deserialized form, normalized through [`WatchlistEntry::with_excludes`]
#[derive(Deserialize)]
struct RawWatchlistEntry {
    display_name: String,
    ticker: String,
    #[serde(default)]
    exclude_keywords: Vec<String>,
    origin: EntryOrigin,
}

impl From<RawWatchlistEntry> for WatchlistEntry {
    fn from(raw: RawWatchlistEntry) -> Self {
        Self {
            display_name: raw.display_name,
            ticker: raw.ticker,
            exclude_keywords: Vec::new(),
            origin: raw.origin,
        }
        .with_excludes(raw.exclude_keywords)
    }
}

/// Short symbolic indicator attached to a ticker row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeFlag {
    HighVolatility,
    NearYearHigh,
    EarningsSoon,
}

impl BadgeFlag {
    pub fn symbol(self) -> &'static str {
        match self {
            BadgeFlag::HighVolatility => "🔥",
            BadgeFlag::NearYearHigh => "🚀",
            BadgeFlag::EarningsSoon => "📅",
        }
    }

    pub fn label(self, language: &Language) -> &'static str {
        match (self, language) {
            (BadgeFlag::HighVolatility, Language::Korean) => "변동성 확대",
            (BadgeFlag::NearYearHigh, Language::Korean) => "52주 신고가 근접",
            (BadgeFlag::EarningsSoon, Language::Korean) => "실적 발표 임박",
            (BadgeFlag::HighVolatility, _) => "High volatility",
            (BadgeFlag::NearYearHigh, _) => "Near 52-week high",
            (BadgeFlag::EarningsSoon, _) => "Earnings soon",
        }
    }
}

/// Metrics derived for one ticker at run time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteMetrics {
    pub price: f64,
    pub previous_close: f64,
    pub percent_change: f64,
    pub market_cap: Option<f64>,
    pub year_high: f64,
    pub year_low: f64,
    pub pe_ratio: Option<f64>,
    /// Fraction, e.g. `0.0044` for 0.44%
    pub dividend_yield: Option<f64>,
    pub analyst_target: Option<f64>,
    pub recommendation_key: Option<String>,
    pub upside_percent: f64,
    pub distance_from_low: f64,
    pub earnings_date: Option<NaiveDate>,
    pub badges: Vec<BadgeFlag>,
}

/// Quote result for one ticker; never an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuoteSnapshot {
    Available(QuoteMetrics),
    Unavailable { reason: String },
}

impl QuoteSnapshot {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        QuoteSnapshot::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn metrics(&self) -> Option<&QuoteMetrics> {
        match self {
            QuoteSnapshot::Available(metrics) => Some(metrics),
            QuoteSnapshot::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.metrics().is_some()
    }

    pub fn badges(&self) -> &[BadgeFlag] {
        self.metrics()
            .map(|m| m.badges.as_slice())
            .unwrap_or_default()
    }
}

/// A news headline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// Article teaser, when the source provides one
    pub description: Option<String>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Investor sentiment reported by the summarizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(self, language: &Language) -> &'static str {
        match (self, language) {
            (Sentiment::Positive, Language::Korean) => "긍정",
            (Sentiment::Neutral, Language::Korean) => "중립",
            (Sentiment::Negative, Language::Korean) => "부정",
            (Sentiment::Positive, _) => "Positive",
            (Sentiment::Neutral, _) => "Neutral",
            (Sentiment::Negative, _) => "Negative",
        }
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment {other:?}")),
        }
    }
}

/// AI summary of a ticker's news
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsSummary {
    /// A reply that matched the summary schema
    Parsed {
        lines: Vec<String>,
        sentiment: Sentiment,
    },
    /// Fixed fallback text, rendered verbatim
    Fallback(String),
}

/// Everything reported for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub entry: WatchlistEntry,
    /// `None` when the quote stage is disabled
    pub snapshot: Option<QuoteSnapshot>,
    pub news: Vec<NewsItem>,
    pub summary: Option<NewsSummary>,
}

impl ReportSection {
    pub fn new(entry: WatchlistEntry) -> Self {
        Self {
            entry,
            snapshot: None,
            news: Vec::new(),
            summary: None,
        }
    }

    pub fn flags(&self) -> &[BadgeFlag] {
        self.snapshot
            .as_ref()
            .map(QuoteSnapshot::badges)
            .unwrap_or_default()
    }
}

/// One row of the market overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub label: String,
    pub symbol: String,
    pub price: f64,
    pub percent_change: f64,
}

/// Volatility index band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VixBand {
    Calm,
    Normal,
    Elevated,
    Fear,
}

impl VixBand {
    /// `< 15` calm, `15..20` normal, `20..30` elevated, `>= 30` fear
    pub fn from_value(value: f64) -> Self {
        if value < 15.0 {
            VixBand::Calm
        } else if value < 20.0 {
            VixBand::Normal
        } else if value < 30.0 {
            VixBand::Elevated
        } else {
            VixBand::Fear
        }
    }

    pub fn label(self, language: &Language) -> &'static str {
        match (self, language) {
            (VixBand::Calm, Language::Korean) => "안정",
            (VixBand::Normal, Language::Korean) => "보통",
            (VixBand::Elevated, Language::Korean) => "경계",
            (VixBand::Fear, Language::Korean) => "공포",
            (VixBand::Calm, _) => "Calm",
            (VixBand::Normal, _) => "Normal",
            (VixBand::Elevated, _) => "Elevated",
            (VixBand::Fear, _) => "Fear",
        }
    }

    /// Display colour, from green to red
    pub fn color(self) -> &'static str {
        match self {
            VixBand::Calm => "#27ae60",
            VixBand::Normal => "#7f8c8d",
            VixBand::Elevated => "#e67e22",
            VixBand::Fear => "#c0392b",
        }
    }
}

/// VIX reading mapped to its band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VixReading {
    pub value: f64,
    pub band: VixBand,
}

impl VixReading {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            band: VixBand::from_value(value),
        }
    }
}

/// Index rows and volatility shown above the ticker sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub indices: Vec<IndexRow>,
    pub vix: Option<VixReading>,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    #[default]
    Html,
    Text,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "text" | "txt" | "plain" => Ok(ReportFormat::Text),
            other => Err(format!("unknown report format {other:?}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Text => write!(f, "text"),
        }
    }
}

/// A rendered report, ready to mail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub subject: String,
    pub format: ReportFormat,
    pub body: String,
    pub generated_at: DateTime<Local>,
}
