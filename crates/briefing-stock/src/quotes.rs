//! Quote fetching and market overview

use crate::error::Result;
use crate::metrics::{self, Fundamentals, PriceHistory};
use crate::model::{IndexRow, MarketOverview, QuoteSnapshot, VixReading};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

/// Index rows shown in the market overview, in display order
pub const OVERVIEW_INDICES: [(&str, &str); 3] = [
    ("^GSPC", "S&P 500"),
    ("^IXIC", "Nasdaq"),
    ("KRW=X", "USD/KRW"),
];

pub const VIX_SYMBOL: &str = "^VIX";

/// Provider of raw market data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Last price, previous close and 52-week range from one year of daily bars
    async fn price_history(&self, symbol: &str) -> Result<PriceHistory>;

    /// Valuation and calendar fields
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals>;
}

/// Turns raw market data into snapshots, never failing the caller
#[derive(Clone)]
pub struct QuoteFetcher {
    source: Arc<dyn MarketDataSource>,
}

impl QuoteFetcher {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// Snapshot for one ticker
    ///
    /// A price-history failure yields [`QuoteSnapshot::Unavailable`]. A
    /// fundamentals failure only blanks the optional fields.
    pub async fn snapshot(&self, symbol: &str, today: NaiveDate) -> QuoteSnapshot {
        let history = match self.source.price_history(symbol).await {
            Ok(history) => history,
            Err(e) => {
                warn!(symbol, error = %e, "price history unavailable");
                return QuoteSnapshot::unavailable(e.to_string());
            }
        };

        let fundamentals = match self.source.fundamentals(symbol).await {
            Ok(f) => Some(f),
            Err(e) => {
                warn!(symbol, error = %e, "fundamentals unavailable, continuing without them");
                None
            }
        };

        let metrics = metrics::derive_metrics(&history, fundamentals.as_ref(), today);
        debug!(symbol, price = metrics.price, change = metrics.percent_change, "snapshot ready");
        QuoteSnapshot::Available(metrics)
    }

    /// Index rows plus VIX; `None` when nothing could be fetched
    pub async fn market_overview(&self) -> Option<MarketOverview> {
        let mut indices = Vec::with_capacity(OVERVIEW_INDICES.len());

        for (symbol, label) in OVERVIEW_INDICES {
            match self.source.price_history(symbol).await {
                Ok(history) => indices.push(IndexRow {
                    label: label.to_string(),
                    symbol: symbol.to_string(),
                    price: history.last,
                    percent_change: metrics::percent_change(history.last, history.previous_close),
                }),
                Err(e) => warn!(symbol, error = %e, "index row omitted"),
            }
        }

        let vix = match self.source.price_history(VIX_SYMBOL).await {
            Ok(history) => Some(VixReading::new(history.last)),
            Err(e) => {
                warn!(error = %e, "VIX reading omitted");
                None
            }
        };

        if indices.is_empty() && vix.is_none() {
            warn!("market overview unavailable");
            return None;
        }

        Some(MarketOverview { indices, vix })
    }
}
