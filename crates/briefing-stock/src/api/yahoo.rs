//! Yahoo Finance client
//!
//! Price history comes from the chart API through `yahoo_finance_api`.
//! Fundamentals come from the quoteSummary endpoint, which needs a session
//! cookie and a crumb fetched once per run.

use crate::error::{BriefingError, Result};
use crate::metrics::{DailyBar, Fundamentals, PriceHistory};
use crate::quotes::MarketDataSource;
use crate::rate_gate::RateGate;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "price,summaryDetail,financialData,calendarEvents";
const USER_AGENT: &str = "Mozilla/5.0";

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    http: Client,
    crumb: OnceCell<String>,
    gate: RateGate,
    timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(gate: RateGate, timeout: Duration) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| BriefingError::YahooFinanceError(e.to_string()))?;

        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            connector,
            http,
            crumb: OnceCell::new(),
            gate,
            timeout,
        })
    }

    /// Get the session crumb, performing the cookie handshake on first use
    async fn crumb(&self) -> Result<&str> {
        let crumb = self
            .crumb
            .get_or_try_init(|| async {
                // Sets the session cookie; the status is usually 404
                self.gate.wait().await;
                let _ = self.http.get(COOKIE_URL).send().await?;

                self.gate.wait().await;
                let response = self.http.get(CRUMB_URL).send().await?;
                if !response.status().is_success() {
                    return Err(BriefingError::YahooFinanceError(format!(
                        "crumb request failed with {}",
                        response.status()
                    )));
                }

                let crumb = response.text().await?.trim().to_string();
                if crumb.is_empty() || crumb.contains('<') {
                    return Err(BriefingError::YahooFinanceError(
                        "crumb response was not a crumb".to_string(),
                    ));
                }
                debug!("obtained Yahoo crumb");
                Ok::<_, BriefingError>(crumb)
            })
            .await?;

        Ok(crumb.as_str())
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    #[instrument(skip(self))]
    async fn price_history(&self, symbol: &str) -> Result<PriceHistory> {
        self.gate.wait().await;

        let response = tokio::time::timeout(
            self.timeout,
            self.connector.get_quote_range(symbol, "1d", "1y"),
        )
        .await
        .map_err(|_| BriefingError::YahooFinanceError(format!("{symbol}: chart request timed out")))?
        .map_err(|e| BriefingError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| BriefingError::YahooFinanceError(e.to_string()))?;

        let bars: Vec<DailyBar> = quotes
            .iter()
            .map(|q| DailyBar {
                high: q.high,
                low: q.low,
                close: q.close,
            })
            .collect();

        PriceHistory::from_bars(&bars).ok_or_else(|| BriefingError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("only {} usable daily bars", bars.len()),
        })
    }

    #[instrument(skip(self))]
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let crumb = self.crumb().await?;
        self.gate.wait().await;

        let response = self
            .http
            .get(format!("{QUOTE_SUMMARY_URL}/{symbol}"))
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BriefingError::ApiError(format!(
                "quoteSummary for {symbol} returned {status}"
            )));
        }

        let body: QuoteSummaryResponse = response.json().await?;
        body.into_fundamentals(symbol)
    }
}

// quoteSummary response types. Numbers arrive as `{"raw": .., "fmt": ..}`
// objects, which are empty when Yahoo has no value.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    financial_data: Option<FinancialData>,
    #[serde(default)]
    calendar_events: Option<CalendarEvents>,
}

#[derive(Debug, Default, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: Option<&RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default)]
    market_cap: Option<RawValue>,
    #[serde(default, rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(default)]
    dividend_yield: Option<RawValue>,
    #[serde(default)]
    fifty_two_week_high: Option<RawValue>,
    #[serde(default)]
    fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    #[serde(default)]
    target_mean_price: Option<RawValue>,
    #[serde(default)]
    recommendation_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CalendarEvents {
    #[serde(default)]
    earnings: Option<EarningsEvents>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EarningsEvents {
    #[serde(default)]
    earnings_date: Vec<RawValue>,
}

impl QuoteSummaryResponse {
    fn into_fundamentals(self, symbol: &str) -> Result<Fundamentals> {
        let QuoteSummary { result, error } = self.quote_summary;
        let result = result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| BriefingError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: error.map_or_else(|| "empty quoteSummary".to_string(), |e| e.to_string()),
            })?;

        let price = result.price.unwrap_or_default();
        let detail = result.summary_detail.unwrap_or_default();
        let financial = result.financial_data.unwrap_or_default();

        let earnings_date = result
            .calendar_events
            .and_then(|c| c.earnings)
            .and_then(|e| e.earnings_date.into_iter().find_map(|d| d.raw))
            .and_then(|ts| DateTime::from_timestamp(ts as i64, 0))
            .map(|dt| dt.date_naive());

        Ok(Fundamentals {
            market_cap: raw(price.market_cap.as_ref()).or(raw(detail.market_cap.as_ref())),
            pe_ratio: raw(detail.trailing_pe.as_ref()),
            dividend_yield: raw(detail.dividend_yield.as_ref()),
            analyst_target: raw(financial.target_mean_price.as_ref()),
            recommendation_key: financial
                .recommendation_key
                .filter(|k| !k.is_empty() && k != "none"),
            earnings_date,
            year_high: raw(detail.fifty_two_week_high.as_ref()),
            year_low: raw(detail.fifty_two_week_low.as_ref()),
        })
    }
}
