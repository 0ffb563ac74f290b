//! Pure per-ticker metric derivation
//!
//! Everything here is computable without network access. The quote fetcher
//! feeds [`PriceHistory`] and [`Fundamentals`] in and gets [`QuoteMetrics`]
//! back.

use crate::model::{BadgeFlag, QuoteMetrics};
use chrono::NaiveDate;

/// `|percent_change|` at or above this marks high volatility
pub const HIGH_VOLATILITY_PCT: f64 = 3.5;
/// Last price at or above this fraction of the 52-week high is "near high"
pub const NEAR_HIGH_RATIO: f64 = 0.98;
/// Earnings within this many days (inclusive) are "soon"
pub const EARNINGS_WINDOW_DAYS: i64 = 7;

/// One daily bar of price history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Price facts taken from a year of daily bars
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceHistory {
    pub last: f64,
    pub previous_close: f64,
    pub year_high: f64,
    pub year_low: f64,
}

impl PriceHistory {
    /// Summarize bars ordered oldest first. Bars with a non-positive close
    /// are skipped; at least two usable bars are required.
    pub fn from_bars(bars: &[DailyBar]) -> Option<Self> {
        let usable: Vec<&DailyBar> = bars.iter().filter(|b| b.close > 0.0).collect();
        let [.., prev, last] = usable.as_slice() else {
            return None;
        };

        let year_high = usable
            .iter()
            .map(|b| b.high.max(b.close))
            .fold(f64::MIN, f64::max);
        let year_low = usable
            .iter()
            .map(|b| if b.low > 0.0 { b.low.min(b.close) } else { b.close })
            .fold(f64::MAX, f64::min);

        Some(Self {
            last: last.close,
            previous_close: prev.close,
            year_high,
            year_low,
        })
    }
}

/// Optional company facts; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fundamentals {
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub analyst_target: Option<f64>,
    pub recommendation_key: Option<String>,
    pub earnings_date: Option<NaiveDate>,
    pub year_high: Option<f64>,
    pub year_low: Option<f64>,
}

/// Round to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `(last - prev) / prev * 100`, unrounded; 0 when `prev <= 0`
pub fn raw_percent_change(last: f64, previous_close: f64) -> f64 {
    if previous_close <= 0.0 {
        return 0.0;
    }
    (last - previous_close) * 100.0 / previous_close
}

/// [`raw_percent_change`] rounded to 2 decimals for display
pub fn percent_change(last: f64, previous_close: f64) -> f64 {
    round2(raw_percent_change(last, previous_close))
}

/// `(target / last - 1) * 100` when the target is positive, else 0
pub fn upside_percent(last: f64, target: Option<f64>) -> f64 {
    match target {
        Some(target) if target > 0.0 && last > 0.0 => (target / last - 1.0) * 100.0,
        _ => 0.0,
    }
}

/// `(last / year_low - 1) * 100` when the low is positive, else 0
pub fn distance_from_low(last: f64, year_low: f64) -> f64 {
    if year_low <= 0.0 {
        return 0.0;
    }
    (last / year_low - 1.0) * 100.0
}

/// Badge flags for a ticker, in display order
pub fn badges(
    percent_change: f64,
    last: f64,
    year_high: f64,
    earnings_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<BadgeFlag> {
    let mut flags = Vec::new();

    if percent_change.abs() >= HIGH_VOLATILITY_PCT {
        flags.push(BadgeFlag::HighVolatility);
    }
    if year_high > 0.0 && last >= NEAR_HIGH_RATIO * year_high {
        flags.push(BadgeFlag::NearYearHigh);
    }
    if let Some(date) = earnings_date {
        let days = (date - today).num_days();
        if (0..=EARNINGS_WINDOW_DAYS).contains(&days) {
            flags.push(BadgeFlag::EarningsSoon);
        }
    }

    flags
}

/// Combine price history with (possibly missing) fundamentals
///
/// The bar-derived 52-week range wins; the provider-reported range only
/// fills in when the bars could not produce one.
pub fn derive_metrics(
    history: &PriceHistory,
    fundamentals: Option<&Fundamentals>,
    today: NaiveDate,
) -> QuoteMetrics {
    let empty = Fundamentals::default();
    let f = fundamentals.unwrap_or(&empty);

    let year_high = if history.year_high > 0.0 {
        history.year_high
    } else {
        f.year_high.unwrap_or_default()
    };
    let year_low = if history.year_low > 0.0 && history.year_low < f64::MAX {
        history.year_low
    } else {
        f.year_low.unwrap_or_default()
    };

    let raw_pct = raw_percent_change(history.last, history.previous_close);

    QuoteMetrics {
        price: history.last,
        previous_close: history.previous_close,
        percent_change: round2(raw_pct),
        market_cap: f.market_cap,
        year_high,
        year_low,
        pe_ratio: f.pe_ratio,
        dividend_yield: f.dividend_yield,
        analyst_target: f.analyst_target,
        recommendation_key: f.recommendation_key.clone(),
        upside_percent: upside_percent(history.last, f.analyst_target),
        distance_from_low: distance_from_low(history.last, year_low),
        earnings_date: f.earnings_date,
        badges: badges(raw_pct, history.last, year_high, f.earnings_date, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(110.0, 100.0), 10.0);
        assert_eq!(percent_change(99.0, 100.0), -1.0);
        assert_eq!(percent_change(101.234, 100.0), 1.23);
        assert_eq!(percent_change(50.0, 0.0), 0.0);
        assert_eq!(percent_change(50.0, -1.0), 0.0);
    }

    #[test]
    fn test_upside_percent() {
        let upside = upside_percent(90.0, Some(100.0));
        assert!((upside - 11.111).abs() < 0.01);
        assert_eq!(upside_percent(90.0, Some(0.0)), 0.0);
        assert_eq!(upside_percent(90.0, None), 0.0);
    }

    #[test]
    fn test_distance_from_low() {
        assert!((distance_from_low(120.0, 100.0) - 20.0).abs() < 1e-9);
        assert_eq!(distance_from_low(120.0, 0.0), 0.0);
    }

    #[test]
    fn test_volatility_boundary_is_inclusive() {
        let today = day(2026, 3, 2);
        assert!(badges(3.5, 1.0, 100.0, None, today).contains(&BadgeFlag::HighVolatility));
        assert!(badges(-3.5, 1.0, 100.0, None, today).contains(&BadgeFlag::HighVolatility));
        assert!(!badges(3.4, 1.0, 100.0, None, today).contains(&BadgeFlag::HighVolatility));
        let pct = raw_percent_change(103.5, 100.0);
        assert!(badges(pct, 1.0, 100.0, None, today).contains(&BadgeFlag::HighVolatility));
    }

    #[test]
    fn test_volatility_uses_unrounded_change() {
        let history = PriceHistory {
            last: 103.496,
            previous_close: 100.0,
            year_high: 200.0,
            year_low: 50.0,
        };
        let metrics = derive_metrics(&history, None, day(2026, 3, 2));
        // Displays as 3.50 but the move is below the threshold
        assert_eq!(metrics.percent_change, 3.5);
        assert!(metrics.badges.is_empty());

        let history = PriceHistory {
            last: 96.5,
            ..history
        };
        let metrics = derive_metrics(&history, None, day(2026, 3, 2));
        assert_eq!(metrics.percent_change, -3.5);
        assert_eq!(metrics.badges, [BadgeFlag::HighVolatility]);
    }

    #[test]
    fn test_near_high() {
        let today = day(2026, 3, 2);
        assert!(badges(0.0, 98.0, 100.0, None, today).contains(&BadgeFlag::NearYearHigh));
        assert!(!badges(0.0, 97.9, 100.0, None, today).contains(&BadgeFlag::NearYearHigh));
        assert!(!badges(0.0, 10.0, 0.0, None, today).contains(&BadgeFlag::NearYearHigh));
    }

    #[test]
    fn test_earnings_window() {
        let today = day(2026, 3, 2);
        let soon = |d| badges(0.0, 1.0, 100.0, Some(d), today).contains(&BadgeFlag::EarningsSoon);
        assert!(soon(today));
        assert!(soon(day(2026, 3, 9)));
        assert!(!soon(day(2026, 3, 10)));
        assert!(!soon(day(2026, 3, 1)));
    }

    #[test]
    fn test_history_from_bars() {
        let bars = [
            DailyBar { high: 105.0, low: 95.0, close: 100.0 },
            DailyBar { high: 0.0, low: 0.0, close: 0.0 },
            DailyBar { high: 112.0, low: 99.0, close: 101.0 },
            DailyBar { high: 111.0, low: 108.0, close: 110.0 },
        ];
        let history = PriceHistory::from_bars(&bars).unwrap();
        assert_eq!(history.last, 110.0);
        assert_eq!(history.previous_close, 101.0);
        assert_eq!(history.year_high, 112.0);
        assert_eq!(history.year_low, 95.0);

        assert!(PriceHistory::from_bars(&bars[..1]).is_none());
    }

    #[test]
    fn test_derive_metrics_without_fundamentals() {
        let history = PriceHistory {
            last: 110.0,
            previous_close: 100.0,
            year_high: 111.0,
            year_low: 55.0,
        };
        let metrics = derive_metrics(&history, None, day(2026, 3, 2));
        assert_eq!(metrics.percent_change, 10.0);
        assert_eq!(metrics.upside_percent, 0.0);
        assert!((metrics.distance_from_low - 100.0).abs() < 1e-9);
        assert_eq!(metrics.market_cap, None);
        assert_eq!(
            metrics.badges,
            vec![BadgeFlag::HighVolatility, BadgeFlag::NearYearHigh]
        );
    }

    #[test]
    fn test_derive_metrics_with_fundamentals() {
        let history = PriceHistory {
            last: 90.0,
            previous_close: 90.0,
            year_high: 0.0,
            year_low: 0.0,
        };
        let fundamentals = Fundamentals {
            analyst_target: Some(100.0),
            market_cap: Some(3.1e12),
            year_high: Some(120.0),
            year_low: Some(60.0),
            earnings_date: Some(day(2026, 3, 5)),
            ..Fundamentals::default()
        };
        let metrics = derive_metrics(&history, Some(&fundamentals), day(2026, 3, 2));
        assert!((metrics.upside_percent - 11.11).abs() < 0.01);
        assert_eq!(metrics.year_high, 120.0);
        assert!((metrics.distance_from_low - 50.0).abs() < 1e-9);
        assert_eq!(metrics.badges, vec![BadgeFlag::EarningsSoon]);
    }
}
