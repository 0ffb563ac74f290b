//! Report rendering
//!
//! Renderers are pure: the same sections, overview and timestamp always
//! produce the same body.

mod html;
pub mod labels;
mod text;

pub use html::HtmlRenderer;
pub use text::TextRenderer;

use crate::error::Result;
use crate::model::{MarketOverview, ReportFormat, ReportSection};
use briefing_prompt::Language;
use chrono::{DateTime, Local};

/// Colour for rising prices
pub const UP_COLOR: &str = "#e74c3c";
/// Colour for flat or falling prices
pub const DOWN_COLOR: &str = "#2980b9";

pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;

    /// Mail subject for a report over `count` tickers
    fn subject(&self, count: usize, generated_at: DateTime<Local>) -> String;

    fn render(
        &self,
        sections: &[ReportSection],
        overview: Option<&MarketOverview>,
        generated_at: DateTime<Local>,
    ) -> Result<String>;
}

pub struct RendererFactory;

impl RendererFactory {
    pub fn create(format: ReportFormat, language: Language) -> Result<Box<dyn ReportRenderer>> {
        Ok(match format {
            ReportFormat::Html => Box::new(HtmlRenderer::new(language)?),
            ReportFormat::Text => Box::new(TextRenderer::new(language)),
        })
    }
}

/// Digits grouped by thousands with two decimals, e.g. `1,234.50`
pub fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Percentage with an explicit `+` on positive values
pub fn signed_percent(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Red for a rise, blue otherwise
pub fn change_color(percent_change: f64) -> &'static str {
    if percent_change > 0.0 { UP_COLOR } else { DOWN_COLOR }
}

pub fn format_price(value: f64) -> String {
    format!("${}", group_thousands(value))
}

/// Market cap in trillions of dollars
pub fn format_market_cap(cap: f64, language: &Language) -> String {
    let trillions = cap / 1_000_000_000_000.0;
    match language {
        Language::Korean => format!("약 {trillions:.2}조 달러"),
        _ => format!("${trillions:.2}T"),
    }
}

/// Timestamp shown in the report header
pub fn format_issued_at(generated_at: DateTime<Local>) -> String {
    generated_at.format("%Y-%m-%d %H:%M").to_string()
}
