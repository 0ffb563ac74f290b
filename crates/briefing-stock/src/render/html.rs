//! HTML quote report

use super::labels::{self, Labels};
use super::{
    ReportRenderer, change_color, format_issued_at, format_market_cap, format_price,
    group_thousands, signed_percent,
};
use crate::error::Result;
use crate::model::{
    EntryOrigin, MarketOverview, NewsSummary, QuoteMetrics, QuoteSnapshot, ReportFormat,
    ReportSection,
};
use briefing_prompt::Language;
use chrono::{DateTime, Local};
use minijinja::Environment;
use serde::Serialize;

const TEMPLATE_NAME: &str = "report.html";
const REPORT_TEMPLATE: &str = include_str!("../../templates/report.html");

/// Renders the report through an auto-escaping minijinja template
pub struct HtmlRenderer {
    env: Environment<'static>,
    language: Language,
}

impl HtmlRenderer {
    pub fn new(language: Language) -> Result<Self> {
        let mut env = Environment::new();
        // The .html name turns on HTML auto-escaping
        env.add_template(TEMPLATE_NAME, REPORT_TEMPLATE)?;
        Ok(Self { env, language })
    }
}

impl ReportRenderer for HtmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn subject(&self, count: usize, generated_at: DateTime<Local>) -> String {
        format!(
            "[{}] {}",
            generated_at.format("%m/%d"),
            labels::report_title(&self.language, count)
        )
    }

    fn render(
        &self,
        sections: &[ReportSection],
        overview: Option<&MarketOverview>,
        generated_at: DateTime<Local>,
    ) -> Result<String> {
        let labels = labels::labels(&self.language);
        let view = ReportView {
            lang: self.language.code(),
            title: labels::report_title(&self.language, sections.len()),
            issued_at: format_issued_at(generated_at),
            labels,
            overview: overview.map(|o| OverviewView::new(o, &self.language)),
            sections: sections
                .iter()
                .map(|s| SectionView::new(s, &self.language))
                .collect(),
        };

        let template = self.env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(&view)?)
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    lang: &'a str,
    title: String,
    issued_at: String,
    labels: &'static Labels,
    overview: Option<OverviewView>,
    sections: Vec<SectionView>,
}

#[derive(Serialize)]
struct OverviewView {
    rows: Vec<IndexView>,
    vix: Option<VixView>,
}

#[derive(Serialize)]
struct IndexView {
    label: String,
    price: String,
    change: String,
    color: &'static str,
}

#[derive(Serialize)]
struct VixView {
    value: String,
    band: &'static str,
    color: &'static str,
}

impl OverviewView {
    fn new(overview: &MarketOverview, language: &Language) -> Self {
        Self {
            rows: overview
                .indices
                .iter()
                .map(|row| IndexView {
                    label: row.label.clone(),
                    price: group_thousands(row.price),
                    change: signed_percent(row.percent_change),
                    color: change_color(row.percent_change),
                })
                .collect(),
            vix: overview.vix.map(|vix| VixView {
                value: format!("{:.2}", vix.value),
                band: vix.band.label(language),
                color: vix.band.color(),
            }),
        }
    }
}

#[derive(Serialize)]
struct SectionView {
    ticker: String,
    name: String,
    trending: bool,
    badges: Vec<BadgeView>,
    quote: Option<QuoteView>,
    unavailable: bool,
    news: Vec<LinkView>,
    summary: Option<SummaryView>,
}

#[derive(Serialize)]
struct BadgeView {
    symbol: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct LinkView {
    title: String,
    /// Only http(s) links become anchors
    href: Option<String>,
}

#[derive(Serialize)]
struct SummaryView {
    lines: Vec<String>,
    sentiment: Option<&'static str>,
    fallback: Option<String>,
}

#[derive(Serialize)]
struct QuoteView {
    price: String,
    change: String,
    color: &'static str,
    market_cap: Option<String>,
    pe_ratio: Option<String>,
    dividend_yield: Option<String>,
    target: Option<String>,
    upside: Option<String>,
    year_range: String,
    from_low: String,
    recommendation: Option<String>,
    earnings: Option<String>,
}

impl QuoteView {
    fn new(m: &QuoteMetrics, language: &Language) -> Self {
        Self {
            price: format_price(m.price),
            change: signed_percent(m.percent_change),
            color: change_color(m.percent_change),
            market_cap: m.market_cap.map(|cap| format_market_cap(cap, language)),
            pe_ratio: m.pe_ratio.map(|pe| format!("{pe:.2}")),
            dividend_yield: m.dividend_yield.map(|y| format!("{:.2}%", y * 100.0)),
            target: m.analyst_target.map(format_price),
            upside: m.analyst_target.map(|_| signed_percent(m.upside_percent)),
            year_range: format!("{} ~ {}", format_price(m.year_low), format_price(m.year_high)),
            from_low: signed_percent(m.distance_from_low),
            recommendation: m
                .recommendation_key
                .as_ref()
                .map(|k| k.replace('_', " ").to_uppercase()),
            earnings: m.earnings_date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl SectionView {
    fn new(section: &ReportSection, language: &Language) -> Self {
        let (quote, unavailable) = match &section.snapshot {
            Some(QuoteSnapshot::Available(m)) => (Some(QuoteView::new(m, language)), false),
            Some(QuoteSnapshot::Unavailable { .. }) => (None, true),
            None => (None, false),
        };

        Self {
            ticker: section.entry.ticker.clone(),
            name: section.entry.display_name.clone(),
            trending: section.entry.origin == EntryOrigin::Trending,
            badges: section
                .flags()
                .iter()
                .map(|flag| BadgeView {
                    symbol: flag.symbol(),
                    label: flag.label(language),
                })
                .collect(),
            quote,
            unavailable,
            news: section
                .news
                .iter()
                .map(|item| LinkView {
                    title: item.title.clone(),
                    href: is_web_link(&item.link).then(|| item.link.clone()),
                })
                .collect(),
            summary: section.summary.as_ref().map(|summary| match summary {
                NewsSummary::Parsed { lines, sentiment } => SummaryView {
                    lines: lines.clone(),
                    sentiment: Some(sentiment.label(language)),
                    fallback: None,
                },
                NewsSummary::Fallback(text) => SummaryView {
                    lines: Vec::new(),
                    sentiment: None,
                    fallback: Some(text.clone()),
                },
            }),
        }
    }
}

fn is_web_link(link: &str) -> bool {
    let lower = link.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BadgeFlag, NewsItem, Sentiment, VixReading, WatchlistEntry};
    use crate::model::IndexRow;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap()
    }

    fn metrics(percent_change: f64) -> QuoteMetrics {
        QuoteMetrics {
            price: 110.0,
            previous_close: 100.0,
            percent_change,
            market_cap: Some(3.4e12),
            year_high: 112.0,
            year_low: 80.0,
            pe_ratio: Some(30.0),
            dividend_yield: Some(0.005),
            analyst_target: Some(121.0),
            recommendation_key: Some("strong_buy".to_string()),
            upside_percent: 10.0,
            distance_from_low: 37.5,
            earnings_date: None,
            badges: vec![BadgeFlag::HighVolatility],
        }
    }

    fn render(sections: &[ReportSection], overview: Option<&MarketOverview>) -> String {
        HtmlRenderer::new(Language::Korean)
            .unwrap()
            .render(sections, overview, at())
            .unwrap()
    }

    #[test]
    fn test_positive_change_is_red_with_plus() {
        let mut section = ReportSection::new(WatchlistEntry::new("애플", "AAPL"));
        section.snapshot = Some(QuoteSnapshot::Available(metrics(10.0)));
        let html = render(&[section], None);

        assert!(html.contains("#e74c3c"));
        assert!(html.contains("+10.00%"));
        assert!(html.contains("약 3.40조 달러"));
        assert!(html.contains("🔥"));
        assert!(html.contains("발행일시: 2026-03-02 08:30"));
    }

    #[test]
    fn test_negative_change_is_blue() {
        let mut section = ReportSection::new(WatchlistEntry::new("테슬라", "TSLA"));
        section.snapshot = Some(QuoteSnapshot::Available(metrics(-1.5)));
        let html = render(&[section], None);

        assert!(html.contains("#2980b9"));
        assert!(html.contains("-1.50%"));
        assert!(!html.contains("+-1.50%"));
    }

    #[test]
    fn test_unavailable_and_no_news_placeholders() {
        let mut section = ReportSection::new(WatchlistEntry::new("팔란티어", "PLTR"));
        section.snapshot = Some(QuoteSnapshot::unavailable("timeout"));
        let html = render(&[section], None);

        assert!(html.contains("PLTR"));
        assert!(html.contains("시세 정보를 가져오지 못했습니다."));
        assert!(html.contains("<li style=\"color:#bbb;\">관련 뉴스가 없습니다.</li>"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let mut section = ReportSection::new(WatchlistEntry::new("애플", "AAPL"));
        section.news = vec![
            NewsItem::new("<script>alert('x')</script> & more", "https://a.example/?q=1&r=2"),
            NewsItem::new("링크 없음", "javascript:alert(1)"),
        ];
        let html = render(&[section], None);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_summary_and_fallback() {
        let mut parsed = ReportSection::new(WatchlistEntry::new("애플", "AAPL"));
        parsed.news = vec![NewsItem::new("뉴스", "https://a.example")];
        parsed.summary = Some(NewsSummary::Parsed {
            lines: vec!["첫째 요약".into(), "둘째 요약".into(), "셋째 요약".into()],
            sentiment: Sentiment::Positive,
        });
        let mut fallback = ReportSection::new(WatchlistEntry::new("메타", "META"));
        fallback.news = vec![NewsItem::new("뉴스", "https://b.example")];
        fallback.summary = Some(NewsSummary::Fallback("⚠️ 대체 문구\n- 뉴스".to_string()));

        let html = render(&[parsed, fallback], None);
        assert!(html.contains("셋째 요약"));
        assert!(html.contains("긍정"));
        assert!(html.contains("⚠️ 대체 문구\n- 뉴스"));
    }

    #[test]
    fn test_overview() {
        let overview = MarketOverview {
            indices: vec![IndexRow {
                label: "S&P 500".to_string(),
                symbol: "^GSPC".to_string(),
                price: 5123.456,
                percent_change: 0.5,
            }],
            vix: Some(VixReading::new(31.2)),
        };
        let html = render(&[], Some(&overview));

        assert!(html.contains("S&amp;P 500"));
        assert!(html.contains("5,123.46"));
        assert!(html.contains("공포"));
        assert!(html.contains("월스트리트 0대 우량주 리포트"));
    }

    #[test]
    fn test_subject() {
        let renderer = HtmlRenderer::new(Language::Korean).unwrap();
        assert_eq!(renderer.subject(16, at()), "[03/02] 📉 월스트리트 16대 우량주 리포트");
    }
}
