//! Plain-text digest

use super::labels::{self, Labels};
use super::{ReportRenderer, format_issued_at, format_price, group_thousands, signed_percent};
use crate::error::{BriefingError, Result};
use crate::model::{MarketOverview, NewsSummary, QuoteSnapshot, ReportFormat, ReportSection};
use briefing_prompt::Language;
use chrono::{DateTime, Local};
use comfy_table::{Table, presets};
use std::fmt::{self, Write};

/// Rule printed after every ticker block
pub const SECTION_RULE_WIDTH: usize = 40;

pub struct TextRenderer {
    language: Language,
}

impl TextRenderer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    fn quote_table(&self, sections: &[ReportSection], labels: &Labels) -> Option<String> {
        if sections.iter().all(|s| s.snapshot.is_none()) {
            return None;
        }

        let mut table = Table::new();
        table.load_preset(presets::ASCII_MARKDOWN).set_header(vec![
            labels.ticker,
            labels.price,
            labels.change,
            labels.upside,
        ]);

        for section in sections {
            let ticker = section.entry.ticker.clone();
            match &section.snapshot {
                Some(QuoteSnapshot::Available(m)) => {
                    let flags: String = m.badges.iter().map(|b| b.symbol()).collect();
                    table.add_row(vec![
                        format!("{ticker} {flags}").trim_end().to_string(),
                        format_price(m.price),
                        signed_percent(m.percent_change),
                        m.analyst_target.map_or_else(
                            || "-".to_string(),
                            |_| signed_percent(m.upside_percent),
                        ),
                    ]);
                }
                Some(QuoteSnapshot::Unavailable { .. }) => {
                    table.add_row(vec![ticker, "-".to_string(), "-".to_string(), "-".to_string()]);
                }
                None => {}
            }
        }

        Some(table.to_string())
    }

    fn write_overview(
        &self,
        out: &mut String,
        overview: &MarketOverview,
        labels: &Labels,
    ) -> fmt::Result {
        writeln!(out, "[{}]", labels.overview)?;
        for row in &overview.indices {
            writeln!(
                out,
                "{}: {} ({})",
                row.label,
                group_thousands(row.price),
                signed_percent(row.percent_change)
            )?;
        }
        if let Some(vix) = overview.vix {
            let band = vix.band.label(&self.language);
            writeln!(out, "{}: {:.2} ({band})", labels.vix, vix.value)?;
        }
        Ok(())
    }

    fn write_section_body(
        &self,
        out: &mut String,
        section: &ReportSection,
        labels: &Labels,
    ) -> fmt::Result {
        match &section.summary {
            Some(NewsSummary::Parsed { lines, sentiment }) => {
                for (i, line) in lines.iter().enumerate() {
                    writeln!(out, "{}. {line}", i + 1)?;
                }
                write!(out, "{}: {}", labels.sentiment, sentiment.label(&self.language))
            }
            Some(NewsSummary::Fallback(text)) => out.write_str(text),
            None if section.news.is_empty() => out.write_str(labels.quiet_news),
            None => {
                for (i, item) in section.news.iter().enumerate() {
                    if i > 0 {
                        out.write_char('\n')?;
                    }
                    write!(out, "- {}\n  {}", item.title, item.link)?;
                }
                Ok(())
            }
        }
    }

    fn write_digest(
        &self,
        out: &mut String,
        sections: &[ReportSection],
        overview: Option<&MarketOverview>,
        generated_at: DateTime<Local>,
    ) -> fmt::Result {
        let labels = labels::labels(&self.language);
        let rule = "=".repeat(SECTION_RULE_WIDTH);

        writeln!(out, "🌟 {} 🌟", labels::digest_title(&self.language))?;
        writeln!(out, "{}: {}\n", labels.issued, format_issued_at(generated_at))?;

        if let Some(overview) = overview {
            self.write_overview(out, overview, labels)?;
            out.write_char('\n')?;
        }
        if let Some(table) = self.quote_table(sections, labels) {
            write!(out, "{table}\n\n")?;
        }

        for section in sections {
            write!(out, "📊 [{} - {}]", section.entry.ticker, section.entry.display_name)?;
            if matches!(section.snapshot, Some(QuoteSnapshot::Unavailable { .. })) {
                write!(out, " ({})", labels.unavailable)?;
            }
            out.write_char('\n')?;
            self.write_section_body(out, section, labels)?;
            writeln!(out, "\n{rule}")?;
        }

        writeln!(out, "{}", labels.disclaimer)
    }
}

impl ReportRenderer for TextRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn subject(&self, _count: usize, generated_at: DateTime<Local>) -> String {
        format!(
            "[{}] {} 💰",
            generated_at.format("%Y-%m-%d"),
            labels::digest_title(&self.language)
        )
    }

    fn render(
        &self,
        sections: &[ReportSection],
        overview: Option<&MarketOverview>,
        generated_at: DateTime<Local>,
    ) -> Result<String> {
        let mut out = String::new();
        self.write_digest(&mut out, sections, overview, generated_at)
            .map_err(|e| BriefingError::RenderError(e.to_string()))?;
        Ok(out)
    }
}
