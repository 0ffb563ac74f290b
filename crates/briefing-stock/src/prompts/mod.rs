//! Prompt templates for the AI stages
//!
//! - `system`: the analyst persona shared by every call
//! - `user`: per-stage requests, each ending in a strict reply schema that
//!   the parsers in [`crate::ai::parse`] check line by line

mod system;
mod user;

pub use system::*;
pub use user::*;

use briefing_prompt::{PromptRegistry, Result};

pub const ANALYST_SYSTEM: &str = "briefing.system.analyst";
pub const SUMMARIZE_NEWS: &str = "briefing.user.summarize";
pub const TRANSLATE_TITLES: &str = "briefing.user.translate";
pub const PICK_HOT_TICKERS: &str = "briefing.user.hot_tickers";

/// Register all briefing prompts with the given registry
pub fn register_prompts(registry: &PromptRegistry) -> Result<()> {
    registry.register(analyst()?);

    registry.register(summarize_news_prompt()?);
    registry.register(translate_titles_prompt()?);
    registry.register(hot_tickers_prompt()?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_prompt::Language;
    use serde_json::json;

    fn registry(language: Language) -> PromptRegistry {
        let registry = PromptRegistry::with_language(language);
        register_prompts(&registry).unwrap();
        registry
    }

    #[test]
    fn test_register_all_prompts() {
        let registry = registry(Language::Korean);
        assert_eq!(
            registry.list(),
            [ANALYST_SYSTEM, PICK_HOT_TICKERS, SUMMARIZE_NEWS, TRANSLATE_TITLES]
        );
    }

    #[test]
    fn test_summarize_prompt_lists_news() {
        let prompt = registry(Language::Korean)
            .render(
                SUMMARIZE_NEWS,
                &json!({
                    "ticker": "AAPL",
                    "name": "애플",
                    "news": [
                        { "title": "애플 신제품 공개", "description": "아이폰 발표" },
                        { "title": "애플 실적 호조", "description": null }
                    ]
                }),
            )
            .unwrap();

        assert!(prompt.contains("AAPL"));
        assert!(prompt.contains("- 애플 신제품 공개: 아이폰 발표"));
        assert!(prompt.contains("- 애플 실적 호조\n"));
        assert!(prompt.contains("SENTIMENT: positive|neutral|negative"));
    }

    #[test]
    fn test_translate_prompt_numbers_titles() {
        let prompt = registry(Language::Korean)
            .render(
                TRANSLATE_TITLES,
                &json!({ "count": 2, "target": "Korean", "titles": ["Fed holds rates", "Oil climbs"] }),
            )
            .unwrap();

        assert!(prompt.contains("1. Fed holds rates\n2. Oil climbs"));
    }

    #[test]
    fn test_english_variant() {
        let prompt = registry(Language::English)
            .render(PICK_HOT_TICKERS, &json!({ "headlines": ["Nvidia soars"] }))
            .unwrap();

        assert!(prompt.contains("TICKERS: "));
        assert!(prompt.contains("- Nvidia soars"));
    }
}
