//! Headline translation

use super::AiClient;
use super::parse::parse_numbered_lines;
use crate::model::NewsItem;
use crate::prompts::{ANALYST_SYSTEM, TRANSLATE_TITLES};
use briefing_prompt::{Language, PromptRegistry};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Translates titles into the report language, keeping originals on failure
pub struct Translator {
    client: AiClient,
    prompts: Arc<PromptRegistry>,
    target: Language,
}

impl Translator {
    pub fn new(client: AiClient, prompts: Arc<PromptRegistry>, target: Language) -> Self {
        Self {
            client,
            prompts,
            target,
        }
    }

    /// Translated titles in input order; the input itself on any failure
    pub async fn translate_titles(&self, titles: &[String]) -> Vec<String> {
        if titles.is_empty() {
            return Vec::new();
        }

        match self.try_translate(titles).await {
            Ok(translated) => {
                debug!(count = translated.len(), "titles translated");
                translated
            }
            Err(reason) => {
                warn!(%reason, "translation skipped, keeping original titles");
                titles.to_vec()
            }
        }
    }

    /// Replace item titles with their translations
    pub async fn translate_items(&self, items: Vec<NewsItem>) -> Vec<NewsItem> {
        let titles: Vec<String> = items.iter().map(|i| i.title.clone()).collect();
        let translated = self.translate_titles(&titles).await;

        items
            .into_iter()
            .zip(translated)
            .map(|(mut item, title)| {
                item.title = title;
                item
            })
            .collect()
    }

    async fn try_translate(&self, titles: &[String]) -> Result<Vec<String>, String> {
        let vars = json!({
            "count": titles.len(),
            "target": self.target.name(),
            "titles": titles,
        });
        let system = self
            .prompts
            .render_with_lang(ANALYST_SYSTEM, &self.target, &json!({}))
            .map_err(|e| e.to_string())?;
        let user = self
            .prompts
            .render_with_lang(TRANSLATE_TITLES, &self.target, &vars)
            .map_err(|e| e.to_string())?;

        let reply = self
            .client
            .complete("translate", &system, &user)
            .await
            .map_err(|e| e.to_string())?;

        parse_numbered_lines(&reply, titles.len()).map_err(|e| e.to_string())
    }
}
