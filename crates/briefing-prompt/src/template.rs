//! Core prompt template trait

use crate::{Language, PromptError, Result};

/// Core trait for prompt templates
///
/// Variables are passed as `serde_json::Value` so the trait stays
/// dyn-compatible and templates can live in a registry.
pub trait PromptTemplate: Send + Sync {
    /// Template name/identifier
    fn name(&self) -> &str;

    /// Languages this template has a variant for
    fn languages(&self) -> Vec<Language>;

    /// Check if a language is supported
    fn supports_language(&self, lang: &Language) -> bool {
        self.languages().contains(lang)
    }

    /// Render the variant for `lang`
    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String>;

    /// Render with fallback: requested language, then English, then the
    /// first available variant
    fn render_with_fallback(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        if self.supports_language(lang) {
            return self.render(lang, vars);
        }

        if self.supports_language(&Language::English) {
            return self.render(&Language::English, vars);
        }

        let fallback = self
            .languages()
            .into_iter()
            .next()
            .ok_or_else(|| PromptError::NoLanguageAvailable(self.name().to_string()))?;

        self.render(&fallback, vars)
    }

    /// Raw template source for a language
    fn raw_template(&self, lang: &Language) -> Option<&str>;
}
