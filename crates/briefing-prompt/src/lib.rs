//! Prompt template management for stock-briefing
//!
//! Prompts sent to the generative-text provider are kept as Jinja2 templates
//! with a Korean and an English variant. A [`PromptRegistry`] holds them by
//! name and renders them for the run's report language.
//!
//! ```
//! use briefing_prompt::{JinjaTemplate, Language, PromptRegistry};
//! use serde_json::json;
//!
//! let registry = PromptRegistry::with_language(Language::Korean);
//! registry.register(
//!     JinjaTemplate::bilingual("intro", "{{ symbol }} 분석", "Analysis of {{ symbol }}").unwrap(),
//! );
//!
//! let prompt = registry.render("intro", &json!({ "symbol": "AAPL" })).unwrap();
//! assert_eq!(prompt, "AAPL 분석");
//! ```

mod error;
mod jinja;
mod language;
mod registry;
mod template;

pub use error::{PromptError, Result};
pub use jinja::{JinjaTemplate, JinjaTemplateBuilder};
pub use language::Language;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
