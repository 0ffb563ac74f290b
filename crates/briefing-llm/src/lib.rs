//! Generative-text provider layer for stock-briefing
//!
//! This crate provides provider-agnostic abstractions for the text
//! completions the briefing uses to summarize, translate and pick tickers:
//!
//! - Message and completion request/response types
//! - The [`LLMProvider`] trait
//! - A [`RetryPolicy`] for transient provider failures
//! - Concrete providers (behind feature flags)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod retry;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
pub use retry::{Backoff, RetryPolicy};

// Provider implementations (feature-gated)
#[cfg(any(feature = "gemini", feature = "openai"))]
pub mod providers;
