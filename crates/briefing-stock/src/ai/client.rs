//! Rate-gated, retried access to the text provider

use crate::rate_gate::RateGate;
use briefing_llm::{CompletionRequest, LLMProvider, Message, Result, RetryPolicy};
use std::sync::Arc;
use tracing::debug;

/// Default completion budget per call
pub const DEFAULT_MAX_TOKENS: usize = 1024;

/// Provider handle shared by the AI stages
#[derive(Clone)]
pub struct AiClient {
    provider: Arc<dyn LLMProvider>,
    model: String,
    gate: RateGate,
    retry: RetryPolicy,
    max_tokens: usize,
}

impl AiClient {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            gate: RateGate::unlimited("ai"),
            retry: RetryPolicy::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_gate(mut self, gate: RateGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send one prompt and return the reply text
    ///
    /// Every attempt, retries included, first passes the rate gate.
    pub async fn complete(&self, operation: &str, system: &str, prompt: &str) -> Result<String> {
        let request = CompletionRequest::builder(self.model.clone())
            .system(system)
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .temperature(0.2)
            .build();

        let response = self
            .retry
            .execute(operation, || {
                let request = request.clone();
                async move {
                    self.gate.wait().await;
                    self.provider.complete(request).await
                }
            })
            .await?;

        debug!(
            operation,
            tokens = response.usage.total(),
            stop_reason = ?response.stop_reason,
            "completion finished"
        );
        Ok(response.text().trim().to_string())
    }
}

impl std::fmt::Debug for AiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("gate", &self.gate)
            .field("max_attempts", &self.retry.max_attempts)
            .finish_non_exhaustive()
    }
}
