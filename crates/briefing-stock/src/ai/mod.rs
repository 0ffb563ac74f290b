//! AI stages: summaries, translation and trending tickers
//!
//! Every stage degrades to a deterministic result when the provider fails
//! or replies outside the expected schema.

mod client;
mod hot_tickers;
pub mod parse;
mod summarizer;
mod translator;

pub use client::{AiClient, DEFAULT_MAX_TOKENS};
pub use hot_tickers::{HEADLINE_LIMIT, HeadlineSource, HotTickerDiscovery};
pub use summarizer::{Summarizer, fallback_summary};
pub use translator::Translator;

#[cfg(test)]
pub(crate) mod testing {
    use super::AiClient;
    use async_trait::async_trait;
    use briefing_llm::{
        CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, RetryPolicy,
        StopReason, TokenUsage,
    };
    use briefing_prompt::PromptRegistry;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Provider replaying canned replies, or failing every call
    pub struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        failure: Option<fn() -> LLMError>,
        calls: AtomicU32,
        last_prompt: Mutex<String>,
    }

    impl ScriptedProvider {
        pub fn replies<I, S>(replies: I) -> Arc<Self>
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
                failure: None,
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(String::new()),
            })
        }

        pub fn failing(failure: fn() -> LLMError) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(VecDeque::new()),
                failure: Some(failure),
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(String::new()),
            })
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> String {
            self.last_prompt.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> briefing_llm::Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = request.user_text();

            if let Some(failure) = self.failure {
                return Err(failure());
            }
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LLMError::ProviderError("script exhausted".to_string()))?;

            Ok(CompletionResponse {
                message: Message::assistant(reply),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    pub fn client(provider: Arc<ScriptedProvider>) -> AiClient {
        AiClient::new(provider, "test-model").with_retry(RetryPolicy::fast())
    }

    pub fn prompts() -> Arc<PromptRegistry> {
        let registry = PromptRegistry::new();
        crate::prompts::register_prompts(&registry).unwrap();
        Arc::new(registry)
    }
}
