//! Mock provider implementation for development and tests.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A completion call as the mock saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub params: GenerationParams,
}

/// Mock text provider that echoes the prompt back.
pub struct MockTextProvider {
    enabled: bool,
    delay: Duration,
    reply: Option<String>,
    finish_reason: FinishReason,
    call_count: AtomicU64,
    last_call: Mutex<Option<RecordedCall>>,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            delay: Duration::ZERO,
            reply: None,
            finish_reason: FinishReason::Complete,
            call_count: AtomicU64::new(0),
            last_call: Mutex::new(None),
        }
    }

    /// Sleep before answering, to exercise generation timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answer with fixed text instead of echoing the prompt. An empty string
    /// simulates a provider that returns no content.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    /// Report a different finish reason, e.g. `Length` for a truncated reply.
    pub fn with_finish_reason(mut self, finish_reason: FinishReason) -> Self {
        self.finish_reason = finish_reason;
        self
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last_call.lock().ok().and_then(|call| call.clone())
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_call.lock() {
            *last = Some(RecordedCall {
                system: system.to_string(),
                prompt: prompt.to_string(),
                params: params.clone(),
            });
        }

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let text = self
            .reply
            .clone()
            .unwrap_or_else(|| format!("Mock response for: {}", prompt.trim()));

        tracing::info!(prompt_len = prompt.len(), "[MOCK] Completion generated");

        Ok(ProviderResponse {
            input_tokens: (system.len() + prompt.len()) as u32 / 4,
            output_tokens: text.len() as u32 / 4,
            text: Some(text),
            finish_reason: self.finish_reason,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }
}
