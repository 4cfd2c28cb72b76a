//! Sonship-themed commentary generation.
//!
//! Every call sends the same system framing and one of three user prompt
//! templates. Provider errors, empty completions and timeouts all collapse
//! into [`GenerationError`]; nothing is retried.

use crate::models::{GenerationKind, GenerationRequest};
use crate::services::metrics;
use crate::services::providers::{FinishReason, GenerationParams, ProviderError, TextProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Sampling temperature shared by all templates.
pub const TEMPERATURE: f32 = 0.7;

/// System instruction sent with every generation call.
pub const SONSHIP_FRAMING: &str = r#"You are a Bible study assistant specializing in sonship theology. Sonship theology emphasizes the believer's identity as an adopted child of God with full inheritance rights and intimate relationship with the Father.

Key theological themes to emphasize:
1. ADOPTION: Believers are adopted into God's family (Romans 8:15, Galatians 4:5, Ephesians 1:5)
2. INHERITANCE: Co-heirs with Christ, receiving all the promises (Romans 8:17, Galatians 4:7)
3. INTIMACY: Abba, Father relationship - deep personal connection with God (Romans 8:15, Galatians 4:6)
4. IDENTITY: Who we are in Christ as children of God, not what we do
5. FREEDOM: From law, fear, condemnation, and orphan mindset (Galatians 4:7, Romans 8:1-2)
6. SPIRIT OF ADOPTION: The Holy Spirit testifies that we are God's children (Romans 8:16)
7. MATURITY: Growing from children to mature sons who reflect the Father (Ephesians 4:13-15)
8. CONTRAST: Spirit of adoption vs. spirit of slavery/fear (Romans 8:15)

Key scripture passages on sonship:
- Romans 8:14-17 (Led by Spirit, Abba Father, co-heirs)
- Galatians 4:4-7 (Adoption, no longer slaves, heirs)
- Ephesians 1:3-6 (Predestined for adoption, accepted in the Beloved)
- 1 John 3:1-2 (Behold what manner of love, we are children of God)
- John 1:12 (Right to become children of God)

When analyzing scripture:
- Always look for sonship themes and connections
- Explain how the passage relates to the believer's identity as God's child
- Show practical implications for living as a son/daughter of God
- Be encouraging and faith-building
- Maintain theological accuracy and biblical fidelity
- Use accessible language that helps people understand deep truths"#;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("provider returned no content")]
    EmptyResponse,

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

impl GenerationError {
    fn kind(&self) -> &'static str {
        match self {
            GenerationError::Provider(e) => e.kind(),
            GenerationError::EmptyResponse => "empty_response",
            GenerationError::Timeout(_) => "timeout",
        }
    }
}

/// Output cap for each template.
pub fn max_tokens(kind: GenerationKind) -> u32 {
    match kind {
        GenerationKind::Analyze => 500,
        GenerationKind::Ask => 400,
        GenerationKind::Study => 600,
    }
}

/// Render the user prompt for a request.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let subject = request.subject.as_deref().unwrap_or_default();

    match request.kind {
        GenerationKind::Analyze => format!(
            "Analyze the following scripture passage through the lens of sonship theology:\n\n\
             Reference: {reference}\n\
             Text: {text}\n\n\
             Provide a thoughtful analysis that:\n\
             1. Identifies any direct or indirect sonship themes in the passage\n\
             2. Explains how this passage relates to our identity as God's children\n\
             3. Shows practical implications for living as sons/daughters of God\n\
             4. Connects to other key sonship passages if relevant\n\
             5. Provides encouraging, faith-building insights\n\n\
             Keep the response clear, accessible, and around 200-300 words.",
            reference = request.reference,
            text = request.referenced_text,
        ),
        GenerationKind::Ask => format!(
            "Scripture Reference: {reference}\n\
             Scripture Text: {text}\n\n\
             User's Question: {question}\n\n\
             Answer the question from a sonship theology perspective. Be clear, biblical, \
             and encouraging. Keep the response concise (150-250 words).",
            reference = request.reference,
            text = request.referenced_text,
            question = subject,
        ),
        GenerationKind::Study => format!(
            "Create a brief Bible study guide on the sonship topic: \"{topic}\"\n\n\
             Include:\n\
             1. A short introduction to the topic (2-3 sentences)\n\
             2. 3-5 key scripture passages to study\n\
             3. Key insights and questions for reflection\n\
             4. Practical application for daily life\n\n\
             Keep it concise and actionable (300-400 words).",
            topic = subject,
        ),
    }
}

/// Wraps a [`TextProvider`] with the sonship framing and a bounded wait.
pub struct CommentaryGenerator {
    provider: Arc<dyn TextProvider>,
    timeout: Duration,
}

impl CommentaryGenerator {
    pub fn new(provider: Arc<dyn TextProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Generate commentary text for one request.
    #[tracing::instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let prompt = build_prompt(request);
        let params = GenerationParams {
            temperature: Some(TEMPERATURE),
            max_tokens: Some(max_tokens(request.kind)),
        };

        let start = Instant::now();
        let result = self.call_provider(&prompt, &params).await;
        let elapsed = start.elapsed().as_secs_f64();

        metrics::record_upstream_latency("llm", request.kind.as_str(), elapsed);

        match &result {
            Ok(text) => tracing::info!(
                provider = self.provider.name(),
                model = self.provider.model(),
                output_len = text.len(),
                elapsed_secs = elapsed,
                "Commentary generated"
            ),
            Err(e) => {
                metrics::record_upstream_error("llm", e.kind());
                tracing::error!(
                    provider = self.provider.name(),
                    error = %e,
                    "Commentary generation failed"
                );
            }
        }

        result
    }

    async fn call_provider(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        let response = tokio::time::timeout(
            self.timeout,
            self.provider.complete(SONSHIP_FRAMING, prompt, params),
        )
        .await
        .map_err(|_| GenerationError::Timeout(self.timeout))??;

        metrics::record_tokens(
            self.provider.model(),
            response.input_tokens,
            response.output_tokens,
        );

        if response.finish_reason == FinishReason::Length {
            tracing::warn!(
                provider = self.provider.name(),
                max_tokens = ?params.max_tokens,
                output_tokens = response.output_tokens,
                "Completion truncated at the token cap"
            );
        }

        response
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;

    fn generator(provider: Arc<MockTextProvider>) -> CommentaryGenerator {
        CommentaryGenerator::new(provider, Duration::from_secs(5))
    }

    #[test]
    fn framing_names_all_themes_and_anchor_passages() {
        for theme in [
            "ADOPTION",
            "INHERITANCE",
            "INTIMACY",
            "IDENTITY",
            "FREEDOM",
            "SPIRIT OF ADOPTION",
            "MATURITY",
            "CONTRAST",
        ] {
            assert!(SONSHIP_FRAMING.contains(theme), "missing theme {}", theme);
        }
        for passage in [
            "Romans 8:14-17",
            "Galatians 4:4-7",
            "Ephesians 1:3-6",
            "1 John 3:1-2",
            "John 1:12",
        ] {
            assert!(SONSHIP_FRAMING.contains(passage), "missing passage {}", passage);
        }
    }

    #[test]
    fn analyze_prompt_carries_reference_and_text() {
        let prompt = build_prompt(&GenerationRequest::analyze("Romans 8:15", "Abba, Father"));
        assert!(prompt.contains("Reference: Romans 8:15"));
        assert!(prompt.contains("Text: Abba, Father"));
        assert!(prompt.contains("200-300 words"));
    }

    #[test]
    fn ask_prompt_carries_question() {
        let prompt = build_prompt(&GenerationRequest::ask(
            "Romans 8:15",
            "Abba, Father",
            "What does Abba mean?",
        ));
        assert!(prompt.contains("Scripture Reference: Romans 8:15"));
        assert!(prompt.contains("User's Question: What does Abba mean?"));
        assert!(prompt.contains("150-250 words"));
    }

    #[test]
    fn study_prompt_is_topical() {
        let prompt = build_prompt(&GenerationRequest::study("inheritance"));
        assert!(prompt.contains("sonship topic: \"inheritance\""));
        assert!(prompt.contains("3-5 key scripture passages"));
        assert!(!prompt.contains("Reference:"));
    }

    #[test]
    fn token_caps_per_kind() {
        assert_eq!(max_tokens(GenerationKind::Analyze), 500);
        assert_eq!(max_tokens(GenerationKind::Ask), 400);
        assert_eq!(max_tokens(GenerationKind::Study), 600);
    }

    #[tokio::test]
    async fn sends_framing_as_system_with_kind_params() {
        let provider = Arc::new(MockTextProvider::new(true));
        let text = generator(provider.clone())
            .generate(&GenerationRequest::study("adoption"))
            .await
            .unwrap();

        assert!(!text.is_empty());
        let call = provider.last_call().unwrap();
        assert_eq!(call.system, SONSHIP_FRAMING);
        assert_eq!(call.params.temperature, Some(0.7));
        assert_eq!(call.params.max_tokens, Some(600));
    }

    #[tokio::test]
    async fn provider_error_is_generation_failure() {
        let provider = Arc::new(MockTextProvider::new(false));
        let result = generator(provider)
            .generate(&GenerationRequest::analyze("John 1:12", "text"))
            .await;
        assert!(matches!(result, Err(GenerationError::Provider(_))));
    }

    #[tokio::test]
    async fn blank_completion_is_generation_failure() {
        let provider = Arc::new(MockTextProvider::new(true).with_reply("   "));
        let result = generator(provider)
            .generate(&GenerationRequest::analyze("John 1:12", "text"))
            .await;
        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider =
            Arc::new(MockTextProvider::new(true).with_delay(Duration::from_millis(200)));
        let generator = CommentaryGenerator::new(provider, Duration::from_millis(20));

        let result = generator
            .generate(&GenerationRequest::study("identity"))
            .await;
        assert!(matches!(result, Err(GenerationError::Timeout(_))));
    }

    #[tokio::test]
    async fn truncated_completion_is_still_returned() {
        let provider = Arc::new(
            MockTextProvider::new(true)
                .with_reply("Adoption means the believer")
                .with_finish_reason(FinishReason::Length),
        );
        let text = generator(provider)
            .generate(&GenerationRequest::analyze("Romans 8:15", "Spirit of adoption"))
            .await
            .unwrap();
        assert_eq!(text, "Adoption means the believer");
    }
}
