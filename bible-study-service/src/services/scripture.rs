//! Scripture resolution against a bible-api.com compatible provider.
//!
//! A lookup is `GET {base_url}/{reference}?translation={code}`. Anything other
//! than a parseable 200 response is reported as [`ResolveError`], which the
//! orchestrator treats as "not found". No retries, no caching.

use crate::config::ScriptureApiConfig;
use crate::models::{translation_or_default, SearchResult, VerseRecord};
use crate::services::metrics;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::time::Instant;
use thiserror::Error;

/// Why a reference could not be resolved.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Reference is empty")]
    EmptyReference,

    #[error("Scripture provider returned status {0}")]
    Status(u16),

    #[error("Scripture provider unreachable: {0}")]
    Transport(String),

    #[error("Scripture provider response unreadable: {0}")]
    Parse(String),
}

impl ResolveError {
    fn kind(&self) -> &'static str {
        match self {
            ResolveError::EmptyReference => "empty_reference",
            ResolveError::Status(_) => "status",
            ResolveError::Transport(_) => "transport",
            ResolveError::Parse(_) => "parse",
        }
    }
}

/// Turns a reference string into verse text.
#[async_trait]
pub trait ScriptureResolver: Send + Sync {
    /// Look up `reference` in `translation` ("kjv" when empty).
    async fn resolve(&self, reference: &str, translation: &str)
        -> Result<VerseRecord, ResolveError>;

    /// Look up a whole chapter as `"{book} {chapter}"`.
    async fn resolve_chapter(
        &self,
        book: &str,
        chapter: i64,
        translation: &str,
    ) -> Result<VerseRecord, ResolveError> {
        let reference = format!("{} {}", book, chapter);
        self.resolve(&reference, translation).await
    }

    /// Keyword search. The provider has no search endpoint.
    fn search(&self, query: &str, translation: &str) -> SearchResult {
        SearchResult::unsupported(query, translation_or_default(Some(translation)))
    }
}

/// Resolver backed by bible-api.com.
pub struct BibleApiResolver {
    base_url: String,
    client: Client,
}

impl BibleApiResolver {
    pub fn new(config: &ScriptureApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch(&self, reference: &str, translation: &str) -> Result<VerseRecord, ResolveError> {
        if reference.trim().is_empty() {
            return Err(ResolveError::EmptyReference);
        }

        // The reference goes into the path as-is; reqwest percent-encodes spaces.
        let url = format!("{}/{}", self.base_url, reference.trim());

        let response = self
            .client
            .traced_get(&url)
            .query(&[("translation", translation)])
            .send()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ResolveError::Status(status.as_u16()));
        }

        let body: BibleApiResponse = response
            .json()
            .await
            .map_err(|e| ResolveError::Parse(e.to_string()))?;

        Ok(body.into_record(reference, translation))
    }
}

#[async_trait]
impl ScriptureResolver for BibleApiResolver {
    #[tracing::instrument(skip(self))]
    async fn resolve(
        &self,
        reference: &str,
        translation: &str,
    ) -> Result<VerseRecord, ResolveError> {
        let translation = translation_or_default(Some(translation));
        let start = Instant::now();

        let result = self.fetch(reference, translation).await;

        metrics::record_upstream_latency("scripture", "resolve", start.elapsed().as_secs_f64());
        if let Err(e) = &result {
            metrics::record_upstream_error("scripture", e.kind());
            tracing::warn!(error = %e, "Scripture lookup failed");
        }

        result
    }
}

/// bible-api.com payload. Fields beyond these are dropped.
#[derive(Debug, Deserialize)]
struct BibleApiResponse {
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    translation_name: Option<String>,
    #[serde(default)]
    verses: Option<Vec<serde_json::Value>>,
}

impl BibleApiResponse {
    /// Fill gaps with the caller's own inputs.
    fn into_record(self, reference: &str, translation: &str) -> VerseRecord {
        VerseRecord {
            reference: self.reference.unwrap_or_else(|| reference.to_string()),
            text: self.text.unwrap_or_default(),
            translation: self
                .translation_name
                .unwrap_or_else(|| translation.to_uppercase()),
            verses: self.verses.unwrap_or_default(),
        }
    }
}
