use serde::{Deserialize, Serialize};

/// Translation used when the caller does not name one.
pub const DEFAULT_TRANSLATION: &str = "kjv";

/// Normalized scripture passage returned to clients.
///
/// `verses` is kept exactly as the provider sent it; the service never looks
/// inside the individual entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseRecord {
    pub reference: String,
    pub text: String,
    /// Human-readable translation label, e.g. "King James Version".
    pub translation: String,
    pub verses: Vec<serde_json::Value>,
}

/// Result of a keyword search. The scripture provider has no search endpoint,
/// so `results` is always empty and `supported` is always false.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub translation: String,
    pub results: Vec<VerseRecord>,
    pub supported: bool,
}

impl SearchResult {
    pub fn unsupported(query: &str, translation: &str) -> Self {
        Self {
            query: query.to_string(),
            translation: translation.to_string(),
            results: Vec::new(),
            supported: false,
        }
    }
}

/// Pick the translation code to send upstream.
pub fn translation_or_default(translation: Option<&str>) -> &str {
    match translation.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => DEFAULT_TRANSLATION,
    }
}
