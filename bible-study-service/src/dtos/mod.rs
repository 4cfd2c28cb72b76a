//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};
use validator::Validate;

// Length caps keep the prompts sent upstream bounded.

#[derive(Debug, Default, Deserialize, Validate)]
pub struct VerseQuery {
    #[validate(length(max = 200, message = "reference is too long"))]
    pub reference: Option<String>,
    #[validate(length(max = 16, message = "translation is too long"))]
    pub translation: Option<String>,
}

/// `chapter` stays a string so a non-numeric value gets its own message.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ChapterQuery {
    #[validate(length(max = 200, message = "book is too long"))]
    pub book: Option<String>,
    pub chapter: Option<String>,
    #[validate(length(max = 16, message = "translation is too long"))]
    pub translation: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(max = 200, message = "query is too long"))]
    pub query: Option<String>,
    #[validate(length(max = 16, message = "translation is too long"))]
    pub translation: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct StudyQuery {
    #[validate(length(max = 200, message = "topic is too long"))]
    pub topic: Option<String>,
}

/// Body of `POST /analyze`. Either `text` or a resolvable `reference` is needed.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(max = 200, message = "reference is too long"))]
    pub reference: Option<String>,
    #[validate(length(max = 20000, message = "text is too long"))]
    pub text: Option<String>,
    #[validate(length(max = 16, message = "translation is too long"))]
    pub translation: Option<String>,
}

/// Body of `POST /ask`.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(max = 200, message = "reference is too long"))]
    pub reference: Option<String>,
    #[validate(length(max = 20000, message = "text is too long"))]
    pub text: Option<String>,
    #[validate(length(max = 2000, message = "question is too long"))]
    pub question: Option<String>,
    #[validate(length(max = 16, message = "translation is too long"))]
    pub translation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub reference: String,
    pub text: String,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResponse {
    pub reference: String,
    pub text: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyGuideResponse {
    pub topic: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}
