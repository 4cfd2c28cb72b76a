//! Request fulfilment: validate inputs, resolve scripture when needed, call
//! the commentary generator, and shape the response.
//!
//! Analyze fails with 404 when it cannot fetch the passage, while Ask falls
//! through to its generic missing-fields error. Clients rely on both
//! behaviors, so they are kept as they are.

use crate::dtos::{
    AnalysisResponse, AnalyzeRequest, AnswerResponse, AskRequest, HealthResponse,
    StudyGuideResponse,
};
use crate::models::{translation_or_default, GenerationRequest, SearchResult, VerseRecord};
use crate::services::commentary::CommentaryGenerator;
use crate::services::scripture::ScriptureResolver;
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

pub const SERVICE_NAME: &str = "Bible Study API";

/// Client-facing failure of one operation. The message is returned verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StudyError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    GenerationFailed(String),
}

impl StudyError {
    fn validation(msg: &str) -> Self {
        StudyError::Validation(msg.to_string())
    }
}

impl From<StudyError> for AppError {
    fn from(err: StudyError) -> Self {
        match err {
            StudyError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            StudyError::NotFound(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
            StudyError::GenerationFailed(msg) => AppError::UpstreamFailure(msg),
        }
    }
}

/// An empty string counts as missing, like an absent field. Whitespace is a
/// value and goes upstream unchanged.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn present_ref(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Built once at startup and shared by every request.
pub struct StudyOrchestrator {
    resolver: Arc<dyn ScriptureResolver>,
    generator: CommentaryGenerator,
}

impl StudyOrchestrator {
    pub fn new(resolver: Arc<dyn ScriptureResolver>, generator: CommentaryGenerator) -> Self {
        Self {
            resolver,
            generator,
        }
    }

    pub async fn get_verse(
        &self,
        reference: Option<&str>,
        translation: Option<&str>,
    ) -> Result<VerseRecord, StudyError> {
        let reference = present_ref(reference)
            .ok_or_else(|| StudyError::validation("Reference parameter is required"))?;

        self.resolver
            .resolve(reference, translation_or_default(translation))
            .await
            .map_err(|_| {
                StudyError::NotFound("Could not fetch verse. Please check the reference.".into())
            })
    }

    pub async fn get_chapter(
        &self,
        book: Option<&str>,
        chapter: Option<&str>,
        translation: Option<&str>,
    ) -> Result<VerseRecord, StudyError> {
        let (Some(book), Some(chapter)) = (present_ref(book), present_ref(chapter)) else {
            return Err(StudyError::validation(
                "Book and chapter parameters are required",
            ));
        };

        // Any integer is accepted; the provider decides whether the chapter exists.
        let chapter: i64 = chapter
            .trim()
            .parse()
            .map_err(|_| StudyError::validation("Chapter must be a number"))?;

        self.resolver
            .resolve_chapter(book, chapter, translation_or_default(translation))
            .await
            .map_err(|_| {
                StudyError::NotFound("Could not fetch chapter. Please check the reference.".into())
            })
    }

    pub async fn analyze(
        &self,
        body: Option<AnalyzeRequest>,
    ) -> Result<AnalysisResponse, StudyError> {
        let body = body.ok_or_else(|| StudyError::validation("Request body is required"))?;

        let mut reference = present(body.reference);
        let mut text = present(body.text);

        if text.is_none() {
            if let Some(r) = &reference {
                let translation = translation_or_default(body.translation.as_deref());
                let record = self.resolver.resolve(r, translation).await.map_err(|_| {
                    StudyError::NotFound("Could not fetch verse for analysis".into())
                })?;
                text = present(Some(record.text));
                reference = present(Some(record.reference));
            }
        }

        let (Some(reference), Some(text)) = (reference, text) else {
            return Err(StudyError::validation("Reference and text are required"));
        };

        let analysis = self
            .generator
            .generate(&GenerationRequest::analyze(&reference, &text))
            .await
            .map_err(|_| StudyError::GenerationFailed("Could not generate analysis".into()))?;

        Ok(AnalysisResponse {
            reference,
            text,
            analysis,
        })
    }

    pub async fn ask(&self, body: Option<AskRequest>) -> Result<AnswerResponse, StudyError> {
        let body = body.ok_or_else(|| StudyError::validation("Request body is required"))?;

        let mut reference = present(body.reference);
        let mut text = present(body.text);
        let question = present(body.question);

        if text.is_none() {
            if let Some(r) = &reference {
                let translation = translation_or_default(body.translation.as_deref());
                // A failed lookup is not reported here; the field check below
                // turns it into a 400.
                if let Ok(record) = self.resolver.resolve(r, translation).await {
                    text = present(Some(record.text));
                    reference = present(Some(record.reference));
                }
            }
        }

        let (Some(reference), Some(text), Some(question)) = (reference, text, question) else {
            return Err(StudyError::validation(
                "Reference, text, and question are required",
            ));
        };

        let answer = self
            .generator
            .generate(&GenerationRequest::ask(&reference, &text, &question))
            .await
            .map_err(|_| StudyError::GenerationFailed("Could not generate answer".into()))?;

        Ok(AnswerResponse {
            reference,
            text,
            question,
            answer,
        })
    }

    pub async fn study_guide(&self, topic: Option<&str>) -> Result<StudyGuideResponse, StudyError> {
        let topic =
            present_ref(topic).ok_or_else(|| StudyError::validation("Topic parameter is required"))?;

        let content = self
            .generator
            .generate(&GenerationRequest::study(topic))
            .await
            .map_err(|_| StudyError::GenerationFailed("Could not generate study guide".into()))?;

        Ok(StudyGuideResponse {
            topic: topic.to_string(),
            content,
        })
    }

    pub fn search(
        &self,
        query: Option<&str>,
        translation: Option<&str>,
    ) -> Result<SearchResult, StudyError> {
        let query =
            present_ref(query).ok_or_else(|| StudyError::validation("Query parameter is required"))?;

        Ok(self
            .resolver
            .search(query, translation_or_default(translation)))
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy",
            service: SERVICE_NAME,
        }
    }
}
