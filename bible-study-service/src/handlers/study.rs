use crate::dtos::{
    AnalysisResponse, AnalyzeRequest, AnswerResponse, AskRequest, StudyGuideResponse, StudyQuery,
};
use crate::handlers::{json_body, query_params};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

/// `POST /analyze` with `{reference?, text?, translation?}`.
#[tracing::instrument(skip(state, body))]
pub async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, AppError> {
    let request = json_body::<AnalyzeRequest>(&body)?;
    if let Some(request) = &request {
        request.validate()?;
    }

    let response = state.orchestrator.analyze(request).await?;
    Ok(Json(response))
}

/// `POST /ask` with `{reference?, text?, question, translation?}`.
#[tracing::instrument(skip(state, body))]
pub async fn ask(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnswerResponse>, AppError> {
    let request = json_body::<AskRequest>(&body)?;
    if let Some(request) = &request {
        request.validate()?;
    }

    let response = state.orchestrator.ask(request).await?;
    Ok(Json(response))
}

/// `GET /study?topic=adoption`
#[tracing::instrument(skip(state, query))]
pub async fn study_guide(
    State(state): State<AppState>,
    query: Result<Query<StudyQuery>, QueryRejection>,
) -> Result<Json<StudyGuideResponse>, AppError> {
    let params = query_params(query)?;
    params.validate()?;

    let response = state
        .orchestrator
        .study_guide(params.topic.as_deref())
        .await?;

    Ok(Json(response))
}
