use crate::dtos::{ChapterQuery, SearchQuery, VerseQuery};
use crate::handlers::query_params;
use crate::models::{SearchResult, VerseRecord};
use crate::startup::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

/// `GET /verse?reference=John 3:16&translation=kjv`
#[tracing::instrument(skip(state, query))]
pub async fn get_verse(
    State(state): State<AppState>,
    query: Result<Query<VerseQuery>, QueryRejection>,
) -> Result<Json<VerseRecord>, AppError> {
    let params = query_params(query)?;
    params.validate()?;

    let record = state
        .orchestrator
        .get_verse(params.reference.as_deref(), params.translation.as_deref())
        .await?;

    Ok(Json(record))
}

/// `GET /chapter?book=Romans&chapter=8&translation=kjv`
#[tracing::instrument(skip(state, query))]
pub async fn get_chapter(
    State(state): State<AppState>,
    query: Result<Query<ChapterQuery>, QueryRejection>,
) -> Result<Json<VerseRecord>, AppError> {
    let params = query_params(query)?;
    params.validate()?;

    let record = state
        .orchestrator
        .get_chapter(
            params.book.as_deref(),
            params.chapter.as_deref(),
            params.translation.as_deref(),
        )
        .await?;

    Ok(Json(record))
}

/// `GET /search?query=adoption`. Always empty; the provider cannot search.
#[tracing::instrument(skip(state, query))]
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResult>, AppError> {
    let params = query_params(query)?;
    params.validate()?;

    let result = state
        .orchestrator
        .search(params.query.as_deref(), params.translation.as_deref())?;

    Ok(Json(result))
}
