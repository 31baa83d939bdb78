use crate::{
    i18n::Language,
    intake::SelectedImage,
    page::{PageSnapshot, TransitionError},
    render::render_page,
    server::SharedState,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("{0}")]
    UnsupportedLanguage(String),
    #[error("Failed to render page")]
    Render(#[from] std::fmt::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Transition(TransitionError::InvalidUpload(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Transition(_) => StatusCode::CONFLICT,
            ApiError::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(_) => {
                tracing::error!("Failed to render page");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Deserialize, Debug)]
pub struct IndexQuery {
    lang: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ImageQuery {
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LanguageRequest {
    language: String,
}

#[derive(Deserialize, Debug)]
pub struct DragRequest {
    active: bool,
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<SharedState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, ApiError> {
    state.metrics.record_request("/");

    // `?lang=` only affects this response; `PUT /api/language` switches the page.
    let snapshot = match query.lang {
        Some(lang) => {
            let language = Language::try_from(lang).map_err(ApiError::UnsupportedLanguage)?;
            state.page.snapshot_in(language).await
        }
        None => state.page.snapshot().await,
    };

    Ok(Html(render_page(&snapshot)?))
}

#[instrument(skip(state))]
pub async fn get_state(State(state): State<SharedState>) -> Json<PageSnapshot> {
    state.metrics.record_request("/api/state");
    Json(state.page.snapshot().await)
}

#[instrument(skip(state, headers, body), fields(size = body.len()))]
pub async fn put_image(
    State(state): State<SharedState>,
    Query(query): Query<ImageQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PageSnapshot>, ApiError> {
    state.metrics.record_request("/api/image");

    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_lowercase())
        .unwrap_or_default();

    let mut candidate = SelectedImage::new(body, mime_type);
    if let Some(name) = query.name.filter(|name| !name.is_empty()) {
        candidate = candidate.with_file_name(name);
    }

    let snapshot = state.page.select_image(candidate).await?;
    Ok(Json(snapshot))
}

#[instrument(skip(state))]
pub async fn delete_image(State(state): State<SharedState>) -> Result<Json<PageSnapshot>, ApiError> {
    state.metrics.record_request("/api/image");
    Ok(Json(state.page.clear_image().await?))
}

#[instrument(skip(state))]
pub async fn put_drag(
    State(state): State<SharedState>,
    Json(request): Json<DragRequest>,
) -> Json<PageSnapshot> {
    let snapshot = if request.active {
        state.page.drag_over().await
    } else {
        state.page.drag_leave().await
    };
    Json(snapshot)
}

#[instrument(skip(state))]
pub async fn post_analyze(State(state): State<SharedState>) -> Result<Json<PageSnapshot>, ApiError> {
    state.metrics.record_request("/api/analyze");

    let started = Instant::now();
    let snapshot = state.page.analyze().await?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let outcome = match (&snapshot.result, &snapshot.error) {
        (Some(result), _) => result.label.as_str(),
        (None, Some(error)) => error.kind.as_str(),
        (None, None) => "unknown",
    };
    state.metrics.record_prediction(outcome, elapsed_ms);

    Ok(Json(snapshot))
}

#[instrument(skip(state))]
pub async fn post_reset(State(state): State<SharedState>) -> Result<Json<PageSnapshot>, ApiError> {
    state.metrics.record_request("/api/reset");
    Ok(Json(state.page.reset().await?))
}

#[instrument(skip(state))]
pub async fn post_server_status(State(state): State<SharedState>) -> Json<PageSnapshot> {
    state.metrics.record_request("/api/server-status");
    state.page.check_server_status().await;
    Json(state.page.snapshot().await)
}

#[instrument(skip(state))]
pub async fn put_language(
    State(state): State<SharedState>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<PageSnapshot>, ApiError> {
    state.metrics.record_request("/api/language");
    let language = Language::try_from(request.language).map_err(ApiError::UnsupportedLanguage)?;
    Ok(Json(state.page.set_language(language).await))
}
