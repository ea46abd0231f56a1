// src/api.rs
use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::ingest::Ingestor;
use crate::model::{Article, Stored, UserInteraction, UserPreference};
use crate::personalize::{self, SummaryOnRead};
use crate::store::DynStore;
use crate::summarize::DynSummarizer;

#[derive(Clone)]
pub struct AppState {
    pub store: DynStore,
    pub summarizer: DynSummarizer,
    pub ingestor: Ingestor,
    pub summary_on_read: SummaryOnRead,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/fetch-news", get(fetch_news))
        .route("/v1/ingest", post(fetch_news))
        .route("/v1/news", get(get_news))
        .route("/v1/preference", post(set_preference))
        .route("/v1/track", post(track_interaction))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

pub enum ApiError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

/// Run ingestion now. Only the run as a whole is reported.
async fn fetch_news(State(state): State<AppState>) -> Response {
    match state.ingestor.run().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "manual ingestion failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "ingestion failed" })),
            )
                .into_response()
        }
    }
}

async fn get_news(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Stored<Article>>>, ApiError> {
    let user_id = q
        .get("user_id")
        .ok_or_else(|| ApiError::BadRequest("missing user_id".into()))?
        .trim()
        .parse::<u64>()
        .map_err(|_| ApiError::BadRequest("user_id must be a non-negative integer".into()))?;

    let news = personalize::news_for_user(
        state.store.as_ref(),
        state.summarizer.as_ref(),
        user_id,
        state.summary_on_read,
    )
    .await?;
    Ok(Json(news))
}

async fn set_preference(
    State(state): State<AppState>,
    Json(mut pref): Json<UserPreference>,
) -> Result<Json<Stored<UserPreference>>, ApiError> {
    pref.category = pref.category.trim().to_string();
    if pref.category.is_empty() {
        return Err(ApiError::BadRequest("category must not be empty".into()));
    }
    Ok(Json(state.store.create_preference(pref).await?))
}

async fn track_interaction(
    State(state): State<AppState>,
    Json(mut interaction): Json<UserInteraction>,
) -> Result<Json<Stored<UserInteraction>>, ApiError> {
    interaction.action = interaction.action.trim().to_string();
    if interaction.action.is_empty() {
        return Err(ApiError::BadRequest("action must not be empty".into()));
    }
    Ok(Json(state.store.create_interaction(interaction).await?))
}
