use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{
        vocabulary::{validate_preferences, validate_rating},
        PreferencesRequest, SearchResultSet, UserProfile, WatchHistoryEntry,
    },
    services::{
        recommendations,
        search::{self, SearchRequest},
    },
};

use super::AppState;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub user: Option<String>,
    pub prefs: Option<String>,
}

fn status_ok() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// Handlers

/// Liveness/readiness of the persistence layer
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "healthy" }))),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
        }
    }
}

/// Personalized free-text search
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResultSet>> {
    let start = std::time::Instant::now();

    let request = SearchRequest {
        query: &params.q,
        user_id: params.user.as_deref(),
        preference_override: params.prefs.as_deref(),
    };
    let result = search::personalized_search(
        &state.store,
        &state.query_builder,
        state.search_engine.as_ref(),
        request,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        user_id = params.user.as_deref().unwrap_or(""),
        hits = result.hits().len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Search completed"
    );

    Ok(Json(result))
}

/// All users with their preferences
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserProfile>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

/// Replace a user's preference set
///
/// The whole batch is validated before anything is written.
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    payload: Result<Json<PreferencesRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    state.store.require_user(&user_id).await?;

    let Json(request) = payload?;
    validate_preferences(&request.preferences)?;

    state
        .store
        .replace_preferences(&user_id, &request.preferences)
        .await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        count = request.preferences.len(),
        "Preference update applied"
    );

    Ok(status_ok())
}

/// A user's watch history, newest first
pub async fn get_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<WatchHistoryEntry>>> {
    state.store.require_user(&user_id).await?;
    let history = state.store.history_for(&user_id).await?;
    Ok(Json(history))
}

/// Append one watch event
pub async fn add_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<WatchHistoryEntry>, JsonRejection>,
) -> AppResult<Json<Value>> {
    state.store.require_user(&user_id).await?;

    let Json(entry) = payload?;
    validate_rating(entry.user_rating)?;

    state.store.add_history(&user_id, &entry).await?;

    Ok(status_ok())
}

/// Top unwatched films for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<SearchResultSet>> {
    let result = recommendations::recommend(
        &state.store,
        &state.query_builder,
        state.search_engine.as_ref(),
        &user_id,
    )
    .await?;

    Ok(Json(result))
}
