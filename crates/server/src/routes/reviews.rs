use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use models::review::{AddedReview, ReviewView};
use service::principal::Principal;
use service::review_service::{self, ReviewFilter, ReviewPayload};

use crate::auth::AppState;
use crate::errors::ApiError;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<Vec<ReviewView>>, ApiError> {
    Ok(Json(review_service::query(&state.db, &filter).await?))
}

pub async fn add(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ReviewPayload>,
) -> Result<Json<AddedReview>, ApiError> {
    Ok(Json(review_service::add(&state.db, &principal, payload).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(review_id): Path<String>,
) -> Result<Json<String>, ApiError> {
    Ok(Json(review_service::remove(&state.db, &principal, &review_id).await?))
}
