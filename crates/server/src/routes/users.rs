use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use models::user::UserView;
use service::user_service::{self, UpdatedUser, UserFilter, UserPatch, UserPayload};

use crate::auth::{self, AppState};
use crate::errors::ApiError;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<UserView>>, ApiError> {
    Ok(Json(user_service::query(&state.db, &filter).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    Ok(Json(user_service::get_by_id(&state.db, &user_id).await?))
}

pub async fn add(
    State(state): State<AppState>,
    Json(mut payload): Json<UserPayload>,
) -> Result<Json<UserView>, ApiError> {
    // The allow-list carries the password through; it must never land as
    // plaintext.
    payload.password =
        auth::hash_password(&payload.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(user_service::add(&state.db, payload).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UpdatedUser>, ApiError> {
    Ok(Json(user_service::update(&state.db, &user_id, patch).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    user_service::remove(&state.db, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
