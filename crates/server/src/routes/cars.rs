use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use models::car::{CarMsg, CarView};
use service::car_service::{self, CarFilter, CarPayload, MsgPayload, UpdatedCar};
use service::principal::Principal;

use crate::auth::AppState;
use crate::errors::ApiError;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CarFilter>,
) -> Result<Json<Vec<CarView>>, ApiError> {
    Ok(Json(car_service::query(&state.db, &filter).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(car_id): Path<String>,
) -> Result<Json<CarView>, ApiError> {
    Ok(Json(car_service::get_by_id(&state.db, &car_id).await?))
}

pub async fn add(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CarPayload>,
) -> Result<Json<CarView>, ApiError> {
    Ok(Json(car_service::add(&state.db, &principal, payload).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(car_id): Path<String>,
    Json(payload): Json<CarPayload>,
) -> Result<Json<UpdatedCar>, ApiError> {
    Ok(Json(car_service::update(&state.db, &car_id, payload).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(car_id): Path<String>,
) -> Result<Json<String>, ApiError> {
    Ok(Json(car_service::remove(&state.db, &principal, &car_id).await?))
}

pub async fn add_msg(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(car_id): Path<String>,
    Json(payload): Json<MsgPayload>,
) -> Result<Json<CarMsg>, ApiError> {
    Ok(Json(car_service::add_msg(&state.db, &principal, &car_id, payload).await?))
}

pub async fn remove_msg(
    State(state): State<AppState>,
    Path((car_id, msg_id)): Path<(String, String)>,
) -> Result<Json<String>, ApiError> {
    Ok(Json(car_service::remove_msg(&state.db, &car_id, &msg_id).await?))
}
