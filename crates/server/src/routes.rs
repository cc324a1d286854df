pub mod cars;
pub mod reviews;
pub mod users;

use axum::routing::{delete, get, post, put};
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::types::Health;

use crate::auth::{self, AppState};

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, auth-guarded mutations,
/// and the admin-only user removal.
pub fn build_router(cors: CorsLayer, state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/car", get(cars::list))
        .route("/api/car/:id", get(cars::get_one))
        .route("/api/user", get(users::list).post(users::add))
        .route("/api/user/:id", get(users::get_one))
        .route("/api/review", get(reviews::list));

    // Mutations require a logged-in principal.
    let protected = Router::new()
        .route("/api/car", post(cars::add))
        .route("/api/car/:id", put(cars::update).delete(cars::remove))
        .route("/api/car/:id/msg", post(cars::add_msg))
        .route("/api/car/:id/msg/:msg_id", delete(cars::remove_msg))
        .route("/api/user/:id", put(users::update))
        .route("/api/review", post(reviews::add))
        .route("/api/review/:id", delete(reviews::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    // User removal has no ownership clause; only admins reach it.
    let admin = Router::new()
        .route("/api/user/:id", delete(users::remove))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    let auth_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));

    public
        .merge(protected)
        .merge(admin)
        .merge(auth_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
