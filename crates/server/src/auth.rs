use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHash};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use mongodb::bson::oid::ObjectId;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use models::user::UserView;
use service::principal::Principal;
use service::user_service::{self, UserPayload};

pub const AUTH_COOKIE: &str = "auth_token";
const SIGNUP_SCORE: i64 = 10_000;
const TOKEN_HOURS: i64 = 12;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub auth: AuthConfig,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    uid: String,
    fullname: String,
    adm: bool,
    exp: usize,
}

#[derive(Debug, Deserialize)]
pub struct SignupInput {
    pub username: String,
    pub password: String,
    pub fullname: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub fn hash_password(raw: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(raw.as_bytes(), &salt)?.to_string())
}

fn issue_cookie(
    cfg: &AuthConfig,
    user: &UserView,
) -> Result<Cookie<'static>, (StatusCode, String)> {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(TOKEN_HOURS)).timestamp() as usize;
    let claims = Claims {
        sub: user.username.clone(),
        uid: user.id.clone(),
        fullname: user.fullname.clone(),
        adm: user.is_admin,
        exp,
    };
    let token = encode(
        &JwtHeader::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok(cookie)
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<SignupInput>,
) -> Result<(CookieJar, Json<UserView>), (StatusCode, String)> {
    if input.username.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "username required".into()));
    }
    if input.password.len() < 8 {
        return Err((StatusCode::BAD_REQUEST, "password too short (>=8)".into()));
    }

    let existing = user_service::get_by_username(&state.db, &input.username)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if existing.is_some() {
        return Err((StatusCode::CONFLICT, "username already taken".into()));
    }

    let hash =
        hash_password(&input.password).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let user = user_service::add(
        &state.db,
        UserPayload {
            username: input.username,
            password: hash,
            fullname: input.fullname,
            score: SIGNUP_SCORE,
            is_admin: false,
        },
    )
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let cookie = issue_cookie(&state.auth, &user)?;
    Ok((jar.add(cookie), Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<UserView>), (StatusCode, String)> {
    let user = user_service::get_by_username(&state.db, &input.username)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::UNAUTHORIZED, "invalid credentials".to_string()))?;

    let parsed = PasswordHash::new(&user.password)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
        return Err((StatusCode::UNAUTHORIZED, "invalid credentials".into()));
    }

    let view = user
        .into_view()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let cookie = issue_cookie(&state.auth, &view)?;
    Ok((jar.add(cookie), Json(view)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from(AUTH_COOKIE));
    (jar, StatusCode::NO_CONTENT)
}

/// Decode the auth cookie into an explicit [`Principal`] request extension.
/// Handlers take the principal as a parameter; nothing is ambient.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let token = jar
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or((StatusCode::UNAUTHORIZED, "not logged in".to_string()))?;

    let data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let id = ObjectId::parse_str(&data.claims.uid)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;
    req.extensions_mut().insert(Principal {
        id,
        fullname: data.claims.fullname,
        is_admin: data.claims.adm,
    });
    Ok(next.run(req).await)
}

/// Must run inside `require_auth`.
pub async fn require_admin(
    Extension(principal): Extension<Principal>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    if !principal.is_admin {
        return Err((StatusCode::FORBIDDEN, "admin only".into()));
    }
    Ok(next.run(req).await)
}
