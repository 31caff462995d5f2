use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    claims::TokenKind,
    dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
    keys::JwtKeys,
    password::{hash_password, is_valid_email, verify_password, MIN_PASSWORD_LEN},
    principal::Principal,
    repo::User,
};
use crate::{error::ApiError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }
    Ok(email)
}

fn normalize_display_name(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = normalize_email(&payload.email)?;
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request("Password too short"));
    }
    let display_name = normalize_display_name(payload.display_name);

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &email, &hash, display_name.as_deref())
        .await?
        .ok_or_else(|| {
            warn!(%email, "email already registered");
            ApiError::Conflict("Email already registered".into())
        })?;

    let tokens = JwtKeys::from_ref(&state).issue_pair(user.id)?;
    info!(user_id = %user.id, "learner registered");
    Ok(Json(AuthResponse::new(tokens, user)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = normalize_email(&payload.email)?;

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(%email, "login for unknown email");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let tokens = JwtKeys::from_ref(&state).issue_pair(user.id)?;
    info!(user_id = %user.id, "learner logged in");
    Ok(Json(AuthResponse::new(tokens, user)))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_kind(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    let tokens = keys.issue_pair(user.id)?;
    Ok(Json(AuthResponse::new(tokens, user)))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, principal.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;
    Ok(Json(user.into()))
}
