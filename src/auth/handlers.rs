use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{MeResponse, RegisterRequest, SignInRequest, TokenResponse},
        jwt::{AuthUser, JwtKeys},
        password,
        repo::User,
    },
    dto::MessageResponse,
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (name, email, password) = match (payload.name, payload.email, payload.password) {
        (Some(n), Some(e), Some(p)) => (n, e, p),
        _ => {
            warn!("register payload missing required fields");
            return Err(ApiError::Validation(
                "name, email and password are required",
            ));
        }
    };

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = password::hash_password(&password)?;
    let user = User::create(&state.db, &name, &email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("user registered successfully")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignInRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) => (e, p),
        _ => {
            warn!("sign-in payload missing required fields");
            return Err(ApiError::Validation("email and password are required"));
        }
    };

    // Unknown email and wrong password must be indistinguishable to the caller.
    let user = match User::find_by_email(&state.db, &email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "sign-in for unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !password::verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "sign-in with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user signed in");
    Ok(Json(TokenResponse {
        message: "signed in successfully",
        token,
    }))
}

/// Stateless: there is no revocation list, tokens simply age out.
pub async fn sign_out() -> Json<MessageResponse> {
    Json(MessageResponse::new("signed out successfully"))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}
