use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::jwt::{self, Claims, TokenKind, encode_token};
use crate::auth::password;
use crate::db;
use crate::email::templates;
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::models::{User, UserSummary};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub description: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: UserSummary,
    pub token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn session_for(user: &User, secret: &str) -> Result<AuthResponse, AppError> {
    let claims = Claims::access(user.id, Utc::now().timestamp());
    let token = encode_token(&claims, secret).map_err(AppError::Internal)?;
    Ok(AuthResponse {
        user: UserSummary::from(user),
        token,
    })
}

pub async fn signup(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if [&req.name, &req.email, &req.password, &req.description]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    if db::users::find_by_email(&state.pool, &req.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("User already exists!".to_string()));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let phone = req.phone.as_deref().filter(|p| !p.trim().is_empty());
    let user = db::users::create(
        &state.pool,
        &req.name,
        &req.email,
        &pw_hash,
        &req.description,
        phone,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("User already exists!".to_string())
        }
        _ => AppError::Database(e),
    })?;

    tracing::info!("User {} signed up", user.id);

    let response = session_for(&user, &state.config.jwt_secret)?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found!".to_string()))?;

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::BadCredentials("Invalid credentials!".to_string()));
    }

    Ok(Json(session_for(&user, &state.config.jwt_secret)?))
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found!".to_string()))?;

    let claims = Claims::reset(user.id, Utc::now().timestamp());
    let token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AppError::Internal("Reset token expiry out of range".to_string()))?;
    db::users::set_reset_token(&state.pool, user.id, &hash_token(&token), expires_at).await?;

    let (subject, body) = templates::render_password_reset(&state.config.reset_url, &token);
    state
        .mailer
        .send(&user.email, &subject, &body)
        .await
        .map_err(|e| AppError::Internal(format!("Password reset mail: {e}")))?;

    Ok(MessageResponse::new("Password reset link sent!"))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let claims = jwt::decode_token(&req.token, &state.config.jwt_secret, Utc::now().timestamp())
        .map_err(AppError::InvalidToken)?;
    if claims.kind != TokenKind::Reset {
        return Err(AppError::InvalidToken("not a reset token".to_string()));
    }

    let user = db::users::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found!".to_string()))?;

    if req.new_password.is_empty() {
        return Err(AppError::BadRequest("New password is required".to_string()));
    }

    let pw_hash = password::hash(&req.new_password).map_err(AppError::Internal)?;
    db::users::update_password(&state.pool, user.id, &pw_hash).await?;

    tracing::info!("Password reset for user {}", user.id);

    Ok(MessageResponse::new("Password reset successfully!"))
}
