use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::gate::{self, GateError};
use crate::error::AppError;
use crate::state::SharedState;

/// The authenticated caller. Taking this as a handler argument puts the route
/// behind the bearer-token gate.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| AppError::Unauthorized(GateError::InvalidToken.message().to_string()))?;

        let user_id = gate::authorize(header, &state.config.jwt_secret, Utc::now().timestamp())
            .map_err(|e| AppError::Unauthorized(e.message().to_string()))?;

        Ok(AuthUser { user_id })
    }
}
