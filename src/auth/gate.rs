//! Bearer-token gate in front of the task routes.
//!
//! [`authorize`] is a pure function of the `Authorization` header value, the
//! signing secret and the current time, so it can be exercised without a
//! request or a running clock.

use uuid::Uuid;

use crate::auth::jwt::{self, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    MissingHeader,
    MissingToken,
    InvalidToken,
}

impl GateError {
    pub fn message(&self) -> &'static str {
        match self {
            GateError::MissingHeader => "No token, authorization denied!",
            GateError::MissingToken => "Token missing!",
            GateError::InvalidToken => "Invalid token!",
        }
    }
}

/// Resolve the caller's user id from an `Authorization: Bearer <token>` header.
pub fn authorize(header: Option<&str>, secret: &str, now: i64) -> Result<Uuid, GateError> {
    let header = header.ok_or(GateError::MissingHeader)?;

    let mut parts = header.split_whitespace();
    let scheme = parts.next().ok_or(GateError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(GateError::InvalidToken);
    }
    let token = parts.next().ok_or(GateError::MissingToken)?;
    if parts.next().is_some() {
        return Err(GateError::InvalidToken);
    }

    let claims = jwt::decode_token(token, secret, now).map_err(|e| {
        tracing::debug!("Gate rejected token: {e}");
        GateError::InvalidToken
    })?;

    if claims.kind != TokenKind::Access {
        return Err(GateError::InvalidToken);
    }
    Ok(claims.sub)
}
