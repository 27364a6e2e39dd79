use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of both session and reset tokens, in seconds.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Reset,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, kind: TokenKind, now: i64) -> Self {
        Self {
            sub: user_id,
            kind,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        }
    }

    pub fn access(user_id: Uuid, now: i64) -> Self {
        Self::new(user_id, TokenKind::Access, now)
    }

    pub fn reset(user_id: Uuid, now: i64) -> Self {
        Self::new(user_id, TokenKind::Reset, now)
    }

    /// Valid up to and including `exp`, expired strictly after it.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

/// Verify signature and expiry against the supplied clock (unix seconds).
pub fn decode_token(token: &str, secret: &str, now: i64) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against `now` rather than the system clock.
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))?;

    if claims.is_expired_at(now) {
        return Err("JWT decode failed: token expired".to_string());
    }
    Ok(claims)
}
