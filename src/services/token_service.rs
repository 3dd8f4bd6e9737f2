// src/services/token_service.rs

//! Bearer token issue/verify. Tokens are HS256 JWTs carrying the principal's
//! id and role; the role is read back from the verified token, never from
//! the request.

use crate::errors::AppError;
use crate::models::{Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Tokens expire 24 hours after issue.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// Subject: the user id.
  pub sub: Uuid,
  pub email: String,
  pub role: Role,
  pub iat: i64,
  pub exp: i64,
}

pub fn issue_token(user: &User, secret: &str) -> Result<String, AppError> {
  let now = Utc::now();
  let claims = Claims {
    sub: user.id,
    email: user.email.clone(),
    role: user.role,
    iat: now.timestamp(),
    exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
  };
  encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
  decode::<Claims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::default(),
  )
  .map(|data| data.claims)
  .map_err(|e| {
    debug!(error = %e, "Bearer token rejected.");
    AppError::Auth("Invalid or expired token.".to_string())
  })
}
