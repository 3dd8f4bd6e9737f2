// src/web/extractors.rs

//! Request extractors for the two authorization tiers. Authorization is
//! decided here, before any handler body validation runs, so a missing or
//! invalid token short-circuits to 401/403 even for malformed payloads.

use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Role;
use crate::services::token_service;
use crate::state::AppState;

/// Any principal with a valid bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub id: Uuid,
  pub role: Role,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

/// A principal whose verified token carries the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    ready(authenticate(req).and_then(|user| {
      if user.role.is_admin() {
        Ok(AdminUser(user))
      } else {
        warn!(user_id = %user.id, "Non-admin principal attempted an admin operation.");
        Err(AppError::Forbidden("Admin access required.".to_string()))
      }
    }))
  }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

  let header_value = req
    .headers()
    .get(header::AUTHORIZATION)
    .ok_or_else(|| AppError::Auth("Access token required.".to_string()))?
    .to_str()
    .map_err(|_| AppError::Auth("Malformed authorization header.".to_string()))?;

  let token = header_value
    .strip_prefix("Bearer ")
    .ok_or_else(|| AppError::Auth("Expected a bearer token.".to_string()))?;

  let claims = token_service::verify_token(token, &state.config.jwt_secret)?;
  Ok(AuthenticatedUser {
    id: claims.sub,
    role: claims.role,
  })
}
