// src/web/handlers/sweet_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Category, NewSweet, SweetPatch};
use crate::state::AppState;
use crate::store::SweetFilter;
use crate::web::extractors::{AdminUser, AuthenticatedUser};

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchSweetsQuery {
  /// Substring matched against name or description.
  pub name: Option<String>,
  /// Exact category, or the wildcard "All".
  pub category: Option<String>,
  pub min_price: Option<f64>,
  pub max_price: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PurchaseRequestPayload {
  pub quantity: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct RestockRequestPayload {
  pub quantity: Option<i64>,
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_sweets", skip(app_state, _user))]
pub async fn list_sweets_handler(
  app_state: web::Data<AppState>,
  _user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let sweets = app_state.sweets.list().await?;
  info!("Fetched {} sweets.", sweets.len());
  Ok(HttpResponse::Ok().json(sweets))
}

#[instrument(name = "handler::search_sweets", skip(app_state, _user))]
pub async fn search_sweets_handler(
  app_state: web::Data<AppState>,
  _user: AuthenticatedUser,
  query: web::Query<SearchSweetsQuery>,
) -> Result<HttpResponse, AppError> {
  let query = query.into_inner();
  // Absence of a parameter means no constraint on that dimension.
  let category = match query.category.as_deref() {
    None | Some("All") => None,
    Some(other) => Some(Category::from_str(other)?),
  };
  let filter = SweetFilter {
    search: query.name,
    category,
    min_price: query.min_price,
    max_price: query.max_price,
  };
  let sweets = app_state.sweets.search(&filter).await?;
  info!("Search matched {} sweets.", sweets.len());
  Ok(HttpResponse::Ok().json(sweets))
}

#[instrument(name = "handler::create_sweet", skip(app_state, _admin, req_payload))]
pub async fn create_sweet_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  req_payload: web::Json<NewSweet>,
) -> Result<HttpResponse, AppError> {
  let sweet = app_state.sweets.create(req_payload.into_inner()).await?;
  info!(sweet_id = %sweet.id, "Sweet created.");
  Ok(HttpResponse::Created().json(sweet))
}

#[instrument(name = "handler::update_sweet", skip(app_state, _admin, req_payload), fields(sweet_id = %path.as_ref()))]
pub async fn update_sweet_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<SweetPatch>,
) -> Result<HttpResponse, AppError> {
  let sweet = app_state
    .sweets
    .update(path.into_inner(), req_payload.into_inner())
    .await?;
  info!(sweet_id = %sweet.id, "Sweet updated.");
  Ok(HttpResponse::Ok().json(sweet))
}

#[instrument(name = "handler::delete_sweet", skip(app_state, _admin), fields(sweet_id = %path.as_ref()))]
pub async fn delete_sweet_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let sweet = app_state.sweets.delete(path.into_inner()).await?;
  info!(sweet_id = %sweet.id, "Sweet deleted.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Sweet deleted successfully.",
      "sweet": sweet,
  })))
}

#[instrument(name = "handler::purchase_sweet", skip(app_state, user, body), fields(user_id = %user.id, sweet_id = %path.as_ref()))]
pub async fn purchase_sweet_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<Uuid>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  // The body is optional; an absent quantity defaults to 1.
  let payload: PurchaseRequestPayload = if body.is_empty() {
    PurchaseRequestPayload::default()
  } else {
    serde_json::from_slice(&body).map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?
  };
  let quantity = payload.quantity.unwrap_or(1);
  if quantity <= 0 {
    return Err(AppError::Validation(
      "Purchase quantity must be a positive integer.".to_string(),
    ));
  }

  let sweet = app_state.sweets.adjust_quantity(path.into_inner(), -quantity).await?;
  info!(sweet_id = %sweet.id, quantity, remaining = sweet.quantity, "Sweet purchased.");
  Ok(HttpResponse::Ok().json(sweet))
}

#[instrument(name = "handler::restock_sweet", skip(app_state, _admin, req_payload), fields(sweet_id = %path.as_ref()))]
pub async fn restock_sweet_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<RestockRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let quantity = match req_payload.quantity {
    Some(q) if q > 0 => q,
    _ => {
      return Err(AppError::Validation(
        "Restock quantity must be a positive integer.".to_string(),
      ))
    }
  };

  let sweet = app_state.sweets.adjust_quantity(path.into_inner(), quantity).await?;
  info!(sweet_id = %sweet.id, quantity, total = sweet.quantity, "Sweet restocked.");
  Ok(HttpResponse::Ok().json(sweet))
}
