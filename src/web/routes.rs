// src/web/routes.rs

use actix_web::web;

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, sweet_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({
      "status": "healthy",
      "timestamp": chrono::Utc::now(),
  }))
}

/// Json extractor configuration routing malformed bodies through the shared
/// error taxonomy instead of actix's default error body.
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .error_handler(|err, _req| AppError::Validation(format!("Invalid request body: {}", err)).into())
}

// This function is called in `main.rs` (and by the integration tests) to
// configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler)),
      )
      // Sweet Routes
      .service(
        web::scope("/sweets")
          .route("", web::get().to(sweet_handlers::list_sweets_handler))
          .route("", web::post().to(sweet_handlers::create_sweet_handler))
          .route("/search", web::get().to(sweet_handlers::search_sweets_handler))
          .route("/{sweet_id}", web::put().to(sweet_handlers::update_sweet_handler))
          .route("/{sweet_id}", web::delete().to(sweet_handlers::delete_sweet_handler))
          .route(
            "/{sweet_id}/purchase",
            web::post().to(sweet_handlers::purchase_sweet_handler),
          )
          .route(
            "/{sweet_id}/restock",
            web::post().to(sweet_handlers::restock_sweet_handler),
          ),
      ),
  );
}
