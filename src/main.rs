// src/main.rs

use sweet_shop::config::AppConfig;
use sweet_shop::errors::Result as AppResult;
use sweet_shop::models::{Category, NewSweet};
use sweet_shop::state::AppState;
use sweet_shop::store::{MemoryStore, PgStore, SweetStore, UserStore};
use sweet_shop::web::routes;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting Sweet Shop inventory server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Pick the store backend: Postgres when configured, in-memory otherwise.
  // Either way the store is the sole mutation path to inventory state.
  let (sweets, users): (Arc<dyn SweetStore>, Arc<dyn UserStore>) = match &app_config.database_url {
    Some(url) => {
      let db_pool = match PgPool::connect(url).await {
        Ok(pool) => {
          tracing::info!("Successfully connected to the database.");
          pool
        }
        Err(e) => {
          tracing::error!(error = %e, "Failed to connect to the database.");
          panic!("Database connection error: {}", e);
        }
      };
      if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
        tracing::error!(error = %e, "Failed to run database migrations.");
        panic!("Migration error: {}", e);
      }
      let store = Arc::new(PgStore::new(db_pool));
      (store.clone() as Arc<dyn SweetStore>, store as Arc<dyn UserStore>)
    }
    None => {
      tracing::warn!("DATABASE_URL not set; using the in-memory store (state is not persisted).");
      let store = Arc::new(MemoryStore::new());
      (store.clone() as Arc<dyn SweetStore>, store as Arc<dyn UserStore>)
    }
  };

  if app_config.seed_db {
    if let Err(e) = seed_catalog(sweets.as_ref()).await {
      tracing::error!(error = %e, "Failed to seed the catalog.");
    }
  }

  let app_state = AppState {
    sweets,
    users,
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .app_data(routes::json_config())
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(routes::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}

/// Seeds a small starter catalog when the store is empty.
async fn seed_catalog(sweets: &dyn SweetStore) -> AppResult<()> {
  if !sweets.list().await?.is_empty() {
    tracing::info!("Catalog already populated; skipping seed.");
    return Ok(());
  }

  let starters = [
    ("Dark Truffle", Category::Chocolates, 9.99, 50, "Rich Belgian dark chocolate truffle."),
    ("Sour Worms", Category::Gummies, 2.49, 120, "Tangy neon gummy worms."),
    ("Strawberry Swirl Pop", Category::Lollipops, 1.25, 200, "Hand-twisted strawberry lollipop."),
    ("Butter Shortbread", Category::Cookies, 4.5, 80, "Classic crumbly shortbread rounds."),
    ("Raspberry Eclair", Category::Pastries, 5.75, 30, "Choux pastry with raspberry cream."),
    ("Lemon Drops", Category::Candies, 1.99, 150, "Sherbet-filled lemon hard candy."),
  ];

  for (name, category, price, quantity, description) in starters {
    sweets
      .create(NewSweet {
        name: name.to_string(),
        category,
        price,
        quantity,
        description: Some(description.to_string()),
        image: None,
      })
      .await?;
  }
  tracing::info!("Seeded starter catalog.");
  Ok(())
}
