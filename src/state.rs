// src/state.rs

use crate::config::AppConfig;
use crate::store::{SweetStore, UserStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub sweets: Arc<dyn SweetStore>,
  pub users: Arc<dyn UserStore>,
  pub config: Arc<AppConfig>,
}
