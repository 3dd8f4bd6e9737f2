// src/store/memory.rs

//! In-process store guarded by a single lock per collection. The quantity
//! check-and-update runs entirely inside one write-lock critical section,
//! which realizes the same atomic-adjust contract as the SQL conditional
//! update in the Postgres store.

use crate::errors::{AppError, Result};
use crate::models::{NewSweet, NewUser, Sweet, SweetPatch, User};
use crate::store::{SweetFilter, SweetStore, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
  sweets: RwLock<HashMap<Uuid, Sweet>>,
  users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl SweetStore for MemoryStore {
  async fn create(&self, new: NewSweet) -> Result<Sweet> {
    new.validate()?;
    let now = Utc::now();
    let sweet = Sweet {
      id: Uuid::new_v4(),
      name: new.name,
      category: new.category,
      price: new.price,
      quantity: new.quantity,
      description: new.description.unwrap_or_default(),
      image: new.image.unwrap_or_default(),
      created_at: now,
      updated_at: now,
    };
    self.sweets.write().insert(sweet.id, sweet.clone());
    Ok(sweet)
  }

  async fn update(&self, id: Uuid, patch: SweetPatch) -> Result<Sweet> {
    patch.validate()?;
    let mut sweets = self.sweets.write();
    let sweet = sweets
      .get_mut(&id)
      .ok_or_else(|| AppError::NotFound(format!("Sweet with ID {} not found.", id)))?;
    if let Some(name) = patch.name {
      sweet.name = name;
    }
    if let Some(category) = patch.category {
      sweet.category = category;
    }
    if let Some(price) = patch.price {
      sweet.price = price;
    }
    if let Some(quantity) = patch.quantity {
      sweet.quantity = quantity;
    }
    if let Some(description) = patch.description {
      sweet.description = description;
    }
    if let Some(image) = patch.image {
      sweet.image = image;
    }
    sweet.updated_at = Utc::now();
    Ok(sweet.clone())
  }

  async fn delete(&self, id: Uuid) -> Result<Sweet> {
    self
      .sweets
      .write()
      .remove(&id)
      .ok_or_else(|| AppError::NotFound(format!("Sweet with ID {} not found.", id)))
  }

  async fn adjust_quantity(&self, id: Uuid, delta: i64) -> Result<Sweet> {
    let mut sweets = self.sweets.write();
    let sweet = sweets
      .get_mut(&id)
      .ok_or_else(|| AppError::NotFound(format!("Sweet with ID {} not found.", id)))?;
    let next = sweet
      .quantity
      .checked_add(delta)
      .ok_or_else(|| AppError::Validation("Quantity out of range.".to_string()))?;
    if next < 0 {
      return Err(AppError::InsufficientStock);
    }
    sweet.quantity = next;
    sweet.updated_at = Utc::now();
    Ok(sweet.clone())
  }

  async fn list(&self) -> Result<Vec<Sweet>> {
    let mut sweets: Vec<Sweet> = self.sweets.read().values().cloned().collect();
    sweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sweets)
  }

  async fn search(&self, filter: &SweetFilter) -> Result<Vec<Sweet>> {
    let mut sweets = self.list().await?;
    sweets.retain(|sweet| filter.matches(sweet));
    Ok(sweets)
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn create_user(&self, new: NewUser) -> Result<User> {
    let mut users = self.users.write();
    if users.values().any(|u| u.email == new.email) {
      return Err(AppError::Conflict("User already exists.".to_string()));
    }
    let user = User {
      id: Uuid::new_v4(),
      email: new.email,
      password_hash: new.password_hash,
      name: new.name,
      role: new.role,
      created_at: Utc::now(),
    };
    users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    Ok(self.users.read().values().find(|u| u.email == email).cloned())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
    Ok(self.users.read().get(&id).cloned())
  }
}
