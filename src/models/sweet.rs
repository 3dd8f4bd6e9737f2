// src/models/sweet.rs

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed category set. "All" is a filter wildcard only and is never stored,
/// so it is deliberately not a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "sweet_category")]
pub enum Category {
  Chocolates,
  Candies,
  Gummies,
  Lollipops,
  Cookies,
  Pastries,
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Category::Chocolates => "Chocolates",
      Category::Candies => "Candies",
      Category::Gummies => "Gummies",
      Category::Lollipops => "Lollipops",
      Category::Cookies => "Cookies",
      Category::Pastries => "Pastries",
    };
    f.write_str(name)
  }
}

impl FromStr for Category {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "Chocolates" => Ok(Category::Chocolates),
      "Candies" => Ok(Category::Candies),
      "Gummies" => Ok(Category::Gummies),
      "Lollipops" => Ok(Category::Lollipops),
      "Cookies" => Ok(Category::Cookies),
      "Pastries" => Ok(Category::Pastries),
      other => Err(AppError::Validation(format!("Unknown category '{}'.", other))),
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sweet {
  pub id: Uuid,
  pub name: String,
  pub category: Category,
  pub price: f64,
  pub quantity: i64,
  pub description: String,
  pub image: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Fields required to create a sweet. `description` and `image` default to
/// empty strings when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSweet {
  pub name: String,
  pub category: Category,
  pub price: f64,
  pub quantity: i64,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub image: Option<String>,
}

impl NewSweet {
  pub fn validate(&self) -> Result<()> {
    validate_name(&self.name)?;
    validate_price(self.price)?;
    validate_quantity(self.quantity)?;
    Ok(())
  }
}

/// Partial update: only present fields change. An absent field always means
/// "keep the current value", never "clear it".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweetPatch {
  pub name: Option<String>,
  pub category: Option<Category>,
  pub price: Option<f64>,
  pub quantity: Option<i64>,
  pub description: Option<String>,
  pub image: Option<String>,
}

impl SweetPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name {
      validate_name(name)?;
    }
    if let Some(price) = self.price {
      validate_price(price)?;
    }
    if let Some(quantity) = self.quantity {
      validate_quantity(quantity)?;
    }
    Ok(())
  }
}

fn validate_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(AppError::Validation("Name must not be empty.".to_string()));
  }
  Ok(())
}

fn validate_price(price: f64) -> Result<()> {
  if !price.is_finite() || price < 0.0 {
    return Err(AppError::Validation("Price must be a non-negative number.".to_string()));
  }
  Ok(())
}

fn validate_quantity(quantity: i64) -> Result<()> {
  if quantity < 0 {
    return Err(AppError::Validation("Quantity must be a non-negative integer.".to_string()));
  }
  Ok(())
}
