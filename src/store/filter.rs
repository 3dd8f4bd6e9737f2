// src/store/filter.rs

//! Pure filter predicate over the sweet catalog. Applying it to a list is
//! idempotent and order-preserving; an empty filter matches everything.

use crate::models::{Category, Sweet};

#[derive(Debug, Clone, Default)]
pub struct SweetFilter {
  /// Case-insensitive substring matched against name OR description.
  /// Empty or absent matches everything.
  pub search: Option<String>,
  /// Exact category. `None` is the "All" wildcard.
  pub category: Option<Category>,
  /// Inclusive price bounds; absent means unbounded on that side.
  pub min_price: Option<f64>,
  pub max_price: Option<f64>,
}

impl SweetFilter {
  pub fn matches(&self, sweet: &Sweet) -> bool {
    if let Some(term) = &self.search {
      let term = term.to_lowercase();
      if !term.is_empty()
        && !sweet.name.to_lowercase().contains(&term)
        && !sweet.description.to_lowercase().contains(&term)
      {
        return false;
      }
    }
    if let Some(category) = self.category {
      if sweet.category != category {
        return false;
      }
    }
    if let Some(min) = self.min_price {
      if sweet.price < min {
        return false;
      }
    }
    if let Some(max) = self.max_price {
      if sweet.price > max {
        return false;
      }
    }
    true
  }
}
