// src/store/mod.rs

//! The inventory store: single source of truth for the sweet collection and
//! the user table. Every mutation goes through these traits; nothing else in
//! the application touches the underlying state.

pub mod filter;
pub mod memory;
pub mod postgres;

pub use filter::SweetFilter;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::errors::Result;
use crate::models::{NewSweet, NewUser, Sweet, SweetPatch, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Atomic operations over the sweet collection.
///
/// Implementations must uphold the quantity invariant: `quantity >= 0` at all
/// times, under all operations, including two `adjust_quantity` calls racing
/// on the same id. The check-and-update must be a single atomic step against
/// the authoritative state; a rejected adjustment leaves state unchanged.
#[async_trait]
pub trait SweetStore: Send + Sync {
  /// Validates the fields, assigns a fresh id and timestamps, and stores the
  /// sweet. Omitted `description`/`image` default to empty strings.
  async fn create(&self, new: NewSweet) -> Result<Sweet>;

  /// Merges only the supplied fields and bumps `updated_at`.
  /// Fails with `NotFound` if the id is absent.
  async fn update(&self, id: Uuid, patch: SweetPatch) -> Result<Sweet>;

  /// Removes the record permanently and returns it for confirmation.
  /// Ids are never reused after deletion.
  async fn delete(&self, id: Uuid) -> Result<Sweet>;

  /// Applies `quantity += delta` only if the result stays non-negative,
  /// otherwise fails with `InsufficientStock` and leaves state unchanged.
  /// Negative delta for purchase, positive for restock.
  async fn adjust_quantity(&self, id: Uuid, delta: i64) -> Result<Sweet>;

  /// All sweets, newest first.
  async fn list(&self) -> Result<Vec<Sweet>>;

  /// `list()` narrowed by the filter predicate, order preserved.
  async fn search(&self, filter: &SweetFilter) -> Result<Vec<Sweet>>;
}

/// Operations over registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
  /// Fails with `Conflict` when the email is already registered.
  async fn create_user(&self, new: NewUser) -> Result<User>;

  async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
}
