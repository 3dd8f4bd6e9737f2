// src/store/postgres.rs

//! Postgres-backed store (runtime sqlx queries). The quantity invariant is
//! enforced by a single conditional UPDATE, so two adjustments racing on the
//! same row serialize inside the database with no lost update.

use crate::errors::{AppError, Result};
use crate::models::{NewSweet, NewUser, Sweet, SweetPatch, User};
use crate::store::{SweetFilter, SweetStore, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const SWEET_COLUMNS: &str = "id, name, category, price, quantity, description, image, created_at, updated_at";
const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at";

pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SweetStore for PgStore {
  async fn create(&self, new: NewSweet) -> Result<Sweet> {
    new.validate()?;
    let now = Utc::now();
    let sweet: Sweet = sqlx::query_as(&format!(
      "INSERT INTO sweets ({SWEET_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) RETURNING {SWEET_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&new.name)
    .bind(new.category)
    .bind(new.price)
    .bind(new.quantity)
    .bind(new.description.unwrap_or_default())
    .bind(new.image.unwrap_or_default())
    .bind(now)
    .fetch_one(&self.pool)
    .await?;
    Ok(sweet)
  }

  async fn update(&self, id: Uuid, patch: SweetPatch) -> Result<Sweet> {
    patch.validate()?;
    // COALESCE keeps the stored value for every field the patch omits.
    let sweet: Option<Sweet> = sqlx::query_as(&format!(
      "UPDATE sweets SET \
         name = COALESCE($2, name), \
         category = COALESCE($3, category), \
         price = COALESCE($4, price), \
         quantity = COALESCE($5, quantity), \
         description = COALESCE($6, description), \
         image = COALESCE($7, image), \
         updated_at = NOW() \
       WHERE id = $1 RETURNING {SWEET_COLUMNS}"
    ))
    .bind(id)
    .bind(patch.name)
    .bind(patch.category)
    .bind(patch.price)
    .bind(patch.quantity)
    .bind(patch.description)
    .bind(patch.image)
    .fetch_optional(&self.pool)
    .await?;
    sweet.ok_or_else(|| AppError::NotFound(format!("Sweet with ID {} not found.", id)))
  }

  async fn delete(&self, id: Uuid) -> Result<Sweet> {
    let sweet: Option<Sweet> = sqlx::query_as(&format!(
      "DELETE FROM sweets WHERE id = $1 RETURNING {SWEET_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    sweet.ok_or_else(|| AppError::NotFound(format!("Sweet with ID {} not found.", id)))
  }

  async fn adjust_quantity(&self, id: Uuid, delta: i64) -> Result<Sweet> {
    // The non-negativity check and the update are one atomic statement.
    let sweet: Option<Sweet> = sqlx::query_as(&format!(
      "UPDATE sweets SET quantity = quantity + $2, updated_at = NOW() \
       WHERE id = $1 AND quantity + $2 >= 0 RETURNING {SWEET_COLUMNS}"
    ))
    .bind(id)
    .bind(delta)
    .fetch_optional(&self.pool)
    .await?;
    match sweet {
      Some(sweet) => Ok(sweet),
      None => {
        // Distinguish a missing row from a rejected adjustment.
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM sweets WHERE id = $1")
          .bind(id)
          .fetch_optional(&self.pool)
          .await?;
        if exists.is_some() {
          Err(AppError::InsufficientStock)
        } else {
          Err(AppError::NotFound(format!("Sweet with ID {} not found.", id)))
        }
      }
    }
  }

  async fn list(&self) -> Result<Vec<Sweet>> {
    let sweets: Vec<Sweet> = sqlx::query_as(&format!(
      "SELECT {SWEET_COLUMNS} FROM sweets ORDER BY created_at DESC"
    ))
    .fetch_all(&self.pool)
    .await?;
    Ok(sweets)
  }

  async fn search(&self, filter: &SweetFilter) -> Result<Vec<Sweet>> {
    let mut qb: QueryBuilder<Postgres> =
      QueryBuilder::new(format!("SELECT {SWEET_COLUMNS} FROM sweets WHERE 1=1"));
    if let Some(term) = &filter.search {
      if !term.is_empty() {
        let pattern = format!("%{}%", term);
        qb.push(" AND (name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
      }
    }
    if let Some(category) = filter.category {
      qb.push(" AND category = ");
      qb.push_bind(category);
    }
    if let Some(min) = filter.min_price {
      qb.push(" AND price >= ");
      qb.push_bind(min);
    }
    if let Some(max) = filter.max_price {
      qb.push(" AND price <= ");
      qb.push_bind(max);
    }
    qb.push(" ORDER BY created_at DESC");
    let sweets: Vec<Sweet> = qb.build_query_as().fetch_all(&self.pool).await?;
    Ok(sweets)
  }
}

#[async_trait]
impl UserStore for PgStore {
  async fn create_user(&self, new: NewUser) -> Result<User> {
    let user: User = sqlx::query_as(&format!(
      "INSERT INTO users (id, email, password_hash, name, role, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.name)
    .bind(new.role)
    .bind(Utc::now())
    .fetch_one(&self.pool)
    .await
    .map_err(map_unique_violation)?;
    Ok(user)
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    let user: Option<User> = sqlx::query_as(&format!(
      "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
    let user: Option<User> = sqlx::query_as(&format!(
      "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.code().as_deref() == Some("23505") {
      return AppError::Conflict("User already exists.".to_string());
    }
  }
  AppError::Sqlx(err)
}
