// tests/store_tests.rs

//! Inventory store invariants, exercised against the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use sweet_shop::errors::AppError;
use sweet_shop::models::{Category, NewSweet, NewUser, Role, SweetPatch};
use sweet_shop::store::{MemoryStore, SweetFilter, SweetStore, UserStore};

fn new_sweet(name: &str, category: Category, price: f64, quantity: i64) -> NewSweet {
  NewSweet {
    name: name.to_string(),
    category,
    price,
    quantity,
    description: None,
    image: None,
  }
}

#[tokio::test]
async fn create_assigns_fresh_id_and_defaults_optional_fields() {
  let store = MemoryStore::new();
  let a = store
    .create(new_sweet("Dark Truffle", Category::Chocolates, 9.99, 50))
    .await
    .unwrap();
  let b = store
    .create(new_sweet("Dark Truffle", Category::Chocolates, 9.99, 50))
    .await
    .unwrap();

  assert_ne!(a.id, b.id);
  assert_eq!(a.description, "");
  assert_eq!(a.image, "");
  assert_eq!(a.quantity, 50);
  assert_eq!(a.created_at, a.updated_at);
}

#[tokio::test]
async fn create_rejects_invalid_fields() {
  let store = MemoryStore::new();

  let empty_name = store.create(new_sweet("  ", Category::Candies, 1.0, 1)).await;
  assert!(matches!(empty_name, Err(AppError::Validation(_))));

  let negative_price = store.create(new_sweet("Lemon Drops", Category::Candies, -0.01, 1)).await;
  assert!(matches!(negative_price, Err(AppError::Validation(_))));

  let negative_quantity = store.create(new_sweet("Lemon Drops", Category::Candies, 1.0, -1)).await;
  assert!(matches!(negative_quantity, Err(AppError::Validation(_))));

  assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_contains_exactly_one_record_per_create_newest_first() {
  let store = MemoryStore::new();
  let first = store
    .create(new_sweet("Sour Worms", Category::Gummies, 2.49, 120))
    .await
    .unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  let second = store
    .create(new_sweet("Eclair", Category::Pastries, 5.75, 30))
    .await
    .unwrap();

  let listed = store.list().await.unwrap();
  assert_eq!(listed.len(), 2);
  assert_eq!(listed[0].id, second.id);
  assert_eq!(listed[1].id, first.id);
  assert_eq!(listed.iter().filter(|s| s.id == first.id).count(), 1);
}

#[tokio::test]
async fn update_applies_only_supplied_fields() {
  let store = MemoryStore::new();
  let created = store
    .create(NewSweet {
      name: "Dark Truffle".to_string(),
      category: Category::Chocolates,
      price: 9.99,
      quantity: 50,
      description: Some("Rich Belgian cocoa.".to_string()),
      image: Some("truffle.png".to_string()),
    })
    .await
    .unwrap();

  tokio::time::sleep(Duration::from_millis(5)).await;
  let updated = store
    .update(
      created.id,
      SweetPatch {
        price: Some(10.99),
        ..Default::default()
      },
    )
    .await
    .unwrap();

  // Unsupplied fields keep their prior values; they are never cleared.
  assert_eq!(updated.price, 10.99);
  assert_eq!(updated.name, "Dark Truffle");
  assert_eq!(updated.description, "Rich Belgian cocoa.");
  assert_eq!(updated.image, "truffle.png");
  assert_eq!(updated.quantity, 50);
  assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn update_validates_patch_and_unknown_id() {
  let store = MemoryStore::new();
  let created = store
    .create(new_sweet("Shortbread", Category::Cookies, 4.5, 80))
    .await
    .unwrap();

  let bad_price = store
    .update(
      created.id,
      SweetPatch {
        price: Some(-1.0),
        ..Default::default()
      },
    )
    .await;
  assert!(matches!(bad_price, Err(AppError::Validation(_))));

  let missing = store.update(uuid::Uuid::new_v4(), SweetPatch::default()).await;
  assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_is_terminal_for_the_id() {
  let store = MemoryStore::new();
  let created = store
    .create(new_sweet("Strawberry Pop", Category::Lollipops, 1.25, 10))
    .await
    .unwrap();

  let removed = store.delete(created.id).await.unwrap();
  assert_eq!(removed.id, created.id);
  assert!(store.list().await.unwrap().is_empty());

  // Every further mutation on the deleted id is NotFound.
  assert!(matches!(
    store.adjust_quantity(created.id, -1).await,
    Err(AppError::NotFound(_))
  ));
  assert!(matches!(
    store.update(created.id, SweetPatch::default()).await,
    Err(AppError::NotFound(_))
  ));
  assert!(matches!(store.delete(created.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn quantity_lifecycle_purchase_restock_delete() {
  let store = MemoryStore::new();
  let truffle = store
    .create(new_sweet("Dark Truffle", Category::Chocolates, 9.99, 50))
    .await
    .unwrap();

  let after_purchase = store.adjust_quantity(truffle.id, -1).await.unwrap();
  assert_eq!(after_purchase.quantity, 49);

  let oversell = store.adjust_quantity(truffle.id, -60).await;
  assert!(matches!(oversell, Err(AppError::InsufficientStock)));
  let unchanged = store.list().await.unwrap();
  assert_eq!(unchanged[0].quantity, 49);

  let restocked = store.adjust_quantity(truffle.id, 10).await.unwrap();
  assert_eq!(restocked.quantity, 59);

  store.delete(truffle.id).await.unwrap();
  assert!(matches!(
    store.adjust_quantity(truffle.id, -1).await,
    Err(AppError::NotFound(_))
  ));
}

#[tokio::test]
async fn final_quantity_is_initial_plus_applied_deltas() {
  let store = MemoryStore::new();
  let sweet = store
    .create(new_sweet("Lemon Drops", Category::Candies, 1.99, 10))
    .await
    .unwrap();

  let deltas = [-3, -4, -9, 5, -20, 2];
  let mut applied = 0i64;
  for delta in deltas {
    match store.adjust_quantity(sweet.id, delta).await {
      Ok(_) => applied += delta,
      Err(AppError::InsufficientStock) => {} // rejected calls contribute zero
      Err(other) => panic!("unexpected error: {other}"),
    }
  }

  let final_quantity = store.list().await.unwrap()[0].quantity;
  assert_eq!(final_quantity, 10 + applied);
  assert!(final_quantity >= 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_never_oversell() {
  let store = Arc::new(MemoryStore::new());
  let sweet = store
    .create(new_sweet("Sour Worms", Category::Gummies, 2.49, 50))
    .await
    .unwrap();

  let mut handles = Vec::new();
  for _ in 0..100 {
    let store = store.clone();
    let id = sweet.id;
    handles.push(tokio::spawn(async move { store.adjust_quantity(id, -1).await.is_ok() }));
  }

  let mut successes = 0;
  for handle in handles {
    if handle.await.unwrap() {
      successes += 1;
    }
  }

  // Exactly the available stock is sold; no lost update, no negative stock.
  assert_eq!(successes, 50);
  assert_eq!(store.list().await.unwrap()[0].quantity, 0);
}

#[tokio::test]
async fn search_filters_and_preserves_list_order() {
  let store = MemoryStore::new();
  let worms = store
    .create(NewSweet {
      name: "Sour Worms".to_string(),
      category: Category::Gummies,
      price: 2.49,
      quantity: 120,
      description: Some("Tangy neon gummy worms.".to_string()),
      image: None,
    })
    .await
    .unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  let bears = store
    .create(new_sweet("Gummy Bears", Category::Gummies, 3.25, 60))
    .await
    .unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  store
    .create(new_sweet("Dark Truffle", Category::Chocolates, 9.99, 50))
    .await
    .unwrap();

  // Identity filter matches every stored sweet.
  let all = store.search(&SweetFilter::default()).await.unwrap();
  assert_eq!(all.len(), 3);

  let gummies = store
    .search(&SweetFilter {
      category: Some(Category::Gummies),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(gummies.len(), 2);
  // Order is the list order (newest first) narrowed, not re-sorted.
  assert_eq!(gummies[0].id, bears.id);
  assert_eq!(gummies[1].id, worms.id);

  let by_description = store
    .search(&SweetFilter {
      search: Some("NEON".to_string()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_description.len(), 1);
  assert_eq!(by_description[0].id, worms.id);

  let in_price_band = store
    .search(&SweetFilter {
      min_price: Some(2.49),
      max_price: Some(3.25),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(in_price_band.len(), 2);
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
  let store = MemoryStore::new();
  let new_user = |email: &str| NewUser {
    email: email.to_string(),
    password_hash: "hash".to_string(),
    name: "Candy".to_string(),
    role: Role::User,
  };

  let created = store.create_user(new_user("candy@example.com")).await.unwrap();
  assert_eq!(created.role, Role::User);

  let duplicate = store.create_user(new_user("candy@example.com")).await;
  assert!(matches!(duplicate, Err(AppError::Conflict(_))));

  let found = store.find_by_email("candy@example.com").await.unwrap().unwrap();
  assert_eq!(found.id, created.id);
  assert_eq!(store.find_by_id(created.id).await.unwrap().unwrap().email, created.email);
  assert!(store.find_by_email("other@example.com").await.unwrap().is_none());
}
