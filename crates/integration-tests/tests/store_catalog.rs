//! Catalog store tests against a real `PostgreSQL` database.
//!
//! These tests require:
//! - A migrated database reachable via `SHOP_DATABASE_URL`
//!
//! Run with: `cargo test -p bagan-baskets-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bagan_baskets_core::Price;
use bagan_baskets_integration_tests::{test_store, unique_sku};
use bagan_baskets_server::db::{CatalogStore, StoreError};
use bagan_baskets_server::models::{NewProduct, ProductPatch};

fn test_product(sku_prefix: &str) -> NewProduct {
    NewProduct {
        name: "Test Product".to_owned(),
        description: Some("A test product".to_owned()),
        category: Some("test".to_owned()),
        price: Price::from_cents(2999),
        stock: 10,
        sku: unique_sku(sku_prefix),
        is_active: true,
    }
}

// ============================================================================
// Create & Lookup Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_create_then_get_returns_equal_product() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);

    let input = test_product("CAT-CG");
    let created = catalog
        .create(input.clone())
        .await
        .expect("failed to create product");

    assert_eq!(created.name, input.name);
    assert_eq!(created.price, Price::from_cents(2999));
    assert_eq!(created.stock, 10);
    assert_eq!(created.sku, input.sku);
    assert!(created.is_active);

    let fetched = catalog
        .get_by_id(created.id)
        .await
        .expect("failed to fetch product")
        .expect("created product must be findable");

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.sku, created.sku);
    assert_eq!(fetched.price, created.price);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_duplicate_sku_is_conflict() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);

    let input = test_product("CAT-DUP");
    catalog
        .create(input.clone())
        .await
        .expect("first insert should succeed");

    let err = catalog
        .create(input)
        .await
        .expect_err("second insert with the same SKU must fail");

    assert!(matches!(err, StoreError::Conflict(_)), "got: {err:?}");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_missing_product_is_none() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);

    let found = catalog
        .get_by_id(bagan_baskets_core::ProductId::new(i32::MAX))
        .await
        .expect("lookup itself should not fail");

    assert!(found.is_none());
}

// ============================================================================
// Listing & Filtering Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_inactive_products_hidden_from_listing() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);

    let mut input = test_product("CAT-HID");
    input.is_active = false;
    let created = catalog
        .create(input)
        .await
        .expect("failed to create product");

    let listed = catalog.list_active().await.expect("failed to list");
    assert!(
        !listed.iter().any(|p| p.id == created.id),
        "inactive product must not appear in the public listing"
    );

    // Direct lookup still works regardless of active flag.
    let fetched = catalog
        .get_by_id(created.id)
        .await
        .expect("failed to fetch")
        .expect("inactive product is still addressable by id");
    assert!(!fetched.is_active);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_category_filter_matches_exactly() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);

    let category = format!("cat-{}", uuid::Uuid::new_v4().simple());
    let mut input = test_product("CAT-FLT");
    input.category = Some(category.clone());
    let created = catalog
        .create(input)
        .await
        .expect("failed to create product");

    let matching = catalog
        .list_by_category(&category)
        .await
        .expect("failed to filter");
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, created.id);

    // Exact string match, so a different case finds nothing.
    let uppercase = catalog
        .list_by_category(&category.to_uppercase())
        .await
        .expect("failed to filter");
    assert!(uppercase.is_empty());
}

// ============================================================================
// Update Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_partial_update_leaves_other_fields() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);

    let created = catalog
        .create(test_product("CAT-UPD"))
        .await
        .expect("failed to create product");

    let patch = ProductPatch {
        price: Some(Price::from_cents(3499)),
        ..ProductPatch::default()
    };
    let updated = catalog
        .update(created.id, patch)
        .await
        .expect("failed to update")
        .expect("product exists");

    assert_eq!(updated.price, Price::from_cents(3499));
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.stock, created.stock);
    assert_eq!(updated.sku, created.sku);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_empty_patch_is_identity() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);

    let created = catalog
        .create(test_product("CAT-NOP"))
        .await
        .expect("failed to create product");

    let updated = catalog
        .update(created.id, ProductPatch::default())
        .await
        .expect("failed to update")
        .expect("product exists");

    assert_eq!(updated.name, created.name);
    assert_eq!(updated.price, created.price);
    assert_eq!(updated.stock, created.stock);
    assert_eq!(updated.is_active, created.is_active);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_update_missing_product_is_none() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);

    let updated = catalog
        .update(
            bagan_baskets_core::ProductId::new(i32::MAX),
            ProductPatch::default(),
        )
        .await
        .expect("update itself should not fail");

    assert!(updated.is_none());
}
