//! Order store tests against a real `PostgreSQL` database.
//!
//! These tests require:
//! - A migrated database reachable via `SHOP_DATABASE_URL`
//!
//! Run with: `cargo test -p bagan-baskets-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bagan_baskets_core::{Email, OrderStatus, Price, ProductId, UserId};
use bagan_baskets_integration_tests::{seed_test_user, test_store, unique_sku};
use bagan_baskets_server::db::{CatalogStore, OrderStore, Store, StoreError};
use bagan_baskets_server::models::{NewOrder, NewOrderLine, NewProduct, OrderPatch};

fn test_order(user_id: UserId, total_cents: i64) -> NewOrder {
    NewOrder {
        user_id,
        total_amount: Price::from_cents(total_cents),
        customer_email: Email::parse("test@example.com").expect("fixture email is valid"),
        customer_phone: Some("+95 9 123 456 789".to_owned()),
        shipping_street: "123 Test St".to_owned(),
        shipping_city: "Bagan".to_owned(),
        shipping_country: "Myanmar".to_owned(),
        shipping_zip: "12345".to_owned(),
        notes: None,
    }
}

async fn seed_product(store: &Store, price_cents: i64) -> ProductId {
    CatalogStore::new(store)
        .create(NewProduct {
            name: "Order Test Product".to_owned(),
            description: None,
            category: Some("test".to_owned()),
            price: Price::from_cents(price_cents),
            stock: 10,
            sku: unique_sku("ORD"),
            is_active: true,
        })
        .await
        .expect("failed to seed product")
        .id
}

// ============================================================================
// Checkout Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_checkout_creates_order_with_items() {
    let store = test_store();
    let orders = OrderStore::new(&store);

    let user = seed_test_user(&store).await;
    let product_id = seed_product(&store, 2999).await;

    // Two units at 29.99 each.
    let lines = vec![NewOrderLine {
        product_id,
        quantity: 2,
        unit_price: Price::from_cents(2999),
        subtotal: Price::from_cents(5998),
    }];
    let (order, items) = orders
        .create_with_items(test_order(user.id, 5998), lines)
        .await
        .expect("checkout should succeed");

    assert_eq!(order.user_id, user.id);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, Price::from_cents(5998));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].order_id, order.id);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].unit_price, Price::from_cents(2999));
    assert_eq!(items[0].subtotal, Price::from_cents(5998));

    let listed = orders
        .list_items(order.id)
        .await
        .expect("failed to list items");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, items[0].id);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_checkout_total_mismatch_writes_nothing() {
    let store = test_store();
    let orders = OrderStore::new(&store);

    let user = seed_test_user(&store).await;
    let product_id = seed_product(&store, 2999).await;

    let lines = vec![NewOrderLine {
        product_id,
        quantity: 2,
        unit_price: Price::from_cents(2999),
        subtotal: Price::from_cents(5998),
    }];
    // Header total disagrees with the item subtotals.
    let err = orders
        .create_with_items(test_order(user.id, 6000), lines)
        .await
        .expect_err("mismatched total must be rejected");
    assert!(matches!(err, StoreError::Validation(_)), "got: {err:?}");

    let history = orders
        .list_for_user(user.id)
        .await
        .expect("failed to list orders");
    assert!(history.is_empty(), "rejected checkout must leave no order");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_snapshotted_price_survives_product_update() {
    let store = test_store();
    let catalog = CatalogStore::new(&store);
    let orders = OrderStore::new(&store);

    let user = seed_test_user(&store).await;
    let product_id = seed_product(&store, 2999).await;

    let lines = vec![NewOrderLine {
        product_id,
        quantity: 1,
        unit_price: Price::from_cents(2999),
        subtotal: Price::from_cents(2999),
    }];
    let (order, _) = orders
        .create_with_items(test_order(user.id, 2999), lines)
        .await
        .expect("checkout should succeed");

    // Reprice the product after the sale.
    catalog
        .update(
            product_id,
            bagan_baskets_server::models::ProductPatch {
                price: Some(Price::from_cents(9999)),
                ..Default::default()
            },
        )
        .await
        .expect("failed to reprice")
        .expect("product exists");

    let items = orders
        .list_items(order.id)
        .await
        .expect("failed to list items");
    assert_eq!(items[0].unit_price, Price::from_cents(2999));
    assert_eq!(items[0].subtotal, Price::from_cents(2999));
}

// ============================================================================
// History & Visibility Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_history_is_scoped_and_newest_first() {
    let store = test_store();
    let orders = OrderStore::new(&store);

    let alice = seed_test_user(&store).await;
    let bob = seed_test_user(&store).await;

    let first = orders
        .create(test_order(alice.id, 1000))
        .await
        .expect("failed to create order");
    let second = orders
        .create(test_order(alice.id, 2000))
        .await
        .expect("failed to create order");
    orders
        .create(test_order(bob.id, 3000))
        .await
        .expect("failed to create order");

    let history = orders
        .list_for_user(alice.id)
        .await
        .expect("failed to list orders");

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id, "newest order comes first");
    assert_eq!(history[1].id, first.id);
    assert!(history.iter().all(|o| o.user_id == alice.id));
}

// ============================================================================
// Status Transition Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_status_walks_the_lifecycle() {
    let store = test_store();
    let orders = OrderStore::new(&store);

    let user = seed_test_user(&store).await;
    let order = orders
        .create(test_order(user.id, 1000))
        .await
        .expect("failed to create order");

    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let updated = orders
            .update(
                order.id,
                OrderPatch {
                    status: Some(status),
                    notes: None,
                },
            )
            .await
            .expect("transition should succeed")
            .expect("order exists");
        assert_eq!(updated.status, status);
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_skipping_a_lifecycle_step_is_rejected() {
    let store = test_store();
    let orders = OrderStore::new(&store);

    let user = seed_test_user(&store).await;
    let order = orders
        .create(test_order(user.id, 1000))
        .await
        .expect("failed to create order");

    // pending -> shipped skips confirmed.
    let err = orders
        .update(
            order.id,
            OrderPatch {
                status: Some(OrderStatus::Shipped),
                notes: None,
            },
        )
        .await
        .expect_err("illegal transition must be rejected");
    assert!(matches!(err, StoreError::Validation(_)), "got: {err:?}");

    let unchanged = orders
        .get_by_id(order.id)
        .await
        .expect("failed to fetch order")
        .expect("order exists");
    assert_eq!(unchanged.status, OrderStatus::Pending);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_cancel_is_terminal() {
    let store = test_store();
    let orders = OrderStore::new(&store);

    let user = seed_test_user(&store).await;
    let order = orders
        .create(test_order(user.id, 1000))
        .await
        .expect("failed to create order");

    let cancelled = orders
        .update(
            order.id,
            OrderPatch {
                status: Some(OrderStatus::Cancelled),
                notes: None,
            },
        )
        .await
        .expect("cancel should succeed")
        .expect("order exists");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let err = orders
        .update(
            order.id,
            OrderPatch {
                status: Some(OrderStatus::Confirmed),
                notes: None,
            },
        )
        .await
        .expect_err("no transitions out of cancelled");
    assert!(matches!(err, StoreError::Validation(_)), "got: {err:?}");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_empty_patch_returns_order_unchanged() {
    let store = test_store();
    let orders = OrderStore::new(&store);

    let user = seed_test_user(&store).await;
    let order = orders
        .create(test_order(user.id, 1000))
        .await
        .expect("failed to create order");

    let updated = orders
        .update(order.id, OrderPatch::default())
        .await
        .expect("failed to update")
        .expect("order exists");

    assert_eq!(updated.status, order.status);
    assert_eq!(updated.total_amount, order.total_amount);
    assert_eq!(updated.notes, order.notes);
}
