//! Order route handlers.
//!
//! Listing is scoped to the session user. Single-order lookup applies the
//! ownership gate on top of the store. Checkout takes the owning user from
//! the session, never from the request body.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use bagan_baskets_core::{Email, OrderId, Price};

use crate::access::can_view;
use crate::db::OrderStore;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{CurrentUser, NewOrder, NewOrderLine, Order, OrderItem, OrderPatch};
use crate::state::AppState;

/// Request body for checkout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub total_amount: Price,
    pub customer_email: Email,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub shipping_street: String,
    pub shipping_city: String,
    pub shipping_country: String,
    pub shipping_zip: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<NewOrderLine>,
}

/// Response body for checkout: the created aggregate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// `GET /api/orders` - the session user's orders, newest first.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderStore::new(state.store()).list_for_user(user.id).await?;
    Ok(Json(orders))
}

/// `POST /api/orders` - place an order with its items, all-or-nothing.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(checkout): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let order = NewOrder {
        user_id: user.id,
        total_amount: checkout.total_amount,
        customer_email: checkout.customer_email,
        customer_phone: checkout.customer_phone,
        shipping_street: checkout.shipping_street,
        shipping_city: checkout.shipping_city,
        shipping_country: checkout.shipping_country,
        shipping_zip: checkout.shipping_zip,
        notes: checkout.notes,
    };

    let (order, items) = OrderStore::new(state.store())
        .create_with_items(order, checkout.items)
        .await?;

    Ok((StatusCode::CREATED, Json(CheckoutResponse { order, items })))
}

/// `GET /api/orders/{id}` - single order, gated on ownership.
pub async fn get_one(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let order = fetch_visible_order(&state, &user, id).await?;
    Ok(Json(order))
}

/// `GET /api/orders/{id}/items` - line items, gated on ownership of the order.
pub async fn items(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<OrderItem>>> {
    let order = fetch_visible_order(&state, &user, id).await?;
    let items = OrderStore::new(state.store()).list_items(order.id).await?;
    Ok(Json(items))
}

/// `PATCH /api/orders/{id}` - partial update (admin); status transitions
/// are validated by the store.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>> {
    let updated = OrderStore::new(state.store())
        .update(OrderId::new(id), patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    Ok(Json(updated))
}

/// Fetch an order and apply the ownership gate.
async fn fetch_visible_order(state: &AppState, user: &CurrentUser, id: i32) -> Result<Order> {
    let order = OrderStore::new(state.store())
        .get_by_id(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !can_view(&order, user) {
        return Err(AppError::Forbidden("order belongs to another user".to_owned()));
    }

    Ok(order)
}
