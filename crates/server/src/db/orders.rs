//! Order store: per-user listing, lookup, composite creation, line items.
//!
//! Ownership is NOT checked here - `get_by_id` returns any order and the
//! access gate is layered on top by the lookup route. Per-user listing is
//! inherently scoped and needs no gate.

use chrono::{DateTime, Utc};

use bagan_baskets_core::{Email, OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

use super::{Store, StoreError, degrade_read};
use crate::models::{NewOrder, NewOrderItem, NewOrderLine, Order, OrderItem, OrderPatch};

const ORDER_COLUMNS: &str = "id, user_id, status, total_amount, customer_email, customer_phone, \
     shipping_street, shipping_city, shipping_country, shipping_zip, notes, created_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, unit_price, subtotal";

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    status: String,
    total_amount: i64,
    customer_email: String,
    customer_phone: Option<String>,
    shipping_street: String,
    shipping_city: String,
    shipping_country: String,
    shipping_zip: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            StoreError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let customer_email = Email::parse(&row.customer_email)
            .map_err(|e| StoreError::DataCorruption(format!("invalid email in database: {e}")))?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            status,
            total_amount: row.total_amount.into(),
            customer_email,
            customer_phone: row.customer_phone,
            shipping_street: row.shipping_street,
            shipping_city: row.shipping_city,
            shipping_country: row.shipping_country,
            shipping_zip: row.shipping_zip,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for `PostgreSQL` order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: i64,
    subtotal: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            unit_price: row.unit_price.into(),
            subtotal: row.subtotal.into(),
        }
    }
}

/// Validate an order header before insert: required contact and shipping
/// fields present, total non-negative.
fn validate_new_order(order: &NewOrder) -> Result<(), StoreError> {
    let required = [
        ("shippingStreet", &order.shipping_street),
        ("shippingCity", &order.shipping_city),
        ("shippingCountry", &order.shipping_country),
        ("shippingZip", &order.shipping_zip),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(StoreError::Validation(format!("{field} is required")));
        }
    }
    if order.total_amount.is_negative() {
        return Err(StoreError::Validation(
            "order total cannot be negative".into(),
        ));
    }
    Ok(())
}

/// Validate one line item: positive quantity and a subtotal that is exactly
/// `unit_price * quantity`. Overflow during the check is itself a
/// validation failure - such a subtotal cannot be right.
fn validate_line(quantity: i32, unit_price: Price, subtotal: Price) -> Result<(), StoreError> {
    if quantity <= 0 {
        return Err(StoreError::Validation(
            "item quantity must be positive".into(),
        ));
    }
    if unit_price.is_negative() {
        return Err(StoreError::Validation(
            "item unit price cannot be negative".into(),
        ));
    }

    let expected = unit_price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| StoreError::Validation("item subtotal overflows".into()))?;

    if subtotal != expected {
        return Err(StoreError::Validation(format!(
            "item subtotal {subtotal} does not equal unit price {unit_price} x {quantity}"
        )));
    }
    Ok(())
}

/// Validate that the order total equals the sum of its line subtotals.
fn validate_total(total: Price, lines: &[NewOrderLine]) -> Result<(), StoreError> {
    let mut sum = Price::ZERO;
    for line in lines {
        sum = sum
            .checked_add(line.subtotal)
            .ok_or_else(|| StoreError::Validation("order total overflows".into()))?;
    }
    if total != sum {
        return Err(StoreError::Validation(format!(
            "order total {total} does not equal the sum of item subtotals {sum}"
        )));
    }
    Ok(())
}

/// Store for order and order-item operations.
pub struct OrderStore<'a> {
    store: &'a Store,
}

impl<'a> OrderStore<'a> {
    /// Create a new order store.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List a user's orders, newest first (ties broken by id descending).
    ///
    /// Degrades to an empty list when the backing store is unavailable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails against a live pool.
    /// Returns `StoreError::DataCorruption` if stored data is invalid.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let Some(pool) = self.store.pool().await else {
            tracing::warn!(%user_id, "cannot list orders: store unavailable");
            return Ok(Vec::new());
        };

        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        match sqlx::query_as::<_, OrderRow>(&query)
            .bind(user_id.as_i32())
            .fetch_all(pool)
            .await
        {
            Ok(rows) => rows.into_iter().map(TryInto::try_into).collect(),
            Err(e) => degrade_read(e, Vec::new()),
        }
    }

    /// Get an order by ID without any ownership check.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails against a live pool.
    /// Returns `StoreError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let Some(pool) = self.store.pool().await else {
            tracing::warn!(order_id = %id, "cannot get order: store unavailable");
            return Ok(None);
        };

        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        match sqlx::query_as::<_, OrderRow>(&query)
            .bind(id.as_i32())
            .fetch_optional(pool)
            .await
        {
            Ok(row) => row.map(TryInto::try_into).transpose(),
            Err(e) => degrade_read(e, None),
        }
    }

    /// Create an order header. The order starts `pending`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for missing contact or shipping
    /// fields or a negative total, `StoreError::Unavailable` when the
    /// backing store is down.
    pub async fn create(&self, order: NewOrder) -> Result<Order, StoreError> {
        validate_new_order(&order)?;

        let Some(pool) = self.store.pool().await else {
            return Err(StoreError::Unavailable);
        };

        let query = format!(
            "INSERT INTO orders (user_id, status, total_amount, customer_email, customer_phone,
                                 shipping_street, shipping_city, shipping_country, shipping_zip, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(order.user_id.as_i32())
            .bind(OrderStatus::Pending.as_str())
            .bind(order.total_amount.as_cents())
            .bind(order.customer_email.as_str())
            .bind(&order.customer_phone)
            .bind(&order.shipping_street)
            .bind(&order.shipping_city)
            .bind(&order.shipping_country)
            .bind(&order.shipping_zip)
            .bind(&order.notes)
            .fetch_one(pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        row.try_into()
    }

    /// Create an order and all of its line items in one transaction.
    ///
    /// All-or-nothing: a failure anywhere rolls the whole aggregate back,
    /// so a crash can never leave an order with a partial item set. Every
    /// line's subtotal and the header total are cross-checked up front.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for header or line validation
    /// failures (including a total that does not match the item subtotals),
    /// `StoreError::Unavailable` when the backing store is down.
    pub async fn create_with_items(
        &self,
        order: NewOrder,
        lines: Vec<NewOrderLine>,
    ) -> Result<(Order, Vec<OrderItem>), StoreError> {
        validate_new_order(&order)?;
        if lines.is_empty() {
            return Err(StoreError::Validation(
                "an order needs at least one item".into(),
            ));
        }
        for line in &lines {
            validate_line(line.quantity, line.unit_price, line.subtotal)?;
        }
        validate_total(order.total_amount, &lines)?;

        let Some(pool) = self.store.pool().await else {
            return Err(StoreError::Unavailable);
        };

        let mut tx = pool.begin().await.map_err(StoreError::from_sqlx)?;

        let header_query = format!(
            "INSERT INTO orders (user_id, status, total_amount, customer_email, customer_phone,
                                 shipping_street, shipping_city, shipping_country, shipping_zip, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ORDER_COLUMNS}"
        );
        let header = sqlx::query_as::<_, OrderRow>(&header_query)
            .bind(order.user_id.as_i32())
            .bind(OrderStatus::Pending.as_str())
            .bind(order.total_amount.as_cents())
            .bind(order.customer_email.as_str())
            .bind(&order.customer_phone)
            .bind(&order.shipping_street)
            .bind(&order.shipping_city)
            .bind(&order.shipping_country)
            .bind(&order.shipping_zip)
            .bind(&order.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::from_sqlx)?;

        let item_query = format!(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = sqlx::query_as::<_, OrderItemRow>(&item_query)
                .bind(header.id)
                .bind(line.product_id.as_i32())
                .bind(line.quantity)
                .bind(line.unit_price.as_cents())
                .bind(line.subtotal.as_cents())
                .fetch_one(&mut *tx)
                .await
                .map_err(StoreError::from_sqlx)?;
            items.push(item.into());
        }

        tx.commit().await.map_err(StoreError::from_sqlx)?;

        Ok((header.try_into()?, items))
    }

    /// Update an order, merging only the provided fields.
    ///
    /// A status change is validated against the lifecycle transition table;
    /// an illegal transition is a validation error. Returns `Ok(None)` when
    /// the id does not exist. An empty patch leaves the record unchanged
    /// and returns it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an illegal status transition,
    /// `StoreError::Unavailable` when the backing store is down.
    pub async fn update(
        &self,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Option<Order>, StoreError> {
        let Some(pool) = self.store.pool().await else {
            return Err(StoreError::Unavailable);
        };

        // Row lock so the transition check and the write see the same state.
        let mut tx = pool.begin().await.map_err(StoreError::from_sqlx)?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id.as_i32())
                .fetch_optional(&mut *tx)
                .await
                .map_err(StoreError::from_sqlx)?;

        let Some(current) = current else {
            return Ok(None);
        };

        if let Some(next) = patch.status {
            let current: OrderStatus = current.parse().map_err(|e| {
                StoreError::DataCorruption(format!("invalid order status in database: {e}"))
            })?;
            if !current.can_transition_to(next) {
                return Err(StoreError::Validation(format!(
                    "cannot move order from {current} to {next}"
                )));
            }
        }

        let query = format!(
            "UPDATE orders SET
                 status = COALESCE($1, status),
                 notes = COALESCE($2, notes)
             WHERE id = $3
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(patch.status.map(OrderStatus::as_str))
            .bind(&patch.notes)
            .bind(id.as_i32())
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::from_sqlx)?;

        tx.commit().await.map_err(StoreError::from_sqlx)?;

        Ok(Some(row.try_into()?))
    }

    /// List an order's line items in insertion order.
    ///
    /// Degrades to an empty list when the backing store is unavailable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails against a live pool.
    pub async fn list_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError> {
        let Some(pool) = self.store.pool().await else {
            tracing::warn!(%order_id, "cannot list order items: store unavailable");
            return Ok(Vec::new());
        };

        let query =
            format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        match sqlx::query_as::<_, OrderItemRow>(&query)
            .bind(order_id.as_i32())
            .fetch_all(pool)
            .await
        {
            Ok(rows) => Ok(rows.into_iter().map(Into::into).collect()),
            Err(e) => degrade_read(e, Vec::new()),
        }
    }

    /// Append one line item to an existing order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` unless the subtotal equals
    /// `unit_price * quantity`, `StoreError::Unavailable` when the backing
    /// store is down.
    pub async fn create_item(&self, item: NewOrderItem) -> Result<OrderItem, StoreError> {
        validate_line(item.quantity, item.unit_price, item.subtotal)?;

        let Some(pool) = self.store.pool().await else {
            return Err(StoreError::Unavailable);
        };

        let query = format!(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ITEM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, OrderItemRow>(&query)
            .bind(item.order_id.as_i32())
            .bind(item.product_id.as_i32())
            .bind(item.quantity)
            .bind(item.unit_price.as_cents())
            .bind(item.subtotal.as_cents())
            .fetch_one(pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        Ok(row.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_order() -> NewOrder {
        NewOrder {
            user_id: UserId::new(1),
            total_amount: Price::from_cents(5998),
            customer_email: Email::parse("test@example.com").unwrap(),
            customer_phone: Some("+66943329162".to_owned()),
            shipping_street: "123 Test St".to_owned(),
            shipping_city: "Bagan".to_owned(),
            shipping_country: "Myanmar".to_owned(),
            shipping_zip: "12345".to_owned(),
            notes: None,
        }
    }

    fn sample_line() -> NewOrderLine {
        NewOrderLine {
            product_id: ProductId::new(1),
            quantity: 2,
            unit_price: Price::from_cents(2999),
            subtotal: Price::from_cents(5998),
        }
    }

    #[test]
    fn test_validate_order_requires_shipping_fields() {
        let mut order = sample_order();
        order.shipping_city = "  ".to_owned();
        assert!(matches!(
            validate_new_order(&order),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_order_rejects_negative_total() {
        let mut order = sample_order();
        order.total_amount = Price::from_cents(-1);
        assert!(matches!(
            validate_new_order(&order),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_subtotal_must_match_unit_price_times_quantity() {
        assert!(
            validate_line(2, Price::from_cents(2999), Price::from_cents(5998)).is_ok()
        );
        assert!(matches!(
            validate_line(2, Price::from_cents(2999), Price::from_cents(1)),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_line_rejects_nonpositive_quantity() {
        assert!(matches!(
            validate_line(0, Price::from_cents(2999), Price::ZERO),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            validate_line(-1, Price::from_cents(2999), Price::from_cents(-2999)),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_line_rejects_overflowing_subtotal() {
        assert!(matches!(
            validate_line(i32::MAX, Price::from_cents(i64::MAX), Price::ZERO),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_total_must_equal_sum_of_subtotals() {
        let lines = vec![sample_line()];
        assert!(validate_total(Price::from_cents(5998), &lines).is_ok());
        assert!(matches!(
            validate_total(Price::from_cents(5999), &lines),
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_reads_degrade_without_store() {
        let store = Store::new(None);
        let orders = OrderStore::new(&store);

        assert!(orders.list_for_user(UserId::new(1)).await.unwrap().is_empty());
        assert!(orders.get_by_id(OrderId::new(1)).await.unwrap().is_none());
        assert!(orders.list_items(OrderId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_fail_without_store() {
        let store = Store::new(None);
        let orders = OrderStore::new(&store);

        assert!(matches!(
            orders.create(sample_order()).await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(
            orders
                .create_with_items(sample_order(), vec![sample_line()])
                .await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(
            orders.update(OrderId::new(1), OrderPatch::default()).await,
            Err(StoreError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn test_composite_create_validates_before_touching_store() {
        // Validation failures must surface even with no database at all.
        let store = Store::new(None);
        let orders = OrderStore::new(&store);

        let mut bad_line = sample_line();
        bad_line.subtotal = Price::from_cents(1);
        assert!(matches!(
            orders
                .create_with_items(sample_order(), vec![bad_line])
                .await,
            Err(StoreError::Validation(_))
        ));

        assert!(matches!(
            orders.create_with_items(sample_order(), vec![]).await,
            Err(StoreError::Validation(_))
        ));
    }
}
