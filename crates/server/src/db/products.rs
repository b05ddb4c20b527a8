//! Catalog store: product listing, lookup, and administrative writes.

use chrono::{DateTime, Utc};

use bagan_baskets_core::{ProductId, Sku};

use super::{Store, StoreError, degrade_read};
use crate::models::{NewProduct, Product, ProductPatch};

const PRODUCT_COLUMNS: &str =
    "id, name, description, category, price, stock, sku, is_active, created_at, updated_at";

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    category: Option<String>,
    price: i64,
    stock: i32,
    sku: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let sku = Sku::parse(&row.sku)
            .map_err(|e| StoreError::DataCorruption(format!("invalid sku in database: {e}")))?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            category: row.category,
            price: row.price.into(),
            stock: row.stock,
            sku,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Validate a product before insert.
///
/// SKU shape is already enforced by the [`Sku`] type; money and stock sign
/// checks happen here because the wire format carries raw integers.
fn validate_new_product(product: &NewProduct) -> Result<(), StoreError> {
    if product.name.trim().is_empty() {
        return Err(StoreError::Validation("product name is required".into()));
    }
    if product.price.is_negative() {
        return Err(StoreError::Validation(
            "product price cannot be negative".into(),
        ));
    }
    if product.stock < 0 {
        return Err(StoreError::Validation(
            "product stock cannot be negative".into(),
        ));
    }
    Ok(())
}

/// Validate a product patch before update.
fn validate_product_patch(patch: &ProductPatch) -> Result<(), StoreError> {
    if let Some(name) = &patch.name
        && name.trim().is_empty()
    {
        return Err(StoreError::Validation("product name cannot be blank".into()));
    }
    if let Some(price) = patch.price
        && price.is_negative()
    {
        return Err(StoreError::Validation(
            "product price cannot be negative".into(),
        ));
    }
    if let Some(stock) = patch.stock
        && stock < 0
    {
        return Err(StoreError::Validation(
            "product stock cannot be negative".into(),
        ));
    }
    Ok(())
}

/// Store for catalog read and write operations.
pub struct CatalogStore<'a> {
    store: &'a Store,
}

impl<'a> CatalogStore<'a> {
    /// Create a new catalog store.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// List all active products, oldest first (insertion order by id).
    ///
    /// Degrades to an empty list when the backing store is unavailable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails against a live pool.
    /// Returns `StoreError::DataCorruption` if a stored SKU is invalid.
    pub async fn list_active(&self) -> Result<Vec<Product>, StoreError> {
        let Some(pool) = self.store.pool().await else {
            tracing::warn!("cannot list products: store unavailable, returning empty catalog");
            return Ok(Vec::new());
        };

        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active ORDER BY id");
        match sqlx::query_as::<_, ProductRow>(&query).fetch_all(pool).await {
            Ok(rows) => rows.into_iter().map(TryInto::try_into).collect(),
            Err(e) => degrade_read(e, Vec::new()),
        }
    }

    /// Get a product by ID. Absence is `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails against a live pool.
    /// Returns `StoreError::DataCorruption` if the stored SKU is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let Some(pool) = self.store.pool().await else {
            tracing::warn!(product_id = %id, "cannot get product: store unavailable");
            return Ok(None);
        };

        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        match sqlx::query_as::<_, ProductRow>(&query)
            .bind(id.as_i32())
            .fetch_optional(pool)
            .await
        {
            Ok(row) => row.map(TryInto::try_into).transpose(),
            Err(e) => degrade_read(e, None),
        }
    }

    /// List products in a category (exact, case-sensitive match).
    ///
    /// Includes inactive products, matching the original catalog behavior;
    /// the public listing filter is `list_active`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails against a live pool.
    /// Returns `StoreError::DataCorruption` if a stored SKU is invalid.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        let Some(pool) = self.store.pool().await else {
            tracing::warn!(category, "cannot list products by category: store unavailable");
            return Ok(Vec::new());
        };

        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id");
        match sqlx::query_as::<_, ProductRow>(&query)
            .bind(category)
            .fetch_all(pool)
            .await
        {
            Ok(rows) => rows.into_iter().map(TryInto::try_into).collect(),
            Err(e) => degrade_read(e, Vec::new()),
        }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for a blank name or negative price
    /// or stock, `StoreError::Conflict` for a duplicate SKU, and
    /// `StoreError::Unavailable` when the backing store is down.
    pub async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        validate_new_product(&product)?;

        let Some(pool) = self.store.pool().await else {
            return Err(StoreError::Unavailable);
        };

        let query = format!(
            "INSERT INTO products (name, description, category, price, stock, sku, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.category)
            .bind(product.price.as_cents())
            .bind(product.stock)
            .bind(product.sku.as_str())
            .bind(product.is_active)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return StoreError::Conflict(format!("sku {} already exists", product.sku));
                }
                StoreError::from_sqlx(e)
            })?;

        row.try_into()
    }

    /// Update a product, merging only the provided fields.
    ///
    /// Returns `Ok(None)` when the id does not exist - callers must not
    /// assume success implies existence. An empty patch leaves the record
    /// unchanged and returns it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for negative money or stock,
    /// `StoreError::Unavailable` when the backing store is down, and
    /// `StoreError::Database` for other failures.
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        validate_product_patch(&patch)?;

        let Some(pool) = self.store.pool().await else {
            return Err(StoreError::Unavailable);
        };

        let query = format!(
            "UPDATE products SET
                 name = COALESCE($1, name),
                 description = COALESCE($2, description),
                 category = COALESCE($3, category),
                 price = COALESCE($4, price),
                 stock = COALESCE($5, stock),
                 is_active = COALESCE($6, is_active),
                 updated_at = now()
             WHERE id = $7
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(&patch.category)
            .bind(patch.price.map(|p| p.as_cents()))
            .bind(patch.stock)
            .bind(patch.is_active)
            .bind(id.as_i32())
            .fetch_optional(pool)
            .await
            .map_err(StoreError::from_sqlx)?;

        row.map(TryInto::try_into).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bagan_baskets_core::Price;

    fn sample_product() -> NewProduct {
        NewProduct {
            name: "Bamboo Basket".to_owned(),
            description: Some("Handwoven".to_owned()),
            category: Some("Baskets".to_owned()),
            price: Price::from_cents(2999),
            stock: 10,
            sku: Sku::parse("TEST-1").expect("valid sku"),
            is_active: true,
        }
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut product = sample_product();
        product.price = Price::from_cents(-1);
        assert!(matches!(
            validate_new_product(&product),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_stock() {
        let mut product = sample_product();
        product.stock = -5;
        assert!(matches!(
            validate_new_product(&product),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_accepts_zero_price_and_stock() {
        let mut product = sample_product();
        product.price = Price::ZERO;
        product.stock = 0;
        assert!(validate_new_product(&product).is_ok());
    }

    #[test]
    fn test_patch_validation() {
        let patch = ProductPatch {
            price: Some(Price::from_cents(-1)),
            ..ProductPatch::default()
        };
        assert!(matches!(
            validate_product_patch(&patch),
            Err(StoreError::Validation(_))
        ));
        assert!(validate_product_patch(&ProductPatch::default()).is_ok());
    }

    #[tokio::test]
    async fn test_reads_degrade_without_store() {
        let store = Store::new(None);
        let catalog = CatalogStore::new(&store);

        let listed = catalog.list_active().await.expect("degraded read");
        assert!(listed.is_empty());

        let one = catalog.get_by_id(ProductId::new(1)).await.expect("degraded read");
        assert!(one.is_none());

        let by_category = catalog
            .list_by_category("Baskets")
            .await
            .expect("degraded read");
        assert!(by_category.is_empty());
    }

    #[tokio::test]
    async fn test_writes_fail_without_store() {
        let store = Store::new(None);
        let catalog = CatalogStore::new(&store);

        assert!(matches!(
            catalog.create(sample_product()).await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(
            catalog.update(ProductId::new(1), ProductPatch::default()).await,
            Err(StoreError::Unavailable)
        ));
    }
}
