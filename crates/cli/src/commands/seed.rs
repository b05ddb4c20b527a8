//! Seed the catalog with demo products.
//!
//! Inserts a small set of handcrafted-basket products keyed by SKU.
//! Re-running is safe: products whose SKU already exists are skipped.

use secrecy::SecretString;
use tracing::info;

use bagan_baskets_core::{Price, Sku, SkuError};
use bagan_baskets_server::db::{CatalogStore, Store, StoreError};
use bagan_baskets_server::models::NewProduct;

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("invalid seed data: {0}")]
    Sku(#[from] SkuError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price_cents: i64,
    stock: i32,
    sku: &'static str,
}

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Bagan Market Basket",
        description: "Handwoven bamboo market basket from the Bagan plains.",
        category: "baskets",
        price_cents: 2999,
        stock: 25,
        sku: "BB-BASKET-001",
    },
    SeedProduct {
        name: "Inle Lotus Tray",
        description: "Shallow serving tray woven from lotus-stem fibre.",
        category: "trays",
        price_cents: 4500,
        stock: 12,
        sku: "BB-TRAY-001",
    },
    SeedProduct {
        name: "Rattan Storage Hamper",
        description: "Lidded rattan hamper with leather hinge straps.",
        category: "baskets",
        price_cents: 7250,
        stock: 8,
        sku: "BB-HAMPER-001",
    },
    SeedProduct {
        name: "Palm Leaf Coaster Set",
        description: "Set of six woven palm-leaf coasters.",
        category: "tableware",
        price_cents: 1599,
        stock: 40,
        sku: "BB-COASTER-001",
    },
];

/// Seed the catalog with demo products.
///
/// # Errors
///
/// Returns an error if `SHOP_DATABASE_URL` is unset or a non-conflict
/// store error occurs.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SHOP_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("SHOP_DATABASE_URL"))?;

    let store = Store::new(Some(database_url));
    let catalog = CatalogStore::new(&store);

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for seed in SEED_PRODUCTS {
        let product = NewProduct {
            name: seed.name.to_owned(),
            description: Some(seed.description.to_owned()),
            category: Some(seed.category.to_owned()),
            price: Price::from_cents(seed.price_cents),
            stock: seed.stock,
            sku: Sku::parse(seed.sku)?,
            is_active: true,
        };

        match catalog.create(product).await {
            Ok(created) => {
                info!(sku = seed.sku, id = %created.id, "Inserted product");
                inserted += 1;
            }
            Err(StoreError::Conflict(_)) => {
                info!(sku = seed.sku, "Already exists, skipping");
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");
    info!("  Products skipped (already exist): {skipped}");

    Ok(())
}
