//! # Seed Data Generator
//!
//! Populates the database with test products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default catalog
//! cargo run -p verve-db --bin seed
//!
//! # Specify database path
//! cargo run -p verve-db --bin seed -- --db ./data/verve.db
//! ```
//!
//! Each product gets a UUID, a price between $4.99 and $79.99, and a starting
//! stock between 5 and 40 units, spread across the storefront categories.

use chrono::Utc;
use std::env;
use uuid::Uuid;
use verve_core::Product;
use verve_db::{Database, DbConfig};

/// Storefront categories with representative product names.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Beauty",
        &[
            "Rose Lip Balm",
            "Vitamin C Serum",
            "Aloe Face Mist",
            "Charcoal Cleanser",
            "Shea Hand Cream",
            "Argan Hair Oil",
            "Clay Face Mask",
            "Cocoa Body Butter",
        ],
    ),
    (
        "Fashion",
        &[
            "Silk Scarf",
            "Linen Shirt",
            "Canvas Tote",
            "Denim Jacket",
            "Wool Beanie",
            "Leather Belt",
            "Cotton Socks Pack",
            "Chelsea Boots",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = parse_db_path().unwrap_or_else(|| "./verve.db".to_string());
    println!("Seeding {db_path}");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let products = db.products();

    let mut inserted = 0usize;
    for (index, (category, names)) in CATALOG.iter().enumerate() {
        for (offset, name) in names.iter().enumerate() {
            let now = Utc::now();
            // Deterministic-ish spread without a rng dependency
            let price_cents = 499 + ((index * 37 + offset * 911) % 7500) as i64;
            let stock = 5 + ((index * 13 + offset * 7) % 36) as i64;

            let product = Product {
                id: Uuid::new_v4().to_string(),
                name: (*name).to_string(),
                description: Some(format!("{name} from the {category} collection")),
                price_cents,
                stock,
                product_type: Some((*category).to_string()),
                image_url: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            };

            products.insert(&product).await?;
            inserted += 1;
        }
    }

    println!("Inserted {inserted} products");
    db.close().await;
    Ok(())
}

/// Reads `--db <path>` from the command line.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}
