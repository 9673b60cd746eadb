//! # Product Repository
//!
//! Catalog reads and stock inspection.
//!
//! Stock is deliberately read-only here: the only decrement path is the
//! conditional update inside the settlement transaction (see
//! [`crate::checkout`]), and the only increment path is restocking through
//! [`ProductRepository::adjust_stock`] which admin tooling calls outside any
//! checkout.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use verve_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product: Option<Product> = sqlx::query_as(
            r#"
            SELECT id, name, description, price_cents, stock,
                   product_type, image_url, is_active,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products, optionally filtered by storefront category.
    pub async fn list_active(&self, product_type: Option<&str>) -> DbResult<Vec<Product>> {
        let products: Vec<Product> = match product_type {
            Some(kind) => {
                sqlx::query_as(
                    r#"
                    SELECT id, name, description, price_cents, stock,
                           product_type, image_url, is_active,
                           created_at, updated_at
                    FROM products
                    WHERE is_active = 1 AND product_type = ?1
                    ORDER BY name
                    "#,
                )
                .bind(kind)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT id, name, description, price_cents, stock,
                           product_type, image_url, is_active,
                           created_at, updated_at
                    FROM products
                    WHERE is_active = 1
                    ORDER BY name
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Inserts a product (seed data and tests).
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, stock,
                product_type, image_url, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.product_type)
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Reads the current stock level for a product.
    pub async fn stock(&self, id: &str) -> DbResult<i64> {
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        stock.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Adjusts stock by a relative delta (restocking, manual corrections).
    ///
    /// Relative SQL (`stock = stock + delta`) so concurrent adjustments
    /// compose; the CHECK constraint rejects adjustments that would drive
    /// stock negative.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    fn product(name: &str, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            price_cents: 1299,
            stock,
            product_type: Some("Beauty".to_string()),
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let p = product("Rose Lip Balm", 7);
        repo.insert(&p).await.unwrap();

        let loaded = repo.get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Rose Lip Balm");
        assert_eq!(loaded.stock, 7);
        assert_eq!(loaded.price_cents, 1299);
        assert!(loaded.is_active);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.products().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_active_filters_by_type() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut beauty = product("Serum", 3);
        beauty.product_type = Some("Beauty".to_string());
        let mut fashion = product("Scarf", 3);
        fashion.product_type = Some("Fashion".to_string());
        repo.insert(&beauty).await.unwrap();
        repo.insert(&fashion).await.unwrap();

        let all = repo.list_active(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let only_fashion = repo.list_active(Some("Fashion")).await.unwrap();
        assert_eq!(only_fashion.len(), 1);
        assert_eq!(only_fashion[0].name, "Scarf");
    }

    #[tokio::test]
    async fn test_adjust_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let p = product("Serum", 5);
        repo.insert(&p).await.unwrap();

        repo.adjust_stock(&p.id, 10).await.unwrap();
        assert_eq!(repo.stock(&p.id).await.unwrap(), 15);

        repo.adjust_stock(&p.id, -15).await.unwrap();
        assert_eq!(repo.stock(&p.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_adjust_stock_cannot_go_negative() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let p = product("Serum", 2);
        repo.insert(&p).await.unwrap();

        let err = repo.adjust_stock(&p.id, -3).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
        assert_eq!(repo.stock(&p.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_adjust_stock_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.products().adjust_stock("nope", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
