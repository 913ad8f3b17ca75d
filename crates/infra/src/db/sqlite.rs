//! SQLite-backed store.
//!
//! ## Error Mapping
//!
//! | SQLx error | StoreError |
//! |------------|------------|
//! | Database (unique violation) | `Conflict` |
//! | anything else | `Backend` |
//!
//! ## Timestamps
//!
//! `sale_date` is stored as RFC 3339 text in UTC. All values go through the same
//! encoder, so text comparison in `WHERE sale_date >= ?` orders chronologically.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, instrument};

use marketstat_core::{ProductId, SaleId, SellerId};
use marketstat_products::{NewProduct, Product};
use marketstat_sales::{NewSale, Sale};
use marketstat_sellers::{NewSeller, Seller};

use super::query::{Pagination, ProductFilter, SaleFilter};
use super::store::{Store, StoreError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS sellers (
        id    INTEGER PRIMARY KEY AUTOINCREMENT,
        name  TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_sellers_name ON sellers (name)",
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        name      TEXT NOT NULL,
        price     REAL NOT NULL,
        seller_id INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_products_name ON products (name)",
    "CREATE INDEX IF NOT EXISTS ix_products_seller_id ON products (seller_id)",
    r#"
    CREATE TABLE IF NOT EXISTS sales (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER NOT NULL,
        quantity   INTEGER NOT NULL,
        sale_date  TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_sales_product_id ON sales (product_id)",
    "CREATE INDEX IF NOT EXISTS ix_sales_sale_date ON sales (sale_date)",
];

/// SQLite store over a shared connection pool.
///
/// Cloning is cheap and yields an independent handle on the same pool. Each
/// query checks a connection out of the pool and returns it when the query
/// future completes, whether it succeeded or not.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct SellerRow {
    id: i64,
    name: String,
    email: String,
}

impl From<SellerRow> for Seller {
    fn from(row: SellerRow) -> Self {
        Seller {
            id: SellerId::from_i64(row.id),
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
    seller_id: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::from_i64(row.id),
            name: row.name,
            price: row.price,
            seller_id: SellerId::from_i64(row.seller_id),
        }
    }
}

#[derive(Debug, FromRow)]
struct SaleRow {
    id: i64,
    product_id: i64,
    quantity: i64,
    sale_date: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: SaleId::from_i64(row.id),
            product_id: ProductId::from_i64(row.product_id),
            quantity: row.quantity,
            sale_date: row.sale_date,
        }
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict {
            operation,
            message: db.message().to_string(),
        },
        _ => StoreError::Backend {
            operation,
            message: err.to_string(),
        },
    }
}

impl SqliteStore {
    /// Connect to `url` (e.g. `sqlite://./sql_app.db`), creating the database
    /// file and schema if absent.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        if url.contains(":memory:") {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("parse_database_url", e))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database.
    ///
    /// An in-memory SQLite database lives and dies with its connection, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| map_sqlx_error("parse_database_url", e))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating tables if they are missing.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("create_schema", e))?;
        }
        debug!("database schema ready");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    #[instrument(skip(self, seller), fields(email = %seller.email))]
    async fn create_seller(&self, seller: &NewSeller) -> Result<Seller, StoreError> {
        let result = sqlx::query("INSERT INTO sellers (name, email) VALUES (?1, ?2)")
            .bind(&seller.name)
            .bind(&seller.email)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_seller", e))?;

        Ok(Seller {
            id: SellerId::from_i64(result.last_insert_rowid()),
            name: seller.name.clone(),
            email: seller.email.clone(),
        })
    }

    async fn list_sellers(&self, page: Pagination) -> Result<Vec<Seller>, StoreError> {
        let rows = sqlx::query_as::<_, SellerRow>(
            "SELECT id, name, email FROM sellers ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_sellers", e))?;

        Ok(rows.into_iter().map(Seller::from).collect())
    }

    async fn get_seller(&self, id: SellerId) -> Result<Option<Seller>, StoreError> {
        let row = sqlx::query_as::<_, SellerRow>("SELECT id, name, email FROM sellers WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_seller", e))?;

        Ok(row.map(Seller::from))
    }

    #[instrument(skip(self, product), fields(seller_id = %product.seller_id))]
    async fn create_product(&self, product: &NewProduct) -> Result<Product, StoreError> {
        let result = sqlx::query("INSERT INTO products (name, price, seller_id) VALUES (?1, ?2, ?3)")
            .bind(&product.name)
            .bind(product.price)
            .bind(product.seller_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_product", e))?;

        Ok(Product {
            id: ProductId::from_i64(result.last_insert_rowid()),
            name: product.name.clone(),
            price: product.price,
            seller_id: product.seller_id,
        })
    }

    async fn list_products(&self, page: Pagination) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, seller_id FROM products ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, seller_id FROM products WHERE id = ?1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        Ok(row.map(Product::from))
    }

    #[instrument(skip(self, sale), fields(product_id = %sale.product_id))]
    async fn create_sale(&self, sale: &NewSale) -> Result<Sale, StoreError> {
        let sale_date = sale.sale_date_or(Utc::now());

        let result = sqlx::query(
            "INSERT INTO sales (product_id, quantity, sale_date) VALUES (?1, ?2, ?3)",
        )
        .bind(sale.product_id.as_i64())
        .bind(sale.quantity)
        .bind(sale_date)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_sale", e))?;

        Ok(Sale {
            id: SaleId::from_i64(result.last_insert_rowid()),
            product_id: sale.product_id,
            quantity: sale.quantity,
            sale_date,
        })
    }

    async fn list_sales(&self, page: Pagination) -> Result<Vec<Sale>, StoreError> {
        let rows = sqlx::query_as::<_, SaleRow>(
            "SELECT id, product_id, quantity, sale_date FROM sales ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_sales", e))?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn get_sale(&self, id: SaleId) -> Result<Option<Sale>, StoreError> {
        let row = sqlx::query_as::<_, SaleRow>(
            "SELECT id, product_id, quantity, sale_date FROM sales WHERE id = ?1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_sale", e))?;

        Ok(row.map(Sale::from))
    }

    async fn count_products(&self, filter: ProductFilter) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE (?1 IS NULL OR seller_id = ?2)",
        )
        .bind(filter.seller_id.map(|id| id.as_i64()))
        .bind(filter.seller_id.map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("count_products", e))?;

        Ok(count.max(0) as u64)
    }

    async fn count_sales(&self, filter: SaleFilter) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sales s
            JOIN products p ON s.product_id = p.id
            WHERE (?1 IS NULL OR p.seller_id = ?2)
              AND (?3 IS NULL OR s.sale_date >= ?4)
            "#,
        )
        .bind(filter.seller_id.map(|id| id.as_i64()))
        .bind(filter.seller_id.map(|id| id.as_i64()))
        .bind(filter.sold_since)
        .bind(filter.sold_since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("count_sales", e))?;

        Ok(count.max(0) as u64)
    }
}
