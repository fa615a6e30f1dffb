use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::product::models::Description;
use crate::domain::product::models::Price;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::ProductScope;
use crate::domain::product::models::ProductTitle;
use crate::domain::product::ports::ProductRepository;
use crate::domain::user::models::UserId;
use crate::product::errors::ProductError;

#[derive(FromRow)]
struct ProductRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    price: f64,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = ProductError;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: ProductId(r.id),
            title: ProductTitle::new(r.title)?,
            description: r.description.map(Description::new).transpose()?,
            price: Price::new(r.price)?,
            created_by: UserId(r.created_by),
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, title, description, price, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id.0)
        .bind(product.title.as_str())
        .bind(product.description.as_ref().map(Description::as_str))
        .bind(product.price.value())
        .bind(product.created_by.0)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return ProductError::CreatorNotFound(product.created_by.to_string());
                }
            }
            ProductError::DatabaseError(e.to_string())
        })?;

        Ok(product)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, price, created_by, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        row.map(Product::try_from).transpose()
    }

    async fn search(&self, scope: &ProductScope) -> Result<Vec<Product>, ProductError> {
        let (min_price, max_price) = scope.price_range.unzip();

        // strpos keeps '%' and '_' in the filter literal
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, price, created_by, created_at, updated_at
            FROM products
            WHERE ($1::TEXT IS NULL OR strpos(lower(title), $1) > 0)
              AND ($2::FLOAT8 IS NULL OR price BETWEEN $2 AND $3::FLOAT8)
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope.title.as_deref())
        .bind(min_price)
        .bind(max_price)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn update(&self, product: Product) -> Result<Product, ProductError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET title = $2, description = $3, price = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(product.id.0)
        .bind(product.title.as_str())
        .bind(product.description.as_ref().map(Description::as_str))
        .bind(product.price.value())
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(product.id.to_string()));
        }

        Ok(product)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
