use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::product::models::ProductId;
use crate::domain::review::models::Comment;
use crate::domain::review::models::Page;
use crate::domain::review::models::Rating;
use crate::domain::review::models::Review;
use crate::domain::review::models::ReviewId;
use crate::domain::review::ports::ReviewRepository;
use crate::domain::user::models::UserId;
use crate::review::errors::ReviewError;

#[derive(FromRow)]
struct ReviewRow {
    id: Uuid,
    product_id: Uuid,
    user_id: Uuid,
    rating: i16,
    comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = ReviewError;

    fn try_from(r: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: ReviewId(r.id),
            product_id: ProductId(r.product_id),
            user_id: UserId(r.user_id),
            rating: Rating::new(i64::from(r.rating))?,
            comment: Comment::new(r.comment)?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, review: Review) -> Result<Review, ReviewError> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, product_id, user_id, rating, comment, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(review.id.0)
        .bind(review.product_id.0)
        .bind(review.user_id.0)
        .bind(review.rating.value())
        .bind(review.comment.as_str())
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                match db_err.constraint() {
                    Some("reviews_product_id_fkey") => {
                        return ReviewError::ProductNotFound(review.product_id.to_string());
                    }
                    Some("reviews_user_id_fkey") => {
                        return ReviewError::AuthorNotFound(review.user_id.to_string());
                    }
                    _ => {}
                }
            }
            ReviewError::DatabaseError(e.to_string())
        })?;

        Ok(review)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewError> {
        let row: Option<ReviewRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, user_id, rating, comment, created_at, updated_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        row.map(Review::try_from).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<Review>, ReviewError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, user_id, rating, comment, created_at, updated_at
            FROM reviews
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Review::try_from).collect()
    }

    async fn update(&self, review: Review) -> Result<Review, ReviewError> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET rating = $2, comment = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(review.id.0)
        .bind(review.rating.value())
        .bind(review.comment.as_str())
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ReviewError::NotFound(review.id.to_string()));
        }

        Ok(review)
    }

    async fn delete(&self, id: &ReviewId) -> Result<(), ReviewError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ReviewError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
