use async_trait::async_trait;

use crate::domain::identity::Identity;
use crate::domain::product::models::ProductId;
use crate::domain::user::models::UserId;
use crate::review::errors::ReviewError;
use crate::review::models::CreateReviewCommand;
use crate::review::models::Page;
use crate::review::models::Review;
use crate::review::models::ReviewId;
use crate::review::models::UpdateReviewCommand;

/// Port for product reviews.
#[async_trait]
pub trait ReviewServicePort: Send + Sync + 'static {
    /// Reviews of every product, newest first.
    async fn list_reviews(&self, page: Page) -> Result<Vec<Review>, ReviewError>;

    /// # Errors
    /// * `ProductNotFound` - Product does not exist
    async fn create_review(
        &self,
        product_id: &ProductId,
        author: &UserId,
        command: CreateReviewCommand,
    ) -> Result<Review, ReviewError>;

    /// # Errors
    /// * `NotFound` - Review does not exist
    /// * `Forbidden` - Actor is not the author
    async fn update_review(
        &self,
        id: &ReviewId,
        actor: &Identity,
        command: UpdateReviewCommand,
    ) -> Result<Review, ReviewError>;

    /// # Errors
    /// * `NotFound` - Review does not exist
    /// * `Forbidden` - Actor is neither the author nor an admin
    async fn delete_review(&self, id: &ReviewId, actor: &Identity) -> Result<(), ReviewError>;
}

/// Persistence operations for the review aggregate.
#[async_trait]
pub trait ReviewRepository: Send + Sync + 'static {
    /// # Errors
    /// * `ProductNotFound` / `AuthorNotFound` - Referenced row is gone
    async fn create(&self, review: Review) -> Result<Review, ReviewError>;

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewError>;

    /// Newest first.
    async fn list(&self, page: Page) -> Result<Vec<Review>, ReviewError>;

    async fn update(&self, review: Review) -> Result<Review, ReviewError>;

    async fn delete(&self, id: &ReviewId) -> Result<(), ReviewError>;
}
