use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::identity::Identity;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductRepository;
use crate::domain::user::models::UserId;
use crate::review::errors::ReviewError;
use crate::review::models::CreateReviewCommand;
use crate::review::models::Page;
use crate::review::models::Review;
use crate::review::models::ReviewId;
use crate::review::models::UpdateReviewCommand;
use crate::review::ports::ReviewRepository;
use crate::review::ports::ReviewServicePort;

pub struct ReviewService<RR, PR>
where
    RR: ReviewRepository,
    PR: ProductRepository,
{
    repository: Arc<RR>,
    products: Arc<PR>,
}

impl<RR, PR> ReviewService<RR, PR>
where
    RR: ReviewRepository,
    PR: ProductRepository,
{
    pub fn new(repository: Arc<RR>, products: Arc<PR>) -> Self {
        Self {
            repository,
            products,
        }
    }

    async fn find(&self, id: &ReviewId) -> Result<Review, ReviewError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<RR, PR> ReviewServicePort for ReviewService<RR, PR>
where
    RR: ReviewRepository,
    PR: ProductRepository,
{
    async fn list_reviews(&self, page: Page) -> Result<Vec<Review>, ReviewError> {
        self.repository.list(page).await
    }

    async fn create_review(
        &self,
        product_id: &ProductId,
        author: &UserId,
        command: CreateReviewCommand,
    ) -> Result<Review, ReviewError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?
            .ok_or(ReviewError::ProductNotFound(product_id.to_string()))?;

        let now = Utc::now();
        let review = Review {
            id: ReviewId::new(),
            product_id: product.id,
            user_id: *author,
            rating: command.rating,
            comment: command.comment,
            created_at: now,
            updated_at: now,
        };

        let review = self.repository.create(review).await?;
        tracing::info!(review_id = %review.id, product_id = %product.id, "Review created");

        Ok(review)
    }

    async fn update_review(
        &self,
        id: &ReviewId,
        actor: &Identity,
        command: UpdateReviewCommand,
    ) -> Result<Review, ReviewError> {
        let mut review = self.find(id).await?;

        // Admins moderate by deleting, never by rewriting someone else's words
        if review.user_id != actor.user_id {
            return Err(ReviewError::Forbidden(
                "only the author can update this review".to_string(),
            ));
        }

        if let Some(rating) = command.rating {
            review.rating = rating;
        }
        if let Some(comment) = command.comment {
            review.comment = comment;
        }
        review.updated_at = Utc::now();

        self.repository.update(review).await
    }

    async fn delete_review(&self, id: &ReviewId, actor: &Identity) -> Result<(), ReviewError> {
        let review = self.find(id).await?;

        if !actor.owns_or_admin(&review.user_id) {
            return Err(ReviewError::Forbidden(
                "only the author or an admin can delete this review".to_string(),
            ));
        }

        self.repository.delete(id).await?;
        tracing::info!(review_id = %id, actor = %actor.user_id, "Review deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::errors::ErrorKind;
    use crate::domain::identity::Role;
    use crate::domain::product::errors::ProductError;
    use crate::domain::product::models::Price;
    use crate::domain::product::models::Product;
    use crate::domain::product::models::ProductScope;
    use crate::domain::product::models::ProductTitle;
    use crate::review::models::Comment;
    use crate::review::models::Rating;

    mock! {
        pub TestReviewRepository {}

        #[async_trait]
        impl ReviewRepository for TestReviewRepository {
            async fn create(&self, review: Review) -> Result<Review, ReviewError>;
            async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewError>;
            async fn list(&self, page: Page) -> Result<Vec<Review>, ReviewError>;
            async fn update(&self, review: Review) -> Result<Review, ReviewError>;
            async fn delete(&self, id: &ReviewId) -> Result<(), ReviewError>;
        }
    }

    mock! {
        pub TestProductRepository {}

        #[async_trait]
        impl ProductRepository for TestProductRepository {
            async fn create(&self, product: Product) -> Result<Product, ProductError>;
            async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;
            async fn search(&self, scope: &ProductScope) -> Result<Vec<Product>, ProductError>;
            async fn update(&self, product: Product) -> Result<Product, ProductError>;
            async fn delete(&self, id: &ProductId) -> Result<(), ProductError>;
        }
    }

    fn test_review(author: UserId) -> Review {
        Review {
            id: ReviewId::new(),
            product_id: ProductId::new(),
            user_id: author,
            rating: Rating::new(4).unwrap(),
            comment: Comment::new("solid".to_string()).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn member(user_id: UserId) -> Identity {
        Identity {
            user_id,
            role: Role::NormalUser,
        }
    }

    #[tokio::test]
    async fn test_create_review_requires_product() {
        let repository = MockTestReviewRepository::new();
        let mut products = MockTestProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let command = CreateReviewCommand {
            rating: Rating::new(5).unwrap(),
            comment: Comment::new("love it".to_string()).unwrap(),
        };

        let err = ReviewService::new(Arc::new(repository), Arc::new(products))
            .create_review(&ProductId::new(), &UserId::new(), command)
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::ProductNotFound(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_review_success() {
        let mut repository = MockTestReviewRepository::new();
        let mut products = MockTestProductRepository::new();

        let product = Product {
            id: ProductId::new(),
            title: ProductTitle::new("kettle".to_string()).unwrap(),
            description: None,
            price: Price::new(30.0).unwrap(),
            created_by: UserId::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let product_id = product.id;
        let author = UserId::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repository
            .expect_create()
            .withf(move |review| review.product_id == product_id && review.user_id == author)
            .times(1)
            .returning(Ok);

        let command = CreateReviewCommand {
            rating: Rating::new(5).unwrap(),
            comment: Comment::new("love it".to_string()).unwrap(),
        };

        let review = ReviewService::new(Arc::new(repository), Arc::new(products))
            .create_review(&product_id, &author, command)
            .await
            .unwrap();

        assert_eq!(review.rating.value(), 5);
    }

    #[tokio::test]
    async fn test_update_review_by_other_user_is_forbidden() {
        let mut repository = MockTestReviewRepository::new();
        let review = test_review(UserId::new());
        let review_id = review.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(review.clone())));
        repository.expect_update().times(0);

        let admin = Identity {
            user_id: UserId::new(),
            role: Role::Admin,
        };

        let err = ReviewService::new(
            Arc::new(repository),
            Arc::new(MockTestProductRepository::new()),
        )
        .update_review(&review_id, &admin, UpdateReviewCommand::default())
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_update_review_by_author() {
        let mut repository = MockTestReviewRepository::new();
        let author = UserId::new();
        let review = test_review(author);
        let review_id = review.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(review.clone())));
        repository
            .expect_update()
            .withf(|review| review.rating.value() == 2 && review.comment.as_str() == "solid")
            .times(1)
            .returning(Ok);

        let command = UpdateReviewCommand {
            rating: Some(Rating::new(2).unwrap()),
            comment: None,
        };

        let review = ReviewService::new(
            Arc::new(repository),
            Arc::new(MockTestProductRepository::new()),
        )
        .update_review(&review_id, &member(author), command)
        .await
        .unwrap();

        assert_eq!(review.rating.value(), 2);
    }

    #[tokio::test]
    async fn test_delete_review_ownership() {
        let author = UserId::new();
        let review = test_review(author);
        let review_id = review.id;

        let mut repository = MockTestReviewRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(review.clone())));
        repository.expect_delete().times(2).returning(|_| Ok(()));

        let service = ReviewService::new(
            Arc::new(repository),
            Arc::new(MockTestProductRepository::new()),
        );

        let stranger = member(UserId::new());
        let err = service.delete_review(&review_id, &stranger).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        assert!(service.delete_review(&review_id, &member(author)).await.is_ok());

        let admin = Identity {
            user_id: UserId::new(),
            role: Role::Admin,
        };
        assert!(service.delete_review(&review_id, &admin).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_reviews_passes_page() {
        let mut repository = MockTestReviewRepository::new();
        repository
            .expect_list()
            .withf(|page| page.offset() == 10 && page.limit() == 5)
            .times(1)
            .returning(|_| Ok(vec![]));

        let reviews = ReviewService::new(
            Arc::new(repository),
            Arc::new(MockTestProductRepository::new()),
        )
        .list_reviews(Page::new(3, 5).unwrap())
        .await
        .unwrap();

        assert!(reviews.is_empty());
    }
}
