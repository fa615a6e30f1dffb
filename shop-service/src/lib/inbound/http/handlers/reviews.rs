use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::identity::Identity;
use crate::domain::product::models::ProductId;
use crate::domain::review::models::Comment;
use crate::domain::review::models::CreateReviewCommand;
use crate::domain::review::models::Page;
use crate::domain::review::models::Rating;
use crate::domain::review::models::Review;
use crate::domain::review::models::ReviewId;
use crate::domain::review::models::UpdateReviewCommand;
use crate::inbound::http::router::AppState;
use crate::review::errors::ReviewError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewResponseData {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponseData {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.to_string(),
            product_id: review.product_id.to_string(),
            user_id: review.user_id.to_string(),
            rating: review.rating.value(),
            comment: review.comment.as_str().to_string(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListReviewsParams {
    #[serde(rename = "pageNumber")]
    page_number: Option<u32>,
    #[serde(rename = "reviewPerPage")]
    review_per_page: Option<u32>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ListReviewsParams>,
) -> Result<ApiSuccess<Vec<ReviewResponseData>>, ApiError> {
    let page = Page::new(
        params.page_number.unwrap_or(1),
        params.review_per_page.unwrap_or(Page::DEFAULT_PER_PAGE),
    )
    .map_err(ReviewError::from)?;

    let reviews = state.review_service.list_reviews(page).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        reviews.iter().map(ReviewResponseData::from).collect(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateReviewRequest {
    rating: i64,
    comment: String,
}

impl CreateReviewRequest {
    fn try_into_command(self) -> Result<CreateReviewCommand, ReviewError> {
        Ok(CreateReviewCommand {
            rating: Rating::new(self.rating)?,
            comment: Comment::new(self.comment)?,
        })
    }
}

pub async fn create_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(product_id): Path<String>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<ApiSuccess<ReviewResponseData>, ApiError> {
    let product_id = ProductId::from_string(&product_id)
        .map_err(|e| ApiError::validation(format!("Invalid product ID: {}", e)))?;

    state
        .review_service
        .create_review(&product_id, &identity.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref review| ApiSuccess::new(StatusCode::CREATED, review.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateReviewRequest {
    rating: Option<i64>,
    comment: Option<String>,
}

impl UpdateReviewRequest {
    fn try_into_command(self) -> Result<UpdateReviewCommand, ReviewError> {
        Ok(UpdateReviewCommand {
            rating: self.rating.map(Rating::new).transpose()?,
            comment: self.comment.map(Comment::new).transpose()?,
        })
    }
}

pub async fn update_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(review_id): Path<String>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<ApiSuccess<ReviewResponseData>, ApiError> {
    let review_id = ReviewId::from_string(&review_id).map_err(ReviewError::from)?;

    state
        .review_service
        .update_review(&review_id, &identity, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref review| ApiSuccess::new(StatusCode::OK, review.into()))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(review_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let review_id = ReviewId::from_string(&review_id).map_err(ReviewError::from)?;

    state
        .review_service
        .delete_review(&review_id, &identity)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Review has been deleted"),
    ))
}
