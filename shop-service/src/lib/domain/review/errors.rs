use thiserror::Error;

use crate::domain::errors::ErrorKind;

/// Error for ReviewId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("Rating must be between {min} and {max}, got {actual}")]
    OutOfRange { min: i16, max: i16, actual: i64 },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommentError {
    #[error("Comment is empty")]
    Empty,

    #[error("Comment too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Page number starts at 1")]
    ZeroPage,

    #[error("Reviews per page must be between 1 and {max}, got {actual}")]
    PerPageOutOfRange { max: u32, actual: u32 },
}

/// Top-level error for review operations
#[derive(Debug, Clone, Error)]
pub enum ReviewError {
    #[error("Invalid review ID: {0}")]
    InvalidReviewId(#[from] ReviewIdError),

    #[error("Invalid rating: {0}")]
    InvalidRating(#[from] RatingError),

    #[error("Invalid comment: {0}")]
    InvalidComment(#[from] CommentError),

    #[error("Invalid page: {0}")]
    InvalidPage(#[from] PageError),

    #[error("Review not found: {0}")]
    NotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ReviewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReviewError::InvalidReviewId(_)
            | ReviewError::InvalidRating(_)
            | ReviewError::InvalidComment(_)
            | ReviewError::InvalidPage(_) => ErrorKind::Validation,
            ReviewError::NotFound(_)
            | ReviewError::ProductNotFound(_)
            | ReviewError::AuthorNotFound(_) => ErrorKind::NotFound,
            ReviewError::Forbidden(_) => ErrorKind::Forbidden,
            ReviewError::DatabaseError(_) | ReviewError::Unknown(_) => ErrorKind::Internal,
        }
    }
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        ReviewError::Unknown(err.to_string())
    }
}
