use thiserror::Error;

use crate::domain::errors::ErrorKind;

/// Error for ProductId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for ProductTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductTitleError {
    #[error("Title too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Price validation failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PriceError {
    #[error("Price must be a finite number")]
    NotFinite,

    #[error("Price out of range: must be between {min} and {max}")]
    OutOfRange { min: f64, max: f64 },
}

/// Error for Description validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("Description too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Description too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error raised by a cache store. Never surfaced to callers of the catalogue.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    Connection(String),

    #[error("Cache entry could not be (de)serialized: {0}")]
    Serialization(String),

    #[error("Cache operation failed: {0}")]
    Operation(String),
}

/// Top-level error for product catalogue operations
#[derive(Debug, Clone, Error)]
pub enum ProductError {
    #[error("Invalid product ID: {0}")]
    InvalidProductId(#[from] ProductIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] ProductTitleError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Invalid description: {0}")]
    InvalidDescription(#[from] DescriptionError),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Creator not found: {0}")]
    CreatorNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProductError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProductError::InvalidProductId(_)
            | ProductError::InvalidTitle(_)
            | ProductError::InvalidPrice(_)
            | ProductError::InvalidDescription(_) => ErrorKind::Validation,
            ProductError::NotFound(_) | ProductError::CreatorNotFound(_) => ErrorKind::NotFound,
            ProductError::DatabaseError(_) | ProductError::Unknown(_) => ErrorKind::Internal,
        }
    }
}

impl From<anyhow::Error> for ProductError {
    fn from(err: anyhow::Error) -> Self {
        ProductError::Unknown(err.to_string())
    }
}
