use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::product::models::ProductId;
use crate::domain::user::models::UserId;
use crate::review::errors::CommentError;
use crate::review::errors::PageError;
use crate::review::errors::RatingError;
use crate::review::errors::ReviewIdError;

/// Review aggregate entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: Rating,
    pub comment: Comment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewId(pub Uuid);

impl ReviewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, ReviewIdError> {
        Uuid::parse_str(s)
            .map(ReviewId)
            .map_err(|e| ReviewIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Star rating, 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(i16);

impl Rating {
    const MIN: i16 = 1;
    const MAX: i16 = 5;

    pub fn new(value: i64) -> Result<Self, RatingError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as i16))
        } else {
            Err(RatingError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            })
        }
    }

    pub fn value(&self) -> i16 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment(String);

impl Comment {
    const MAX_LENGTH: usize = 2000;

    pub fn new(comment: String) -> Result<Self, CommentError> {
        if comment.trim().is_empty() {
            return Err(CommentError::Empty);
        }

        let length = comment.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(CommentError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(comment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct CreateReviewCommand {
    pub rating: Rating,
    pub comment: Comment,
}

/// Partial update of a review by its author.
#[derive(Debug, Clone, Default)]
pub struct UpdateReviewCommand {
    pub rating: Option<Rating>,
    pub comment: Option<Comment>,
}

/// One page of the newest-first review listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    per_page: u32,
}

impl Page {
    pub const DEFAULT_PER_PAGE: u32 = 10;
    pub const MAX_PER_PAGE: u32 = 100;

    /// # Errors
    /// * `ZeroPage` - Page numbers start at 1
    /// * `PerPageOutOfRange` - Page size is 0 or above the maximum
    pub fn new(number: u32, per_page: u32) -> Result<Self, PageError> {
        if number == 0 {
            return Err(PageError::ZeroPage);
        }
        if per_page == 0 || per_page > Self::MAX_PER_PAGE {
            return Err(PageError::PerPageOutOfRange {
                max: Self::MAX_PER_PAGE,
                actual: per_page,
            });
        }
        Ok(Self { number, per_page })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.per_page) * u64::from(self.number - 1)
    }

    /// Rows to take.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}
