use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::user::models::UserId;
use crate::product::errors::DescriptionError;
use crate::product::errors::PriceError;
use crate::product::errors::ProductIdError;
use crate::product::errors::ProductTitleError;

/// Key prefix shared by every cached product listing.
pub const NAMESPACE: &str = "products";

/// Product aggregate entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: ProductTitle,
    pub description: Option<Description>,
    pub price: Price,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ProductIdError> {
        Uuid::parse_str(s)
            .map(ProductId)
            .map_err(|e| ProductIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product title, 3-150 characters, trimmed and stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTitle(String);

impl ProductTitle {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 150;

    pub fn new(title: String) -> Result<Self, ProductTitleError> {
        let title = title.trim().to_lowercase();
        let length = title.chars().count();

        if length < Self::MIN_LENGTH {
            Err(ProductTitleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(ProductTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Price in the store currency, inclusive range 0..=1 000 000.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 1_000_000.0;

    pub fn new(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(PriceError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Free-text product description, 3-1000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 1000;

    pub fn new(description: String) -> Result<Self, DescriptionError> {
        let length = description.trim().chars().count();

        if length < Self::MIN_LENGTH {
            Err(DescriptionError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(DescriptionError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(description))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to add a product to the catalogue.
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub title: ProductTitle,
    pub description: Option<Description>,
    pub price: Price,
}

/// Partial product update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductCommand {
    pub title: Option<ProductTitle>,
    pub description: Option<Description>,
    pub price: Option<Price>,
}

/// Listing filters as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub title: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductQuery {
    /// Reduce the filters to the ones that actually apply.
    ///
    /// A blank title is no filter; a price range only applies when both
    /// bounds are present.
    pub fn scope(&self) -> ProductScope {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        let price_range = match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        };

        ProductScope { title, price_range }
    }
}

/// Effective, normalized listing filter. Equal scopes share a cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductScope {
    /// Lower-cased substring matched case-insensitively
    pub title: Option<String>,
    /// Inclusive `(min, max)` price bounds
    pub price_range: Option<(f64, f64)>,
}

impl ProductScope {
    /// Deterministic cache key: `products:` followed by the scope as JSON.
    pub fn cache_key(&self) -> String {
        let scope = json!({
            "title": self.title,
            "price": self.price_range.map(|(min, max)| [min, max]),
        });
        format!("{}:{}", NAMESPACE, scope)
    }
}
