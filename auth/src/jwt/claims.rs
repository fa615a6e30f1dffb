use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token payload.
///
/// Carries the subject identifier and its role. `iat`/`exp` are Unix
/// timestamps; `exp` is mandatory and checked on every decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Role of the subject at issuance time
    pub role: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject expiring `ttl_hours` from now.
    ///
    /// # Arguments
    /// * `subject` - Unique subject identifier
    /// * `role` - Role name embedded in the token
    /// * `ttl_hours` - Hours until the token expires
    pub fn new(subject: impl ToString, role: impl ToString, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(ttl_hours);

        Self {
            sub: subject.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Override the expiration (Unix timestamp).
    #[cfg(test)]
    pub(crate) fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }
}
