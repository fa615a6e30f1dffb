use std::fmt;

/// Stable, machine-checkable failure category shared by every domain error.
///
/// The HTTP boundary maps each kind to exactly one status code; the
/// snake_case name is part of the response body and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Duplicate registration or an operation with nothing to act on
    Conflict,
    /// Unknown email or wrong password on login (never told apart)
    InvalidCredential,
    NotFound,
    /// Verification or reset token absent or mismatched
    InvalidToken,
    /// Missing, expired or malformed bearer token
    Unauthenticated,
    /// Valid identity, insufficient role or ownership
    Forbidden,
    /// Mail transport failure
    TransientDependency,
    /// Malformed input rejected before reaching a service
    Validation,
    /// Database, hashing or other infrastructure fault
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidCredential => "invalid_credential",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidToken => "invalid_token",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::TransientDependency => "transient_dependency",
            ErrorKind::Validation => "validation",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
