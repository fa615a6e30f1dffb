use thiserror::Error;

use crate::domain::errors::ErrorKind;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is blank")]
    Blank,

    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters")]
    TooLong { max: usize },
}

/// Error for plaintext password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for outbound mail delivery
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Failed to build email: {0}")]
    BuildFailed(String),

    #[error("Failed to deliver email: {0}")]
    DeliveryFailed(String),
}

/// Error for profile image storage
#[derive(Debug, Clone, Error)]
pub enum ImageStorageError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image too large: maximum {max} bytes")]
    TooLarge { max: usize },

    #[error("Image storage I/O failed: {0}")]
    Io(String),
}

/// Top-level error for account and authentication operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("There is no pending email verification")]
    NoPendingVerification,

    #[error("Invalid verification link")]
    InvalidVerificationToken,

    #[error("Invalid reset password link")]
    InvalidResetLink,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("There is no profile image")]
    NoProfileImage,

    // Dependency errors
    #[error("Email could not be sent, please try again: {0}")]
    Mail(#[from] MailerError),

    #[error("Image storage error: {0}")]
    ImageStorage(#[from] ImageStorageError),

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_) => ErrorKind::Validation,
            UserError::ImageStorage(ImageStorageError::UnsupportedType(_))
            | UserError::ImageStorage(ImageStorageError::TooLarge { .. }) => ErrorKind::Validation,
            UserError::NotFound(_) | UserError::NoProfileImage => ErrorKind::NotFound,
            UserError::EmailAlreadyExists(_) | UserError::NoPendingVerification => {
                ErrorKind::Conflict
            }
            UserError::InvalidCredentials => ErrorKind::InvalidCredential,
            UserError::InvalidVerificationToken | UserError::InvalidResetLink => {
                ErrorKind::InvalidToken
            }
            UserError::Forbidden(_) => ErrorKind::Forbidden,
            UserError::Mail(_) => ErrorKind::TransientDependency,
            UserError::ImageStorage(_)
            | UserError::Hashing(_)
            | UserError::TokenIssuance(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ErrorKind::Internal,
        }
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}

impl From<auth::PasswordError> for UserError {
    fn from(err: auth::PasswordError) -> Self {
        UserError::Hashing(err.to_string())
    }
}
