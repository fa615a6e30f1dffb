//! Authentication utilities library
//!
//! Provides the credential primitives shared by services:
//! - Password hashing (Argon2id, fresh salt per hash)
//! - Access tokens (HS256 JWT carrying subject + role)
//! - Opaque single-use tokens for email verification and password reset
//!
//! Services define their own domain errors and adapt these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", 24);
//! let token = auth.issue_token("user123", "admin").unwrap();
//! let claims = auth.validate_token(&token).unwrap();
//! assert_eq!(claims.role, "admin");
//! ```
//!
//! ## Single-use Tokens
//! ```
//! let token = auth::token::generate_token();
//! assert!(auth::token::tokens_match(&token, &token));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
