use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password hashing and token issuance.
///
/// Holds the server secret and the access token lifetime; services receive it
/// behind an `Arc` and never see the key material.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl_hours: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with default Argon2 costs.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `token_ttl_hours` - Lifetime of issued access tokens
    pub fn new(jwt_secret: &[u8], token_ttl_hours: i64) -> Self {
        Self::with_hasher(jwt_secret, token_ttl_hours, PasswordHasher::new())
    }

    /// Create an authenticator around a preconfigured password hasher.
    pub fn with_hasher(
        jwt_secret: &[u8],
        token_ttl_hours: i64,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            password_hasher,
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl_hours,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against its stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue a signed access token for a subject and role.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(
        &self,
        subject: impl ToString,
        role: impl ToString,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject, role, self.token_ttl_hours);
        self.jwt_handler.encode(&claims)
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `JwtError` - Expired, forged or malformed token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::with_hasher(
            b"test_secret_key_at_least_32_bytes!",
            24,
            PasswordHasher::with_cost(1024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_verify_password_success() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("my_password").unwrap();

        assert!(authenticator.verify_password("my_password", &hash).is_ok());
    }

    #[test]
    fn test_verify_password_mismatch() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.verify_password("wrong_password", &hash);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator = authenticator();

        let token = authenticator.issue_token("user123", "normal_user").unwrap();
        let claims = authenticator.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.role, "normal_user");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_validate_token_from_other_secret() {
        let other = Authenticator::new(b"another_secret_key_at_least_32_bytes", 24);
        let token = other.issue_token("user123", "admin").unwrap();

        assert!(authenticator().validate_token(&token).is_err());
    }
}
