//! Caller identity and the role policy applied at the HTTP boundary.
//!
//! Authorization is stateless: an [`Identity`] is derived from a bearer token
//! on every request and checked against the allow-list of the operation.

use std::fmt;
use std::str::FromStr;

use auth::Authenticator;
use thiserror::Error;

use crate::domain::errors::ErrorKind;
use crate::domain::user::models::UserId;

/// User role. Stored and embedded in tokens by its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    NormalUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::NormalUser => "normal_user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct RoleError(pub String);

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "normal_user" => Ok(Role::NormalUser),
            other => Err(RoleError(other.to_string())),
        }
    }
}

/// Roles allowed to mutate the product catalogue or list every account.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Roles allowed on self-service operations (profile, reviews).
pub const ANY_MEMBER: &[Role] = &[Role::Admin, Role::NormalUser];

/// Authenticated caller resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the caller may act on a resource owned by `owner`.
    pub fn owns_or_admin(&self, owner: &UserId) -> bool {
        self.user_id == *owner || self.is_admin()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Missing or malformed bearer token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Access denied: role '{role}' is not allowed")]
    RoleNotAllowed { role: Role },
}

impl AccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::MissingToken | AccessError::InvalidToken => ErrorKind::Unauthenticated,
            AccessError::RoleNotAllowed { .. } => ErrorKind::Forbidden,
        }
    }
}

/// Resolve a raw bearer token to an identity.
///
/// Fails closed: expiry, bad signature, malformed payload, a subject that is
/// not a user id and an unknown role all yield `InvalidToken`.
pub fn resolve_identity(
    authenticator: &Authenticator,
    token: &str,
) -> Result<Identity, AccessError> {
    let claims = authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Bearer token rejected");
        AccessError::InvalidToken
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        AccessError::InvalidToken
    })?;

    let role = claims.role.parse::<Role>().map_err(|e| {
        tracing::warn!(error = %e, "Token carries an unknown role");
        AccessError::InvalidToken
    })?;

    Ok(Identity { user_id, role })
}

/// Role policy predicate: exact match of `role` against `allowed`.
pub fn authorize(role: Role, allowed: &[Role]) -> Result<(), AccessError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AccessError::RoleNotAllowed { role })
    }
}
