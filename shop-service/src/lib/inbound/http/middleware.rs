use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::identity::authorize;
use crate::domain::identity::resolve_identity;
use crate::domain::identity::AccessError;
use crate::domain::identity::Identity;
use crate::domain::identity::Role;
use crate::inbound::http::router::AppState;

/// Validate the bearer token and store the caller's [`Identity`] in the
/// request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;
    let identity = resolve_identity(&state.authenticator, token)?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Reject callers whose role is not in the route group's allow-list.
///
/// Must run after [`authenticate`].
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .copied()
        .ok_or(AccessError::MissingToken)?;

    authorize(identity.role, allowed).map_err(|e| {
        tracing::warn!(user_id = %identity.user_id, role = %identity.role, "Role not allowed");
        e
    })?;

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, AccessError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(AccessError::MissingToken)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AccessError::MissingToken)?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AccessError::MissingToken)
}
