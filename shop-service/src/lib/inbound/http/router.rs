use std::sync::Arc;
use std::time::Duration;

use ::auth::Authenticator;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth;
use super::handlers::products;
use super::handlers::reviews;
use super::handlers::users;
use super::middleware::authenticate;
use super::middleware::require_roles;
use crate::domain::identity::ADMIN_ONLY;
use crate::domain::identity::ANY_MEMBER;
use crate::domain::product::ports::ProductServicePort;
use crate::domain::review::ports::ReviewServicePort;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserServicePort;

/// Multipart framing allowance on top of the configured image size.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub user_service: Arc<dyn UserServicePort>,
    pub product_service: Arc<dyn ProductServicePort>,
    pub review_service: Arc<dyn ReviewServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub max_upload_bytes: usize,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/users/auth/register", post(auth::register))
        .route("/api/users/auth/login", post(auth::login))
        .route(
            "/api/users/verify-email/:user_id/:token",
            get(auth::verify_email),
        )
        .route("/api/users/forgot-password", post(auth::forgot_password))
        .route(
            "/api/users/reset-password/:user_id/:token",
            get(auth::check_reset_link),
        )
        .route("/api/users/reset-password", post(auth::reset_password))
        .route("/api/products", get(products::list_products))
        .route("/api/products/:id", get(products::get_product))
        .route("/api/reviews", get(reviews::list_reviews));

    // Any valid token, no role restriction
    let authenticated_routes = Router::new()
        .route("/api/users/current-user", get(users::current_user))
        .route(
            "/api/users/upload-image",
            post(users::upload_image).layer(DefaultBodyLimit::max(
                state.max_upload_bytes + UPLOAD_OVERHEAD_BYTES,
            )),
        )
        .route(
            "/api/users/images/remove-profile-image",
            delete(users::remove_profile_image),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    let admin_routes = Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/products", post(products::create_product))
        .route(
            "/api/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    let member_routes = Router::new()
        .route("/api/users", put(users::update_user))
        .route("/api/users/:id", delete(users::delete_user))
        .route(
            "/api/reviews/:id",
            post(reviews::create_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route_layer(middleware::from_fn_with_state(ANY_MEMBER, require_roles))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .merge(member_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
