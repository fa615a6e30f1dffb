use std::sync::Arc;

use auth::Authenticator;
use shop_service::config::Config;
use shop_service::domain::product::ports::ProductCache;
use shop_service::domain::product::service::ProductService;
use shop_service::domain::review::service::ReviewService;
use shop_service::domain::user::auth::AuthLinks;
use shop_service::domain::user::auth::AuthService;
use shop_service::domain::user::service::UserService;
use shop_service::inbound::http::router::create_router;
use shop_service::inbound::http::router::AppState;
use shop_service::outbound::cache::InMemoryProductCache;
use shop_service::outbound::cache::RedisProductCache;
use shop_service::outbound::mail::SmtpMailer;
use shop_service::outbound::repositories::PostgresProductRepository;
use shop_service::outbound::repositories::PostgresReviewRepository;
use shop_service::outbound::repositories::PostgresUserRepository;
use shop_service::outbound::storage::LocalImageStorage;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "shop-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        cache = config.cache.url.as_deref().unwrap_or("in-process"),
        smtp_host = %config.mail.smtp_host,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let product_repository = Arc::new(PostgresProductRepository::new(pg_pool.clone()));
    let review_repository = Arc::new(PostgresReviewRepository::new(pg_pool));
    let mailer = Arc::new(SmtpMailer::new(&config.mail)?);
    let image_storage = Arc::new(LocalImageStorage::new(
        &config.uploads.directory,
        config.uploads.max_bytes,
    ));

    let auth_service = AuthService::new(
        Arc::clone(&user_repository),
        mailer,
        Arc::clone(&authenticator),
        AuthLinks {
            verify_email_base_url: config.links.verify_email_base_url.clone(),
            reset_password_base_url: config.links.reset_password_base_url.clone(),
        },
    )
    .with_login_notifications(config.mail.notify_on_login);

    let product_cache: Arc<dyn ProductCache> = match config.cache.url.as_deref() {
        Some(url) => Arc::new(RedisProductCache::connect(url, config.cache.ttl_seconds).await?),
        None => {
            tracing::warn!("No cache URL configured, product listings cached in-process");
            Arc::new(InMemoryProductCache::new())
        }
    };

    let user_service = UserService::new(
        Arc::clone(&user_repository),
        image_storage,
        Arc::clone(&product_cache),
        Arc::clone(&authenticator),
    );
    let product_service = ProductService::new(Arc::clone(&product_repository), product_cache);

    let review_service = ReviewService::new(review_repository, product_repository);

    let state = AppState {
        auth_service: Arc::new(auth_service),
        user_service: Arc::new(user_service),
        product_service: Arc::new(product_service),
        review_service: Arc::new(review_service),
        authenticator,
        max_upload_bytes: config.uploads.max_bytes,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    tracing::info!("Server exited");
    Ok(())
}
