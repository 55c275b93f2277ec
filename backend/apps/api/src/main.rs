//! API Server Entry Point
//!
//! Wires configuration, the database pool, migrations and the auth and
//! social routers. `anyhow` is confined to start-up; request handling
//! errors go through each context's error type.

use auth::presentation::AuthAppState;
use auth::{AuthConfig, PgAuthRepository, auth_router_with_state};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use social::{CloudinaryConfig, CloudinaryPhotoService, PgSocialRepository, social_router};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 31113;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;
    tracing::info!("Migrations completed");

    clear_expired_refresh_tokens(&pool).await;

    let app = build_app(pool);

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,social=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start-up housekeeping; a failure is logged and ignored
async fn clear_expired_refresh_tokens(pool: &PgPool) {
    match PgAuthRepository::new(pool.clone()).cleanup_expired().await {
        Ok(cleared) => {
            tracing::info!(refresh_tokens_cleared = cleared, "Startup cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Startup cleanup failed, continuing anyway");
        }
    }
}

fn build_app(pool: PgPool) -> Router {
    // A missing secret surfaces per request as a configuration error.
    let auth_config = AuthConfig::from_env();
    if auth_config.token_key.is_none() {
        tracing::warn!("JWT_SECRET is not set; logins and refreshes will fail");
    }
    let auth_state = AuthAppState::new(PgAuthRepository::new(pool.clone()), auth_config);
    let issuer = auth_state.issuer.clone();

    let cloudinary = CloudinaryConfig::from_env();
    if cloudinary.is_none() {
        tracing::warn!("Cloudinary credentials are not set; photo uploads will fail");
    }
    let photos = CloudinaryPhotoService::new(cloudinary);

    Router::new()
        .nest("/api/Auth", auth_router_with_state(auth_state))
        .nest(
            "/api",
            social_router(PgSocialRepository::new(pool), photos, issuer),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Credentialed CORS for the origins in `FRONTEND_ORIGINS`
///
/// Credentials are required so the browser sends the refresh cookie.
fn cors_layer() -> CorsLayer {
    let origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string());

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
