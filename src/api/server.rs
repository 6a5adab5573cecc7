use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::handlers::{amenities, auth, places, reviews, users};
use crate::auth::JwtKeys;
use crate::config::{Config, StorageBackend};
use crate::db::{create_pool, Repositories};
use crate::domain::HbnbFacade;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<HbnbFacade>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(facade: HbnbFacade, jwt: JwtKeys) -> Self {
        Self {
            facade: Arc::new(facade),
            jwt,
        }
    }
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_target(false)
                .with_span_events(fmt::format::FmtSpan::CLOSE),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn,tower=warn")),
        )
        .init();
}

/// Open the configured store, seed the admin if requested, and build state
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let repos = match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Repositories::in_memory()
        }
        StorageBackend::Sqlite => {
            info!(database_url = %config.database_url, "Using SQLite storage");
            Repositories::sqlite(create_pool(&config.database_url).await?)
        }
    };

    let facade = HbnbFacade::new(repos, config.password_hasher()?);

    if let Some(seed) = &config.admin_seed {
        let (admin, created) = facade.ensure_admin(seed).await?;
        if admin.is_admin {
            info!(user_id = %admin.id, created, "Admin account ready");
        } else {
            warn!(user_id = %admin.id, "No admin account: seed email is taken by a regular user");
        }
    }

    Ok(AppState::new(facade, config.jwt_keys()))
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route(
            "/users",
            get(users::list_users_handler).post(users::create_user_handler),
        )
        .route(
            "/users/{id}",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/amenities",
            get(amenities::list_amenities_handler).post(amenities::create_amenity_handler),
        )
        .route(
            "/amenities/{id}",
            get(amenities::get_amenity_handler)
                .put(amenities::update_amenity_handler)
                .delete(amenities::delete_amenity_handler),
        )
        .route(
            "/places",
            get(places::list_places_handler).post(places::create_place_handler),
        )
        .route(
            "/places/{id}",
            get(places::get_place_handler)
                .put(places::update_place_handler)
                .delete(places::delete_place_handler),
        )
        .route("/places/{id}/reviews", get(places::list_place_reviews_handler))
        .route(
            "/reviews",
            get(reviews::list_reviews_handler).post(reviews::create_review_handler),
        )
        .route(
            "/reviews/{id}",
            get(reviews::get_review_handler)
                .put(reviews::update_review_handler)
                .delete(reviews::delete_review_handler),
        );

    Router::new()
        .nest("/api/v1", api)
        // Health check endpoint
        .route("/health", get(health_check))
        .with_state(state)
        // Add tracing layer for observability
        .layer(TraceLayer::new_for_http())
}

pub async fn create_app(config: &Config) -> anyhow::Result<Router> {
    Ok(router(build_state(config).await?))
}

async fn health_check() -> &'static str {
    "OK"
}

pub async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    let config = Config::from_env()?;
    info!(environment = ?config.environment, storage = ?config.storage, "Starting HBnB server");

    // Set up ctrl-c handler for graceful shutdown
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutting down gracefully..."),
            Err(e) => {
                tracing::error!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    let app = create_app(&config).await?;

    let addr = config.bind_addr();
    info!("Server listening on {}", addr);

    // Run the server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
