//! PUKATU Backend Server
//!
//! Raffle platform backend: storefront listings, transactional number
//! reservation, manual payment reconciliation, and the admin dashboard.

use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use pukatu_server::auth::AuthService;
use pukatu_server::config::Config;
use pukatu_server::db;
use pukatu_server::lottery::LotteryService;
use pukatu_server::lucky::LuckyClient;
use pukatu_server::middleware;
use pukatu_server::purchase::{pending_expiry_sweeper, PurchaseService};
use pukatu_server::routes;
use pukatu_server::state::AppState;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    let db_pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        config.jwt_secret.clone(),
        config.jwt_access_token_ttl_seconds,
        config.jwt_refresh_token_ttl_days,
    ));
    let lottery_service = Arc::new(LotteryService::new(db_pool.clone()));
    let purchase_service = Arc::new(PurchaseService::new(db_pool.clone()));
    let lucky_client = LuckyClient::new(
        config.lucky_api_url.clone(),
        config.lucky_api_key.clone(),
    );

    if let (Some(email), Some(password)) =
        (&config.superadmin_email, &config.superadmin_password)
    {
        if let Err(e) = auth_service.ensure_superadmin(email, password).await {
            tracing::error!("Failed to seed superadmin: {}", e);
            std::process::exit(1);
        }
    }

    // Numbers held by never-confirmed purchases are released on a timer.
    if config.pending_purchase_ttl_hours > 0 {
        let sweeper_service = purchase_service.clone();
        let ttl_hours = config.pending_purchase_ttl_hours;
        tokio::spawn(async move {
            pending_expiry_sweeper(sweeper_service, ttl_hours).await;
        });
    } else {
        tracing::warn!("Pending-purchase expiry is disabled");
    }

    let app_state = AppState::new(
        db_pool,
        auth_service,
        lottery_service,
        purchase_service,
        lucky_client,
    );

    let rate_limiter = middleware::RateLimiter::new(config.rate_limit_rps);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::auth_routes())
        .merge(routes::lottery_routes())
        .merge(routes::purchase_routes())
        .merge(routes::admin_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(axum::middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            async move { middleware::rate_limit(limiter, req, next).await }
        }))
        .layer(configure_cors(&config));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

async fn root() -> &'static str {
    "PUKATU API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> axum::Json<HealthResponse> {
    let database = match db::check_health(&state.db_pool).await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let Some(allowed) = config
        .cors_allowed_origins
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
