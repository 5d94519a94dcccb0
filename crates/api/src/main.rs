use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::Router;
use keygate_api::config::ServerConfig;
use keygate_api::notify::WebhookNotifier;
use keygate_api::routes::app_routes;
use keygate_api::state::AppState;
use keygate_db::Store;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "keygate_api=debug,keygate_db=debug,keygate_core=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let mut store = Store::new();
    store
        .open(&database_url, config.db_max_connect_attempts)
        .await
        .expect("failed to connect to database");
    let pool = store.pool().expect("store was just opened").clone();

    keygate_db::run_migrations(&pool)
        .await
        .expect("failed to run database migrations");

    let (notifier, notifier_handle) =
        WebhookNotifier::spawn(config.webhook.url.clone(), config.webhook.queue_capacity);
    let sink = Arc::new(notifier);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("HOST/PORT do not form a valid socket address");
    let cors = build_cors_layer(&config.cors_origins);
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let state = AppState::build(pool, config, sink.clone());

    let app = Router::new()
        .merge(app_routes())
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors);

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("server error");

    // Drain pending origin-change notifications: dropping the last sender
    // lets the worker finish its queue and exit.
    drop(sink);
    if tokio::time::timeout(Duration::from_secs(5), notifier_handle)
        .await
        .is_err()
    {
        tracing::warn!("notification worker did not drain within 5s, abandoning");
    }

    if let Err(e) = store.close().await {
        tracing::warn!(error = %e, "error closing database store");
    }
    tracing::info!("shutdown complete");
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        return layer;
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse::<HeaderValue>().ok())
        .collect();
    layer.allow_origin(parsed)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
