//! # Boxoffice Web Server
//!
//! HTTP surface for the event and reservation services: routing, body
//! decoding, error-to-status mapping, CORS, security headers, request
//! tracing and optional static and upload directories.

use axum::{
    Router,
    http::{HeaderName, HeaderValue},
    routing::get,
};
use configuration::{DatabaseConfig, ServerConfig, StorageBackend};
use database::{DbError, DbRepository, EventStore, MemoryStore, ReservationStore};
use services::{EventService, ReservationService, SystemClock};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

pub mod error;
pub mod extract;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventService>,
    pub reservations: Arc<ReservationService>,
}

impl AppState {
    /// Wires both services over the given stores. The reservation service
    /// resolves events through the event service.
    pub fn new(events: Arc<dyn EventStore>, reservations: Arc<dyn ReservationStore>) -> Self {
        let event_service = Arc::new(EventService::new(events));
        let reservation_service = ReservationService::new(
            reservations,
            event_service.clone(),
            Arc::new(SystemClock),
        );
        Self {
            events: event_service,
            reservations: Arc::new(reservation_service),
        }
    }
}

/// Builds the application state on the configured storage backend.
pub async fn build_state(cfg: &DatabaseConfig) -> Result<AppState, DbError> {
    match cfg.backend {
        StorageBackend::Postgres => {
            let pool = database::connect(cfg).await?;
            let repo = Arc::new(DbRepository::new(pool));
            Ok(AppState::new(repo.clone(), repo))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown.");
            let store = Arc::new(MemoryStore::new());
            Ok(AppState::new(store.clone(), store))
        }
    }
}

/// Security headers set on every response unless a handler already set them.
/// `Cross-Origin-Resource-Policy` is left out so other origins can embed
/// uploaded files.
const SECURITY_HEADERS: [(&str, &str); 11] = [
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Defines the application routes. Files under `uploads_dir` are served at
/// `/uploads`; other unmatched paths fall through to `static_dir`.
pub fn build_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    let mut app = Router::new()
        .route(
            "/eventos",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/eventos/:event_id",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .route(
            "/reservas",
            get(handlers::list_reservations).post(handlers::create_reservation),
        )
        .route(
            "/reservas/:reservation_id",
            get(handlers::get_reservation)
                .put(handlers::update_reservation)
                .delete(handlers::delete_reservation),
        )
        .with_state(state);

    if let Some(dir) = &server.uploads_dir {
        tracing::info!(dir = %dir.display(), "Serving uploads.");
        app = app.nest_service("/uploads", ServeDir::new(dir));
    }
    if let Some(dir) = &server.static_dir {
        tracing::info!(dir = %dir.display(), "Serving static files.");
        app = app.fallback_service(ServeDir::new(dir));
    }

    for (name, value) in SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }

    app.layer(cors).layer(TraceLayer::new_for_http())
}

/// Resolves the configured host (IPv4, IPv6 or a name) and port to the
/// address to bind.
pub async fn resolve_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| anyhow::anyhow!("{host} did not resolve to any address"))
}

/// Binds `addr` and serves `app` until the process is stopped.
pub async fn run_server(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
