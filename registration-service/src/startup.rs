//! Application startup and lifecycle management.

use axum::middleware::from_fn;
use axum::routing::{delete, get, patch};
use axum::Router;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{cache_control_middleware, request_id_middleware};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::services::{
    metrics::track_http, DashboardService, Database, InvoiceService, RegistrationService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub registrations: RegistrationService,
    pub invoices: InvoiceService,
    pub dashboard: DashboardService,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration: connect the pool,
    /// run migrations, wire services and routes.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        db.run_migrations().await?;

        Self::with_database(config, db).await
    }

    /// Build against an already-connected database (used by tests).
    pub async fn with_database(config: Config, db: Database) -> Result<Self, AppError> {
        let state = AppState {
            registrations: RegistrationService::new(db.clone()),
            invoices: InvoiceService::new(db.clone()),
            dashboard: DashboardService::new(db.clone()),
            db,
            config: config.clone(),
        };

        let router = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await?;
        let port = listener
            .local_addr()
            .map_err(|e| AppError::InternalError(e.into()))?
            .port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        tracing::info!(port = self.port, "Listening");
        axum::serve(self.listener, self.router)
            .await
            .map_err(|e| AppError::InternalError(e.into()))?;

        Ok(())
    }
}

fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/dashboard/stats", get(handlers::dashboard::get_stats))
        .route(
            "/registrations",
            get(handlers::registrations::list_registrations)
                .post(handlers::registrations::create_registration),
        )
        .route(
            "/registrations/all",
            get(handlers::registrations::list_all_registrations),
        )
        .route(
            "/registrations/:id/status",
            patch(handlers::registrations::update_registration_status),
        )
        .route(
            "/registrations/:id",
            delete(handlers::registrations::delete_registration),
        )
        .route(
            "/invoices",
            get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
        )
        .route(
            "/invoices/:id",
            patch(handlers::invoices::update_invoice)
                .delete(handlers::invoices::delete_invoice),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/api", api)
        .layer(from_fn(cache_control_middleware))
        .layer(from_fn(track_http))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
