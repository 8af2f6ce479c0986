pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

use {
    adapters::{cancel, checkout, midtrans::webhook},
    axum::{
        Router,
        extract::DefaultBodyLimit,
        http::{HeaderName, Method, StatusCode, header},
        routing::{get, post},
    },
    config::PublicMidtransConfig,
    domain::{auth::AuthVerifier, provider::PaymentGateway, store::OrderStore},
    std::{sync::Arc, time::Duration},
    tower_http::{
        cors::{Any, CorsLayer},
        timeout::TimeoutLayer,
        trace::TraceLayer,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub auth: Arc<dyn AuthVerifier>,
    pub midtrans_server_key: Arc<str>,
    pub frontend_origin: Arc<str>,
    pub client_config: Arc<PublicMidtransConfig>,
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ]);

    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/midtrans-callback", post(webhook::callback_handler))
        .route("/api/midtrans-callback", post(webhook::callback_handler))
        .route("/api/cancel-order", post(cancel::cancel_handler))
        .route(
            "/api/generate-snap-token",
            post(checkout::snap_token_handler),
        )
        .route("/api/midtrans-config", get(checkout::client_config_handler))
        .layer(DefaultBodyLimit::max(64 * 1024)) // 64 KB, notifications are ~2 KB
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
