use {
    catalist_pay::{
        AppState,
        adapters::{midtrans::client::MidtransGateway, supabase_auth::SupabaseAuth},
        config::Config,
        infra::postgres::PgStore,
        router,
    },
    sqlx::postgres::PgPoolOptions,
    std::{sync::Arc, time::Duration},
    tokio::signal,
    tracing_subscriber::EnvFilter,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().expect("invalid configuration");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");
        tracing::info!("migrations applied");
    }

    let gateway = MidtransGateway::new(
        &config.midtrans.server_key,
        config.midtrans.is_production,
        config.midtrans.timeout,
    )
    .expect("failed to build midtrans client");
    let auth = SupabaseAuth::new(
        &config.supabase.url,
        &config.supabase.service_key,
        config.midtrans.timeout,
    )
    .expect("failed to build auth client");

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        gateway: Arc::new(gateway),
        auth: Arc::new(auth),
        midtrans_server_key: config.midtrans.server_key.as_str().into(),
        frontend_origin: config.frontend_origin.as_str().into(),
        client_config: Arc::new(config.midtrans.public()),
    };

    let app = router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!(
        addr = %config.bind_addr,
        production = config.midtrans.is_production,
        "listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
