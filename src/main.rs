use sqlx::postgres::PgPoolOptions;
use subscription_aggregator::storage::SubscriptionStore;
use subscription_aggregator::{router, AppConfig, AppState};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Subscription Aggregator");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Server: {}", config.bind_addr());
    info!("   - Max DB connections: {}", config.database.max_connections);

    // Connect to the database
    info!("💾 Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    info!("✅ Database pool ready");

    let state = AppState {
        store: SubscriptionStore::new(pool.clone()),
    };
    let app = router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   POST   /subscriptions         - Create subscription");
    info!("   GET    /subscriptions         - List subscriptions");
    info!("   GET    /subscriptions/total   - Sum of prices");
    info!("   GET    /subscriptions/{{id}}    - Get subscription");
    info!("   PUT    /subscriptions/{{id}}    - Update subscription");
    info!("   DELETE /subscriptions/{{id}}    - Delete subscription");
    info!("   GET    /swagger-ui            - API docs");
    info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("👋 Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
