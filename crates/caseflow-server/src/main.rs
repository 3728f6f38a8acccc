//! Caseflow workflow engine - REST server binary.
//!
//! ## Endpoints
//!
//! - `POST /auth/token`, `POST /auth/register`, `GET /auth/me`
//! - `POST /cases/` - open a case (case + process + initial step)
//! - `GET /cases`, `GET /cases/{caseno}` - ownership-filtered reads
//! - `GET /cases/{caseno}/current-step`, `GET /cases/{caseno}/steps`
//! - `POST /steps/{step_id}/close` - advance the workflow
//! - `GET /steps`, `GET /processes` - admin inspection
//! - `POST /processes/{processno}/data/`, process-data listings
//! - CRUD on the definition catalog (process types, definitions, tasks,
//!   task rules, process data types, statuses)

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caseflow_db::DbContext;
use caseflow_server::config::{AppState, Config};
use caseflow_server::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caseflow=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    info!("Starting caseflow server");
    info!("Database schema: {}", config.database.schema);
    info!("Binding to: {}", bind_addr);

    // Connect, migrate, build shared state
    let pool = caseflow_db::connect(&config.database).await?;
    let db = DbContext::new(pool);
    db.migrate().await?;
    let state = AppState::new(config, db);

    let app = routes::router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Caseflow server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGINT or SIGTERM).
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
