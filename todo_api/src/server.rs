use std::time::Duration;

use axum::Router;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::core::TodoService;
use crate::migration::Migrator;
use crate::routes::{AppState, router};

/// Install the global `tracing` subscriber.
///
/// Falls back to `info` when `filter` is not a valid directive string.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Connect and bring the schema up to date.
///
/// # Errors
///
/// Returns the database error from connecting or migrating.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Wire the service and router around an open, migrated connection.
///
/// # Errors
///
/// Returns the database error if seeding the id generator fails.
pub async fn build_router(
    db: DatabaseConnection,
    request_timeout: Duration,
) -> Result<Router, DbErr> {
    let service = TodoService::new(db, request_timeout).await?;
    Ok(router(AppState::new(service)))
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
