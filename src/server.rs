//! Server composition root
//!
//! Wires repositories, the lock manager and the services together
//! according to configuration, then runs the HTTP server and the expiry
//! sweeper until the process is asked to stop. A single cancellation
//! token fans the stop request out to every long-running task.

use std::sync::Arc;
use std::time::Duration;

use sea_orm_migration::MigratorTrait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::application::locking::SlotLockManager;
use crate::application::{
    AvailabilityService, ExpirySweeper, IdempotencyService, ReservationService,
};
use crate::config::{AppConfig, DbType};
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{
    init_database, DatabaseConfig, InMemoryLockStore, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};
use crate::interfaces::http::{create_api_router, ApiState};

/// Cancel the token once the OS asks the process to stop (SIGTERM on
/// unix, Ctrl-C everywhere).
async fn cancel_on_termination(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable, relying on Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Ctrl-C received, stopping"),
        _ = terminate => info!("SIGTERM received, stopping"),
    }
    shutdown.cancel();
}

/// Run the reservation engine until a termination signal arrives.
pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let repos: Arc<dyn RepositoryProvider> = match config.database.driver {
        DbType::Memory => {
            info!("Using in-memory repositories (no persistence)");
            Arc::new(InMemoryRepositoryProvider::new())
        }
        _ => {
            let db = init_database(&DatabaseConfig {
                url: config.database.connection_url(),
            })
            .await?;
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
            Arc::new(SeaOrmRepositoryProvider::new(db))
        }
    };

    let locks = Arc::new(SlotLockManager::new(
        Arc::new(InMemoryLockStore::new()),
        Duration::from_secs(config.locks.ttl_seconds),
    ));

    let reservations = Arc::new(ReservationService::new(
        repos.clone(),
        locks,
        config.booking.clone(),
    ));
    let availability = Arc::new(AvailabilityService::new(
        repos.clone(),
        config.booking.clone(),
    ));
    let idempotency = Arc::new(IdempotencyService::new(repos.clone()));

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_termination(shutdown.clone()));

    let _sweeper = ExpirySweeper::new(
        reservations.clone(),
        shutdown.clone(),
        Duration::from_secs(config.booking.expiry_sweep_interval_secs),
    )
    .spawn();

    let router = create_api_router(ApiState {
        reservations,
        availability,
        idempotency,
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);
    info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    let graceful = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            graceful.cancelled().await;
            info!("API server draining connections");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
