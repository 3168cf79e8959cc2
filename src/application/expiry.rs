//! Pending-hold expiry sweeper.
//!
//! The reservation service already sweeps opportunistically before each
//! write; this task bounds how long a stale hold can linger on a quiet
//! system by sweeping on a fixed interval until the engine shuts down.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::application::reservations::ReservationService;

/// Periodic sweep over pending holds whose TTL elapsed.
pub struct ExpirySweeper {
    service: Arc<ReservationService>,
    shutdown: CancellationToken,
    sweep_interval: Duration,
}

impl ExpirySweeper {
    pub fn new(
        service: Arc<ReservationService>,
        shutdown: CancellationToken,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            service,
            shutdown,
            sweep_interval,
        }
    }

    /// Run the sweep loop on its own task until the token is cancelled.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        info!(
            interval_secs = self.sweep_interval.as_secs(),
            "Hold expiry sweeper started"
        );

        let mut ticker = tokio::time::interval(self.sweep_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.service.expire_pending().await {
                        Ok(0) => {}
                        Ok(count) => info!(count, "Expiry sweep cancelled overdue holds"),
                        Err(e) => warn!(error = %e, "Expiry sweep failed"),
                    }
                }
                _ = self.shutdown.cancelled() => {
                    info!("Hold expiry sweeper stopped");
                    return;
                }
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
