//! Termination signal handling for the weather poller.
//!
//! Handlers are installed by [`ShutdownSignal::register`], before the first
//! poll cycle runs. A signal delivered while a cycle is in flight is
//! therefore buffered and observed once the cycle finishes, instead of
//! taking the default action and killing the process mid-write.
//!
//! - **Unix:** SIGTERM and SIGINT, falling back to Ctrl+C if registration fails
//! - **Windows/other:** Ctrl+C via `tokio::signal::ctrl_c()`

use tracing::{info, warn};

#[cfg(unix)]
pub struct ShutdownSignal {
    sigterm: Option<tokio::signal::unix::Signal>,
    sigint: Option<tokio::signal::unix::Signal>,
}

#[cfg(unix)]
impl ShutdownSignal {
    pub fn register() -> Self {
        use tokio::signal::unix::{SignalKind, signal};

        // Registration may fail in restricted environments (containers, tests).
        let sigterm = signal(SignalKind::terminate())
            .map_err(|e| warn!(error = %e, "Could not register SIGTERM handler"))
            .ok();
        let sigint = signal(SignalKind::interrupt())
            .map_err(|e| warn!(error = %e, "Could not register SIGINT handler"))
            .ok();
        Self { sigterm, sigint }
    }

    /// Resolve on the first termination signal.
    pub async fn recv(&mut self) {
        match (self.sigterm.as_mut(), self.sigint.as_mut()) {
            (Some(sigterm), Some(sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM signal"),
                    _ = sigint.recv() => info!("Received SIGINT signal (Ctrl+C)"),
                }
            }
            (Some(sigterm), None) => {
                sigterm.recv().await;
                info!("Received SIGTERM signal");
            }
            (None, Some(sigint)) => {
                sigint.recv().await;
                info!("Received SIGINT signal (Ctrl+C)");
            }
            (None, None) => {
                warn!("No signal handlers registered, using ctrl_c fallback");
                ctrl_c().await;
            }
        }
    }
}

#[cfg(not(unix))]
pub struct ShutdownSignal;

#[cfg(not(unix))]
impl ShutdownSignal {
    pub fn register() -> Self {
        Self
    }

    pub async fn recv(&mut self) {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C signal"),
        Err(e) => {
            // Nothing left to wait on; keep polling until killed.
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    }
}
