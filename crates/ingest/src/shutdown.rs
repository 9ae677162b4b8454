//! Graceful shutdown coordination
//!
//! A thin wrapper over `tokio_util::sync::CancellationToken`: one controller
//! per process, child tokens handed to every processor, cancellation driven
//! by SIGINT/SIGTERM or triggered manually.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller that cancels on SIGINT or SIGTERM.
    pub fn with_signals() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();
        tokio::spawn(async move {
            if let Err(err) = wait_for_signal().await {
                warn!(error = %err, "failed to install signal handlers");
                return;
            }
            info!("shutdown signal received, draining processors");
            token.cancel();
        });
        controller
    }

    /// Token cancelled when this controller shuts down; cancelling the child
    /// does not affect the parent.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger shutdown without a signal.
    pub fn shutdown(&self) {
        info!("manual shutdown triggered");
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn wait_for_shutdown(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = interrupt.recv() => {}
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_shutdown_cancels_children() {
        let controller = ShutdownController::new();
        let child = controller.child_token();
        assert!(!controller.is_cancelled());

        controller.shutdown();
        assert!(controller.is_cancelled());
        assert!(child.is_cancelled());
        controller.wait_for_shutdown().await;
    }

    #[tokio::test]
    async fn test_child_cancellation_does_not_propagate_up() {
        let controller = ShutdownController::new();
        let child = controller.child_token();
        child.cancel();
        assert!(!controller.is_cancelled());
    }
}
