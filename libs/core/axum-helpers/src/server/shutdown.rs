use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;

/// Broadcasts a single shutdown notification to every subscriber.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    tx: broadcast::Sender<()>,
    shutdown_initiated: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Relaxed)
    }

    /// Initiate shutdown. Only the first call notifies subscribers.
    pub fn shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Initiating graceful shutdown");
            let _ = self.tx.send(());
        }
    }

    /// Wait for SIGINT/SIGTERM, then initiate shutdown.
    pub async fn wait_for_signal(&self) {
        shutdown_signal().await;
        self.shutdown();
    }

    /// Resolves once shutdown has been initiated by anyone.
    pub async fn notified(&self) {
        let mut rx = self.subscribe();
        if self.is_shutting_down() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Completes on Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed that branch never completes, so the
/// other signal still works.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
