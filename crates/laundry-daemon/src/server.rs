//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::{DaemonConfig, StorageConfig};
use crate::error::{DaemonError, DaemonResult};
use crate::storage::{InMemoryStorage, Storage};
use laundry_relay::EventBus;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Laundry Daemon Server
pub struct Server {
    config: DaemonConfig,
    storage: Arc<dyn Storage>,
    bus: Arc<EventBus>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let storage: Arc<dyn Storage> = match config.storage {
            StorageConfig::Memory => Arc::new(InMemoryStorage::new()),
        };

        let bus = Arc::new(EventBus::new(
            config.events.channel_capacity,
            config.events.history_limit,
        ));

        Ok(Self {
            config,
            storage,
            bus,
        })
    }

    /// Application state shared by every handler
    pub fn state(&self) -> AppState {
        AppState::new(self.storage.clone(), self.bus.clone(), &self.config)
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        // Create router
        let app = create_router(self.state());

        // Create listener
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Laundry daemon listening on {}", addr);
        if !self.config.auth.enabled() {
            tracing::warn!("No API tokens configured; API is open");
        }

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Laundry daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
