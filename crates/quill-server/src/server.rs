use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use quill_core::BlogService;
use quill_store::{DocumentStore, InMemoryDocumentStore};

use crate::config::QuillConfig;
use crate::error::ServerResult;
use crate::router::build_router;

/// Blog service host: one shared store handle behind the HTTP router.
pub struct QuillServer {
    config: QuillConfig,
    store: Arc<dyn DocumentStore>,
}

impl QuillServer {
    /// Server backed by a fresh in-memory store.
    pub fn new(config: QuillConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn with_store(config: QuillConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &QuillConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(BlogService::new(Arc::clone(&self.store)))
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.server.bind_addr).await?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves, then
    /// close the store.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(
            %addr,
            database = %self.config.store.database,
            "Quill server listening"
        );
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("server stopped, closing store");
        self.store.close().await?;
        Ok(())
    }
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
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
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn server_construction() {
        let server = QuillServer::new(QuillConfig::default());
        assert_eq!(
            server.config().server.bind_addr,
            "127.0.0.1:50051".parse::<SocketAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn shutdown_closes_store() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let server = QuillServer::with_store(QuillConfig::default(), store.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve_on(listener, async {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
        assert!(store.is_closed());
    }
}
