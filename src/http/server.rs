//! HTTP server implementation.

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::{build_router, AppState};
use crate::error::{FolioError, Result};

/// HTTP server for the portfolio API.
pub struct HttpServer {
    /// Address to bind to
    addr: SocketAddr,
    /// Fully layered router
    router: Router,
}

impl HttpServer {
    /// Create a server for the given state.
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            router: build_router(state),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the server.
    ///
    /// This method will block until the server is shut down.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with graceful shutdown.
    ///
    /// The server stops accepting connections when `signal` resolves and
    /// returns once in-flight requests have finished.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr).await.map_err(|e| {
            error!(addr = %self.addr, error = %e, "Failed to bind listener");
            FolioError::Io(e)
        })?;

        info!(addr = %self.addr, "Starting HTTP server with graceful shutdown");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP server failed");
                FolioError::Io(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::InMemoryContentStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_shutdown_signal_stops_server() {
        let state = AppState::new(Arc::new(InMemoryContentStore::default()));
        let server = HttpServer::new("127.0.0.1:0".parse().unwrap(), state);
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");

        let result = server.serve_with_shutdown(async {}).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = occupied.local_addr().unwrap();

        let state = AppState::new(Arc::new(InMemoryContentStore::default()));
        let result = HttpServer::new(addr, state)
            .serve_with_shutdown(async {})
            .await;
        assert!(matches!(result, Err(FolioError::Io(_))));
    }
}
