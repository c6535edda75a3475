//! The status HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{Logger, Severity};

use super::config::ApiConfig;
use super::provider::StatusProvider;
use super::routes::status_routes;

/// Read-only HTTP server over a status provider.
pub struct StatusServer {
    config: ApiConfig,
    router: Router,
}

impl StatusServer {
    pub fn new(config: ApiConfig, provider: Arc<dyn StatusProvider>) -> Self {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new().allow_origin(Any).allow_methods(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
        };
        let router = status_routes(provider).layer(cors);
        Self { config, router }
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Router access for in-process testing.
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until the shutdown future resolves; in-flight requests finish.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("bad bind address: {}", e))
        })?;
        let listener = TcpListener::bind(addr).await?;
        Logger::log(
            Severity::Info,
            "api.listening",
            &[("addr", &addr.to_string())],
        );
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Serve forever.
    pub async fn serve(self) -> std::io::Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::DefaultStatusProvider;

    use super::*;

    #[test]
    fn test_server_builds_with_default_config() {
        let server = StatusServer::new(
            ApiConfig::default(),
            Arc::new(DefaultStatusProvider::new()),
        );
        assert_eq!(server.socket_addr(), "127.0.0.1:7640");
        let _router = server.router();
    }

    #[test]
    fn test_server_with_configured_origins() {
        let config = ApiConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..Default::default()
        };
        let server = StatusServer::new(config, Arc::new(DefaultStatusProvider::new()));
        let _router = server.router();
    }
}
