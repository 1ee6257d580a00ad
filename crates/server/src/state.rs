use crate::config::ServerConfig;
use finecheck::CompletionProvider;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Completion provider used by both API routes
    pub provider: Arc<dyn CompletionProvider>,

    /// Prometheus render handle, present once a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: ServerConfig, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Whether internal error detail may be echoed to clients
    pub fn expose_error_details(&self) -> bool {
        self.config.expose_error_details()
    }
}
