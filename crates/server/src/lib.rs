//! Finecheck Server - HTTP API for parking-fine appeal checks
//!
//! Exposes the `finecheck` pipeline over three routes. Each request is
//! independent; the only shared state is configuration, the completion
//! provider and the metrics handle.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - Service information
//! - `GET /health` - Liveness probe
//! - `GET /metrics` - Prometheus metrics
//! - `POST /api/appeal-check` - Assess an appeal: JSON `{fineDetails, appealReason}`
//! - `POST /api/extract-fine` - Read a fine notice: multipart with an `image` file
//!
//! Errors are returned as `{"error": "...", "details": "..."}`. `details` is
//! only present in the development environment.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
