//! Finecheck Server binary
//!
//! Loads configuration from `.env`, an optional `finecheck` config file and
//! `FINECHECK_*` environment variables, then serves until shutdown.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Start server
    server::start_server(config).await?;

    Ok(())
}
