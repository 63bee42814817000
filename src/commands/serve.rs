//! Serve command: runs the HTTP API.

use crate::api::{self, AppState};
use crate::config::Config;
use crate::scrapers;
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

/// Binds the API listener and serves until the process is stopped.
pub struct ServeCommand {
    config: Config,
}

impl ServeCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<()> {
        let scrapers = scrapers::build_all(&self.config).context("Failed to create HTTP client")?;
        let state = AppState::new(scrapers);
        let retailers: Vec<_> = state.retailers().iter().map(ToString::to_string).collect();

        let addr = self.config.listen_addr();
        let listener = TcpListener::bind(&addr).await.with_context(|| format!("Failed to bind {}", addr))?;
        let local = listener.local_addr().context("Failed to read listener address")?;

        info!("Retailers enabled: {}", retailers.join(", "));
        if let Some(dir) = &self.config.debug_dir {
            info!("Saving failed pages to {}", dir.display());
        }
        println!("Listening on http://{}", local);

        axum::serve(listener, api::router(state)).await.context("Server error")?;
        Ok(())
    }
}
