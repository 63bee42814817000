//! Diagnostic capture of raw page bodies on failure paths.
//!
//! When a page yields nothing usable, the raw markup is handed to a
//! [`DiagnosticSink`] under a fixed artifact name (e.g.
//! `amazon_no_results.html`) so it can be inspected by hand later.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Receives raw bodies for later inspection. Implementations never fail the
/// scrape; write errors are logged.
pub trait DiagnosticSink: Send + Sync {
    fn capture(&self, artifact: &str, body: &str);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn capture(&self, artifact: &str, body: &str) {
        debug!("Dropping diagnostic artifact {} ({} bytes)", artifact, body.len());
    }
}

/// Writes each artifact as a file in a directory, overwriting older copies.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DiagnosticSink for FileSink {
    fn capture(&self, artifact: &str, body: &str) {
        let path = self.dir.join(artifact);

        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!("Cannot create diagnostics directory {}: {}", self.dir.display(), e);
            return;
        }

        match std::fs::write(&path, body) {
            Ok(()) => warn!("Response saved to {} for inspection", path.display()),
            Err(e) => warn!("Failed to save diagnostic artifact {}: {}", path.display(), e),
        }
    }
}

/// Builds the sink for an optional debug directory.
pub fn sink_for(dir: Option<&Path>) -> Arc<dyn DiagnosticSink> {
    match dir {
        Some(dir) => Arc::new(FileSink::new(dir)),
        None => Arc::new(NullSink),
    }
}
