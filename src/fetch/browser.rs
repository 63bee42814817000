//! Headless Chrome rendering for pages that populate listings with scripts.

use super::USER_AGENT;
use crate::error::ScrapeError;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What to do on a page before its markup is captured.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    /// Overlay close button to click if it shows up. Best-effort.
    pub dismiss: Option<String>,
    /// How long to wait for the overlay.
    pub dismiss_wait: Duration,
    /// Selector whose presence means the listing has rendered.
    pub ready: String,
    /// How long to wait for `ready` before giving up.
    pub ready_wait: Duration,
}

/// Trait for rendering a page in a browser - enables fakes in tests.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders `url` and returns its markup once `plan.ready` is present.
    ///
    /// Returns `Ok(None)` if the ready marker never appeared; only launch and
    /// navigation failures are errors.
    async fn render(&self, url: &str, plan: &RenderPlan) -> Result<Option<String>, ScrapeError>;
}

/// Launches a fresh headless Chrome per render and always tears it down.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    executable: Option<PathBuf>,
}

impl ChromeRenderer {
    /// Creates a renderer. Without an explicit executable chromiumoxide looks
    /// for a local Chrome/Chromium install.
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    fn browser_config(&self) -> Result<BrowserConfig, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", USER_AGENT));

        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(ScrapeError::Browser)
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn render(&self, url: &str, plan: &RenderPlan) -> Result<Option<String>, ScrapeError> {
        let mut session = BrowserSession::launch(self.browser_config()?).await?;

        let result = capture(&session.browser, url, plan).await;

        // Close before returning the result, error or not
        session.close().await;
        result
    }
}

/// A launched browser plus its event-handler task.
///
/// [`BrowserSession::close`] shuts Chrome down gracefully. If the session is
/// dropped without it (a panic or a cancelled request) the handler task is
/// aborted and chromiumoxide kills the child process.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: BrowserConfig) -> Result<Self, ScrapeError> {
        let (browser, mut handler) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    debug!("Browser handler error: {:?}", event);
                    break;
                }
            }
        });

        debug!("Browser launched");
        Ok(Self { browser, handler })
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Failed to wait for browser exit: {}", e);
        }
        debug!("Browser closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

async fn capture(browser: &Browser, url: &str, plan: &RenderPlan) -> Result<Option<String>, ScrapeError> {
    let page = browser.new_page(url).await?;
    info!("Waiting for page to render: {}", url);

    if let Some(dismiss) = &plan.dismiss {
        match wait_for_selector(&page, dismiss, plan.dismiss_wait).await {
            Some(button) => match button.click().await {
                Ok(_) => debug!("Login popup closed"),
                Err(e) => debug!("Login popup could not be clicked: {}", e),
            },
            None => debug!("No login popup appeared"),
        }
    }

    if wait_for_selector(&page, &plan.ready, plan.ready_wait).await.is_none() {
        warn!("Timed out waiting for product listings to appear");
        return Ok(None);
    }

    debug!("Product listings found");
    Ok(Some(page.content().await?))
}

/// Polls for `selector` with exponential backoff until `timeout` elapses.
async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> Option<Element> {
    let start = Instant::now();
    let mut delay = Duration::from_millis(50);

    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Some(element);
        }
        if start.elapsed() >= timeout {
            return None;
        }
        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(Duration::from_millis(500));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_builds() {
        // Building the config does not launch anything, but it does need a
        // Chrome executable to exist when none is given explicitly.
        let renderer = ChromeRenderer::new(Some(PathBuf::from("/usr/bin/true")));
        assert!(renderer.browser_config().is_ok());
    }

    fn never_ready_plan() -> RenderPlan {
        RenderPlan {
            dismiss: Some("button.close-login".to_string()),
            dismiss_wait: Duration::from_millis(200),
            ready: "div.listing-ready".to_string(),
            ready_wait: Duration::from_secs(1),
        }
    }

    const EMPTY_PAGE: &str = "data:text/html,<html><body><p>nothing rendered</p></body></html>";

    #[tokio::test]
    #[ignore] // Requires a local Chrome/Chromium
    async fn test_render_timeout_releases_browser() {
        let renderer = ChromeRenderer::new(std::env::var_os("CHROME_PATH").map(PathBuf::from));

        let result = renderer.render(EMPTY_PAGE, &never_ready_plan()).await.unwrap();
        assert!(result.is_none());

        // Same steps as render, keeping the session to inspect the child
        let mut session = BrowserSession::launch(renderer.browser_config().unwrap()).await.unwrap();
        let result = capture(&session.browser, EMPTY_PAGE, &never_ready_plan()).await.unwrap();
        assert!(result.is_none());

        session.close().await;
        let status = session.browser.try_wait().unwrap();
        assert!(status.is_some(), "Chrome still running after close");
    }
}
