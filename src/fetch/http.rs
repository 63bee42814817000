//! HTTP fetcher using wreq for TLS fingerprint emulation.

use super::{FetchedPage, PageFetcher, USER_AGENT};
use crate::error::ScrapeError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Browser-impersonating HTTP client. One GET per call, no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher, optionally routed through a proxy.
    pub fn new(proxy: Option<&str>) -> Result<Self, ScrapeError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url)
                .map_err(|e| ScrapeError::Network(format!("invalid proxy '{}': {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self { client: builder.build()? })
    }

    async fn send(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Connection", "keep-alive")
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Upstream answered 503; the request was most likely rate limited");
        }

        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, ScrapeError> {
        debug!("GET {}", url);

        match tokio::time::timeout(timeout, self.send(url)).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Network(format!(
                "request to {} timed out after {}s",
                url,
                timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/s"))
            .and(query_param("k", "laptop"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(None).unwrap();
        let page = fetcher.fetch(&format!("{}/s?k=laptop", mock_server.uri()), TIMEOUT).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<html>results</html>");
    }

    #[tokio::test]
    async fn test_fetch_reports_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>dogs</html>"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(None).unwrap();
        let page = fetcher.fetch(&mock_server.uri(), TIMEOUT).await.unwrap();

        assert_eq!(page.status, 503);
        assert!(!page.is_success());
        assert!(page.body.contains("dogs"));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(None).unwrap();
        let err = fetcher.fetch(&mock_server.uri(), Duration::from_millis(200)).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Network(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let fetcher = HttpFetcher::new(None).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:1/", TIMEOUT).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Network(_)));
    }
}
