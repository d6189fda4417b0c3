use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;

use crate::error::ExtractError;

/// Recipe sites aggressively block obvious bots; a realistic browser
/// user-agent and standard navigation headers get most pages through.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ExtractError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, BROWSER_USER_AGENT.parse()?);
        headers.insert(
            ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".parse()?,
        );
        headers.insert(ACCEPT_LANGUAGE, "en-US,en;q=0.9".parse()?);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the target page, following redirects. Timeouts surface as a
    /// distinct error so the caller can report "page took too long".
    pub async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Fetch of {url} returned status {status}");
            return Err(ExtractError::FetchStatus(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("<html>hello</html>")
            .create_async()
            .await;

        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();
        let body = fetcher.fetch(&format!("{}/page", server.url())).await.unwrap();
        assert_eq!(body, "<html>hello</html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = PageFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::FetchStatus(404)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_fetch_error() {
        let fetcher = PageFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:1/nothing").await.unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Fetch(_) | ExtractError::FetchTimeout
        ));
    }
}
