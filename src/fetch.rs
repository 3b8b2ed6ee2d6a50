//! HTTP retrieval of remote property images
//!
//! One shared blocking client per renderer; image bytes and the server's
//! Content-Type hint travel together so decoding can try the declared
//! format before sniffing.

use std::time::Duration;

use crate::error::{RendererError, RendererResult};

const FETCH_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("brochure-renderer/", env!("CARGO_PKG_VERSION"));

/// Raw downloaded image plus the Content-Type header, when the server sent one
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Blocking image downloader shared across all pages of one render call
pub struct ImageFetcher {
    client: reqwest::blocking::Client,
}

impl ImageFetcher {
    pub fn new() -> RendererResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RendererError::HttpError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Download one image. Non-success statuses and empty bodies are errors;
    /// callers degrade to a placeholder instead of failing the document.
    pub fn fetch(&self, url: &str) -> RendererResult<FetchedImage> {
        log::debug!("fetching image {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RendererError::HttpError(format!(
                "image request returned {} for {}",
                status, url
            )));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes()?.to_vec();
        if bytes.is_empty() {
            return Err(RendererError::HttpError(format!("empty response body for {}", url)));
        }
        Ok(FetchedImage { bytes, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_builds() {
        assert!(ImageFetcher::new().is_ok());
    }

    #[test]
    fn test_unreachable_host_is_an_error() {
        let fetcher = ImageFetcher::new().unwrap();
        // Port 1 refuses connections immediately
        let result = fetcher.fetch("http://127.0.0.1:1/photo.jpg");
        assert!(result.is_err());
    }
}
