//! Live adapter that downloads generated image bytes over HTTP.

use std::time::Duration;

use reqwest::Client;

use crate::error::{from_reqwest, MandalaError};
use crate::ports::image_fetcher::{FetchFuture, FetchedImage, ImageFetcher};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches image bytes with a plain GET. No authentication; the locator
/// URLs are pre-signed by the generation service.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create a new fetcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, MandalaError> {
        let client =
            Client::builder().timeout(FETCH_TIMEOUT).build().map_err(MandalaError::Network)?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| from_reqwest(e, "image fetch"))?;

            // A non-2xx body is an error page, not image data.
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(MandalaError::Api { status: status.as_u16(), message });
            }

            let data = response
                .bytes()
                .await
                .map_err(|e| from_reqwest(e, "image fetch body"))?
                .to_vec();

            Ok(FetchedImage { data })
        })
    }
}
