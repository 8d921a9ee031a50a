//! HTTP fetcher implementation
//!
//! One GET per record, no retries and no timeout beyond the client default.
//! A 404 is an expected outcome for delisted partners and is reported as
//! [`FetchResult::NotFound`] rather than an error.

use crate::config::CrawlerConfig;
use crate::TransportError;
use reqwest::{Client, StatusCode};

/// Result of a fetch that reached the server
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Requested URL
        url: String,
        /// Raw response body
        body: Vec<u8>,
    },

    /// Server answered HTTP 404
    NotFound {
        /// Requested URL
        url: String,
    },
}

/// Builds an HTTP client with the configured user agent
///
/// # Example
///
/// ```no_run
/// use partner_crawl::crawler::build_http_client;
///
/// let client = build_http_client("partner-crawl/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches partner pages by record id
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    config: CrawlerConfig,
}

impl PageFetcher {
    /// Creates a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(&config.user_agent)?,
            config: config.clone(),
        })
    }

    /// Renders the page URL for a record id
    pub fn page_url(&self, id: &str) -> String {
        self.config.page_url(id)
    }

    /// Fetches the page for `id`
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResult::Success)` - 2xx response, full body
    /// * `Ok(FetchResult::NotFound)` - HTTP 404
    /// * `Err(TransportError::Status)` - Any other non-success status
    /// * `Err(TransportError::Request)` - Connection or body read failure
    pub async fn fetch(&self, id: &str) -> Result<FetchResult, TransportError> {
        let url = self.page_url(id);
        tracing::info!("Requesting {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(TransportError::Request { url, source }),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(FetchResult::NotFound { url });
        }

        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }

        match response.bytes().await {
            Ok(body) => Ok(FetchResult::Success {
                url,
                body: body.to_vec(),
            }),
            Err(source) => Err(TransportError::Request { url, source }),
        }
    }
}
