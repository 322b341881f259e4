use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{header, Client, ClientBuilder};
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use super::{PageFetcher, PageSession, RenderedPage};
use crate::core::JobConfig;
use crate::{ScraperError, ScraperResult};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum HttpFetcherError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] header::InvalidHeaderName),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}

impl From<HttpFetcherError> for ScraperError {
    fn from(err: HttpFetcherError) -> Self {
        ScraperError::LaunchError(err.to_string())
    }
}

/// Plain GET fetcher for pages whose table is rendered server-side.
/// No JavaScript runs, so a missing row selector counts as a wait timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, HttpFetcherError> {
        let client = ClientBuilder::new()
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Result<Self, HttpFetcherError> {
        let mut header_map = header::HeaderMap::new();
        header_map.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(DEFAULT_USER_AGENT),
        );

        for (key, value) in headers {
            let name = header::HeaderName::from_bytes(key.as_bytes())?;
            let value = header::HeaderValue::from_str(value)?;
            header_map.insert(name, value);
        }

        self.client = ClientBuilder::new().default_headers(header_map).build()?;

        Ok(self)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn launch(&self) -> ScraperResult<Box<dyn PageSession>> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
        }))
    }
}

struct HttpSession {
    client: Client,
}

fn has_rows(html: &str, row_selector: &str) -> ScraperResult<bool> {
    let selector = Selector::parse(row_selector).map_err(|e| {
        ScraperError::ExtractionError(format!("invalid selector '{}': {}", row_selector, e))
    })?;
    Ok(Html::parse_document(html).select(&selector).next().is_some())
}

#[async_trait]
impl PageSession for HttpSession {
    async fn render(&mut self, url: &Url, config: &JobConfig) -> ScraperResult<RenderedPage> {
        info!("Navigating to: {}", url);
        let response = self
            .client
            .get(url.clone())
            .timeout(config.navigation_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        debug!("Received {} bytes from {}", html.len(), url);

        if !has_rows(&html, &config.row_selector)? {
            warn!("Selector '{}' not present in static page", config.row_selector);
            return Err(ScraperError::SelectorTimeout {
                selector: config.row_selector.clone(),
                timeout: config.selector_timeout,
            });
        }

        Ok(RenderedPage::new(url.clone(), html))
    }

    fn close(&mut self) {
        debug!("HTTP session closed");
    }
}
