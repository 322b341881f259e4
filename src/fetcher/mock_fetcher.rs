use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

use super::{PageFetcher, PageSession, RenderedPage};
use crate::core::JobConfig;
use crate::{ScraperError, ScraperResult};

#[derive(Clone)]
pub enum MockPage {
    Html(String),
    LaunchFailure(String),
    RenderFailure(String),
}

/// In-process fetcher serving canned HTML; counts launches and closes.
#[derive(Clone)]
pub struct MockFetcher {
    page: MockPage,
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn new(page: MockPage) -> Self {
        Self {
            page,
            launches: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_html(html: impl Into<String>) -> Self {
        Self::new(MockPage::Html(html.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockPage::RenderFailure(message.into()))
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

struct MockSession {
    page: MockPage,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl PageFetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn launch(&self) -> ScraperResult<Box<dyn PageSession>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if let MockPage::LaunchFailure(message) = &self.page {
            return Err(ScraperError::LaunchError(message.clone()));
        }

        Ok(Box::new(MockSession {
            page: self.page.clone(),
            closes: Arc::clone(&self.closes),
        }))
    }
}

#[async_trait]
impl PageSession for MockSession {
    async fn render(&mut self, url: &Url, _config: &JobConfig) -> ScraperResult<RenderedPage> {
        match &self.page {
            MockPage::Html(html) => Ok(RenderedPage::new(url.clone(), html.clone())),
            MockPage::LaunchFailure(message) | MockPage::RenderFailure(message) => {
                Err(ScraperError::NavigationError(message.clone()))
            }
        }
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
