use async_trait::async_trait;
use log::debug;
use url::Url;

use super::RenderedPage;
use crate::core::JobConfig;
use crate::ScraperResult;

/// Backend able to start a rendering session.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn launch(&self) -> ScraperResult<Box<dyn PageSession>>;
}

/// A live rendering resource (a browser process, a client) owned by a
/// single invocation.
#[async_trait]
pub trait PageSession: Send {
    /// Navigates to `url` and waits until `config.row_selector` is present.
    async fn render(&mut self, url: &Url, config: &JobConfig) -> ScraperResult<RenderedPage>;

    fn close(&mut self);
}

/// Owns a [`PageSession`] and closes it exactly once when dropped, whichever
/// way the owning scope exits.
pub struct SessionGuard {
    session: Box<dyn PageSession>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn PageSession>) -> Self {
        Self { session }
    }

    pub async fn render(&mut self, url: &Url, config: &JobConfig) -> ScraperResult<RenderedPage> {
        debug!("Rendering {} through guarded session", url);
        self.session.render(url, config).await
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.close();
        debug!("Session guard released");
    }
}
