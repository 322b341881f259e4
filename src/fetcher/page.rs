use chrono::prelude::*;
use url::Url;

/// DOM snapshot of a page once the row selector is present.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub url: Url,
    pub html: String,
    pub timestamp: DateTime<Utc>,
}

impl RenderedPage {
    pub fn new(url: Url, html: String) -> Self {
        Self {
            url,
            html,
            timestamp: Utc::now(),
        }
    }
}
