pub mod browser_fetcher;
pub mod http_fetcher;
pub mod mock_fetcher;

mod fetcher;
mod page;

pub use browser_fetcher::{BrowserFetcher, BrowserOptions};
pub use fetcher::{PageFetcher, PageSession, SessionGuard};
pub use http_fetcher::HttpFetcher;
pub use mock_fetcher::{MockFetcher, MockPage};
pub use page::RenderedPage;
