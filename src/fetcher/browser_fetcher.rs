use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::{block_in_place, spawn_blocking};
use url::Url;

use super::{PageFetcher, PageSession, RenderedPage};
use crate::core::JobConfig;
use crate::{ScraperError, ScraperResult};

/// Launch flags for small, locked-down hosts (serverless functions,
/// containers without /dev/shm or a GPU).
const CONSTRAINED_ARGS: &[&str] = &[
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-background-networking",
    "--no-first-run",
    "--no-zygote",
    "--single-process",
    "--hide-scrollbars",
    "--mute-audio",
];

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub executable_path: Option<PathBuf>,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub args: Vec<String>,
    pub idle_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            executable_path: None,
            headless: true,
            window_size: (1920, 1080),
            args: CONSTRAINED_ARGS.iter().map(|arg| arg.to_string()).collect(),
            idle_timeout: Duration::from_secs(120),
        }
    }
}

impl BrowserOptions {
    pub fn with_executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

/// Renders pages in headless Chrome.
#[derive(Debug, Clone, Default)]
pub struct BrowserFetcher {
    options: BrowserOptions,
}

impl BrowserFetcher {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    fn start(options: &BrowserOptions) -> ScraperResult<(Browser, Arc<Tab>)> {
        let launch_options = LaunchOptions {
            headless: options.headless,
            sandbox: false,
            window_size: Some(options.window_size),
            path: options.executable_path.clone(),
            args: options.args.iter().map(OsStr::new).collect(),
            idle_browser_timeout: options.idle_timeout,
            ..LaunchOptions::default()
        };

        let browser =
            Browser::new(launch_options).map_err(|e| ScraperError::LaunchError(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScraperError::LaunchError(e.to_string()))?;

        Ok((browser, tab))
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn launch(&self) -> ScraperResult<Box<dyn PageSession>> {
        info!("Launching headless browser");
        if let Some(path) = &self.options.executable_path {
            debug!("Using browser executable at {}", path.display());
        }

        let options = self.options.clone();
        let (browser, tab) = spawn_blocking(move || Self::start(&options)).await??;

        Ok(Box::new(BrowserSession {
            browser: Some(browser),
            tab,
        }))
    }
}

struct BrowserSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

fn navigate(tab: &Tab, url: &str, config: &JobConfig) -> ScraperResult<String> {
    tab.set_default_timeout(config.navigation_timeout);

    info!("Navigating to: {}", url);
    tab.navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| ScraperError::NavigationError(e.to_string()))?;

    info!("Waiting for the table...");
    if let Err(e) =
        tab.wait_for_element_with_custom_timeout(&config.row_selector, config.selector_timeout)
    {
        warn!("Selector '{}' never appeared: {}", config.row_selector, e);
        return Err(ScraperError::SelectorTimeout {
            selector: config.row_selector.clone(),
            timeout: config.selector_timeout,
        });
    }

    tab.get_content()
        .map_err(|e| ScraperError::ExtractionError(e.to_string()))
}

#[async_trait]
impl PageSession for BrowserSession {
    async fn render(&mut self, url: &Url, config: &JobConfig) -> ScraperResult<RenderedPage> {
        let tab = Arc::clone(&self.tab);
        let target = url.to_string();
        let config = config.clone();

        let html = spawn_blocking(move || navigate(&tab, &target, &config)).await??;
        debug!("Rendered {} ({} bytes)", url, html.len());

        Ok(RenderedPage::new(url.clone(), html))
    }

    fn close(&mut self) {
        // Dropping the last handle kills the Chrome process and joins its
        // reader threads.
        if let Some(browser) = self.browser.take() {
            release_blocking(browser);
            info!("Browser session closed");
        }
    }
}

/// Drops `value` off the async scheduler where the runtime allows it.
/// `block_in_place` panics on a current-thread runtime, so there the drop
/// happens inline.
fn release_blocking<T>(value: T) {
    let multi_thread = Handle::try_current()
        .map(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread)
        .unwrap_or(false);

    if multi_thread {
        block_in_place(move || drop(value));
    } else {
        drop(value);
    }
}
