use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use super::{ScraperError, ScraperResult};

pub const DEFAULT_URL: &str = "https://ultimosismo.igp.gob.pe/ultimo-sismo/sismos-reportados";
pub const DEFAULT_COLLECTION: &str = "Reportes_Sismos_IGP";
pub const DEFAULT_ROW_SELECTOR: &str = "table tbody tr";
pub const DEFAULT_MAX_RECORDS: usize = 10;
/// Upper bound on `max_records`; one invocation never persists more.
pub const MAX_RECORDS_LIMIT: usize = 10;

/// Everything one invocation of [`SeismicJob`](super::SeismicJob) needs to know.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub url: Url,
    pub collection: String,
    pub row_selector: String,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
    pub max_records: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default URL is valid"),
            collection: DEFAULT_COLLECTION.to_string(),
            row_selector: DEFAULT_ROW_SELECTOR.to_string(),
            navigation_timeout: Duration::from_secs(60),
            selector_timeout: Duration::from_secs(30),
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl JobConfig {
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = url;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_row_selector(mut self, selector: impl Into<String>) -> Self {
        self.row_selector = selector.into();
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_selector_timeout(mut self, timeout: Duration) -> Self {
        self.selector_timeout = timeout;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    /// Defaults overlaid with the `SEISMO_*` environment variables.
    pub fn from_env() -> ScraperResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> ScraperResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("SEISMO_URL") {
            config.url = Url::parse(&url)?;
        }
        if let Some(collection) = lookup("SEISMO_COLLECTION") {
            config.collection = collection;
        }
        if let Some(max) = lookup("SEISMO_MAX_RECORDS") {
            config.max_records = parse_var("SEISMO_MAX_RECORDS", &max)?;
        }
        if let Some(secs) = lookup("SEISMO_NAV_TIMEOUT_SECS") {
            config.navigation_timeout =
                Duration::from_secs(parse_var("SEISMO_NAV_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("SEISMO_SELECTOR_TIMEOUT_SECS") {
            config.selector_timeout =
                Duration::from_secs(parse_var("SEISMO_SELECTOR_TIMEOUT_SECS", &secs)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that could only fail once the browser is running.
    pub fn validate(&self) -> ScraperResult<()> {
        if !(1..=MAX_RECORDS_LIMIT).contains(&self.max_records) {
            return Err(ScraperError::ConfigError(format!(
                "max_records must be between 1 and {}, got {}",
                MAX_RECORDS_LIMIT, self.max_records
            )));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> ScraperResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScraperError::ConfigError(format!("invalid value for {}: '{}'", key, value)))
}
