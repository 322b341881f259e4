use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use seismoscraper::fetcher::{BrowserFetcher, BrowserOptions, HttpFetcher};
use seismoscraper::storage::{create_storage, StorageType};
use seismoscraper::{JobConfig, PageFetcher, ScraperError, ScraperResult, SeismicJob};

fn build_fetcher() -> ScraperResult<Box<dyn PageFetcher>> {
    match env::var("SEISMO_FETCHER").as_deref() {
        Ok("http") => Ok(Box::new(HttpFetcher::new()?)),
        Ok("browser") | Err(_) => {
            let mut options = BrowserOptions::default();
            if let Ok(path) = env::var("CHROME_PATH") {
                options = options.with_executable_path(path);
            }
            Ok(Box::new(BrowserFetcher::new(options)))
        }
        Ok(other) => Err(ScraperError::ConfigError(format!(
            "unknown SEISMO_FETCHER '{}'",
            other
        ))),
    }
}

fn storage_type() -> ScraperResult<StorageType> {
    match env::var("SEISMO_STORAGE").as_deref() {
        Ok("disk") | Err(_) => Ok(StorageType::Disk {
            path: env::var("SEISMO_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        }),
        Ok("memory") => Ok(StorageType::Memory),
        #[cfg(feature = "mongodb")]
        Ok("mongo") => Ok(StorageType::Mongo {
            connection_string: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| "seismic".to_string()),
        }),
        Ok(other) => Err(ScraperError::ConfigError(format!(
            "unknown SEISMO_STORAGE '{}'",
            other
        ))),
    }
}

async fn build_job() -> ScraperResult<SeismicJob> {
    let config = JobConfig::from_env()?;
    let fetcher = build_fetcher()?;
    let storage = create_storage(storage_type()?).await?;

    SeismicJob::new(fetcher, Arc::new(storage), config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .filter_module("headless_chrome", log::LevelFilter::Warn)
        .init();

    let response = SeismicJob::invoke(build_job()).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
