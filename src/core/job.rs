use chrono::Utc;
use log::{debug, error, info};
use std::future::Future;
use std::sync::Arc;

use super::{InvocationResponse, JobConfig, ScraperError, ScraperResult};
use crate::fetcher::{PageFetcher, SessionGuard};
use crate::parser::ReportParser;
use crate::stats::{RunStats, StatsTracker};
use crate::storage::{batch_timestamp, BatchPersister, StorageBackend};

/// One scheduled run: fetch, extract, cap, hash and persist.
pub struct SeismicJob {
    fetcher: Box<dyn PageFetcher>,
    parser: ReportParser,
    persister: BatchPersister,
    config: JobConfig,
}

impl SeismicJob {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        storage: Arc<dyn StorageBackend>,
        config: JobConfig,
    ) -> ScraperResult<Self> {
        info!("Initializing seismic job with {} fetcher", fetcher.name());
        config.validate()?;
        if config.max_records > storage.max_batch_size() {
            return Err(ScraperError::ConfigError(format!(
                "max_records {} exceeds the store batch limit of {}",
                config.max_records,
                storage.max_batch_size()
            )));
        }

        Ok(Self {
            fetcher,
            parser: ReportParser::new(&config.row_selector)?,
            persister: BatchPersister::new(storage, config.collection.clone()),
            config,
        })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Builds the job with `setup` and runs it. A setup failure (bad
    /// configuration, unreachable store) comes back as a 500 response too.
    pub async fn invoke<F>(setup: F) -> InvocationResponse
    where
        F: Future<Output = ScraperResult<SeismicJob>>,
    {
        match setup.await {
            Ok(job) => job.run().await,
            Err(e) => {
                error!("Job setup failed: {}", e);
                InvocationResponse::failure(e)
            }
        }
    }

    /// Never fails: errors come back as a 500 response.
    pub async fn run(&self) -> InvocationResponse {
        self.run_with_stats().await.0
    }

    pub async fn run_with_stats(&self) -> (InvocationResponse, RunStats) {
        let stats = StatsTracker::new();
        info!("Starting seismic report scraping...");

        let response = match self.execute(&stats).await {
            Ok(response) => response,
            Err(e) => {
                error!("Scraping failed: {}", e);
                stats.record_failure();
                InvocationResponse::failure(e)
            }
        };

        stats.finish();
        stats.log_summary();
        (response, stats.get_stats())
    }

    async fn execute(&self, stats: &StatsTracker) -> ScraperResult<InvocationResponse> {
        // Closed when this scope exits, on every path below.
        let mut session = SessionGuard::new(self.fetcher.launch().await?);

        let started = Utc::now();
        let page = session.render(&self.config.url, &self.config).await?;
        stats.record_fetch(Utc::now() - started);

        let outcome = self.parser.parse(&page);
        stats.record_extraction(
            outcome.rows_seen,
            outcome.rows_dropped,
            outcome.reports.len(),
        );

        if outcome.reports.is_empty() {
            info!("No seismic reports found on the page");
            return Ok(InvocationResponse::empty());
        }

        let mut reports = outcome.reports;
        reports.truncate(self.config.max_records);
        info!("Saving only the latest {} reports", reports.len());
        debug!(
            "Report ids: {:?}",
            reports.iter().map(|r| &r.report_id).collect::<Vec<_>>()
        );

        let timestamp = batch_timestamp();
        let records = self.persister.persist_at(&reports, &timestamp).await?;
        stats.record_persisted(records.len());

        Ok(InvocationResponse::success(reports, timestamp))
    }
}
