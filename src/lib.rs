pub mod core;
pub mod fetcher;
pub mod parser;
pub mod report;
pub mod stats;
pub mod storage;

pub use crate::core::{
    InvocationResponse, JobConfig, ResponseBody, ScraperError, ScraperResult, SeismicJob,
};
pub use fetcher::{PageFetcher, PageSession, RenderedPage, SessionGuard};
pub use parser::ReportParser;
pub use report::{Magnitude, PersistedRecord, SeismicReport};
pub use stats::StatsTracker;
pub use storage::{BatchPersister, StorageBackend};
