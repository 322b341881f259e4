use chrono::{SecondsFormat, Utc};
use log::{error, info};
use std::sync::Arc;

use super::base::{StorageBackend, StorageError, StorageItem};
use crate::report::{PersistedRecord, SeismicReport};
use crate::ScraperResult;

/// `2026-10-16T13:04:05.123Z`
pub fn batch_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Turns extracted reports into [`PersistedRecord`]s and upserts them in one
/// batch write.
#[derive(Clone)]
pub struct BatchPersister {
    storage: Arc<dyn StorageBackend>,
    collection: String,
}

impl BatchPersister {
    pub fn new(storage: Arc<dyn StorageBackend>, collection: impl Into<String>) -> Self {
        Self {
            storage,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub async fn persist(&self, reports: &[SeismicReport]) -> ScraperResult<Vec<PersistedRecord>> {
        self.persist_at(reports, &batch_timestamp()).await
    }

    /// Every record in the batch carries `scraped_at`.
    pub async fn persist_at(
        &self,
        reports: &[SeismicReport],
        scraped_at: &str,
    ) -> ScraperResult<Vec<PersistedRecord>> {
        let max = self.storage.max_batch_size();
        if reports.len() > max {
            return Err(StorageError::BatchTooLarge {
                size: reports.len(),
                max,
            }
            .into());
        }

        let records: Vec<PersistedRecord> = reports
            .iter()
            .map(|report| PersistedRecord::from_report(report, scraped_at))
            .collect();

        let items = records
            .iter()
            .map(|record| StorageItem::new(record.id.clone(), record))
            .collect::<Result<Vec<_>, _>>()?;

        if let Err(e) = self.storage.upsert_batch(&self.collection, items).await {
            error!("Error saving batch to {}: {}", self.collection, e);
            return Err(e.into());
        }

        info!(
            "Saved {} seismic reports to {}",
            records.len(),
            self.collection
        );
        Ok(records)
    }
}
