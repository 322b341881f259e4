use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use super::base::{StorageBackend, StorageError, StorageItem};

/// One pretty-printed JSON file per key under `<base>/<collection>/`.
/// Files are written beside their target and renamed into place, so a
/// reader never sees a half-written document.
#[derive(Clone)]
pub struct DiskStorage {
    base_path: PathBuf,
}

impl DiskStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn document_path(&self, collection: &str, key: &str) -> PathBuf {
        self.base_path
            .join(collection)
            .join(format!("{}.json", key))
    }
}

fn validate_segment(segment: &str) -> Result<(), StorageError> {
    let valid = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(segment.to_string()))
    }
}

#[async_trait]
impl StorageBackend for DiskStorage {
    async fn upsert_batch(
        &self,
        collection: &str,
        items: Vec<StorageItem>,
    ) -> Result<(), StorageError> {
        validate_segment(collection)?;
        for item in &items {
            validate_segment(&item.key)?;
        }

        let dir = self.base_path.join(collection);
        fs::create_dir_all(&dir).await?;

        for item in items {
            let final_path = self.document_path(collection, &item.key);
            let tmp_path = dir.join(format!(".{}.{}.tmp", item.key, Uuid::now_v7()));

            fs::write(&tmp_path, serde_json::to_string_pretty(&item.data)?).await?;
            fs::rename(&tmp_path, &final_path).await?;
            debug!("Wrote {}", final_path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_storage() -> (DiskStorage, PathBuf) {
        let dir = std::env::temp_dir().join(format!("seismoscraper-{}", Uuid::now_v7()));
        (DiskStorage::new(&dir).unwrap(), dir)
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_document() {
        let (storage, dir) = temp_storage();

        storage
            .upsert_batch(
                "quakes",
                vec![
                    StorageItem::new("abc", &json!({"magnitude": 4.5})).unwrap(),
                    StorageItem::new("def", &json!({"magnitude": "N/D"})).unwrap(),
                ],
            )
            .await
            .unwrap();
        storage
            .upsert_batch(
                "quakes",
                vec![StorageItem::new("abc", &json!({"magnitude": 4.7})).unwrap()],
            )
            .await
            .unwrap();

        let stored: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(storage.document_path("quakes", "abc")).unwrap(),
        )
        .unwrap();
        assert_eq!(stored, json!({"magnitude": 4.7}));

        let files: Vec<_> = std::fs::read_dir(dir.join("quakes"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files.len(), 2);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let (storage, dir) = temp_storage();

        let result = storage
            .upsert_batch(
                "quakes",
                vec![StorageItem::new("../escape", &json!({})).unwrap()],
            )
            .await;
        assert_eq!(
            result,
            Err(StorageError::InvalidKey("../escape".to_string()))
        );
        assert!(!dir.join("quakes").exists());

        std::fs::remove_dir_all(dir).unwrap();
    }
}
