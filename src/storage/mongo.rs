use async_trait::async_trait;
use log::debug;
use mongodb::bson::{doc, to_document};
use mongodb::options::ReplaceOneModel;
use mongodb::{Client, Namespace};

use super::base::{StorageBackend, StorageError, StorageItem};

/// Documents keyed by `_id`, written with a single client-level bulk write
/// of replace-one-with-upsert models.
///
/// `Client::bulk_write` issues the `bulkWrite` admin command, which needs a
/// MongoDB 8.0 or newer server. Older servers reject the whole batch.
#[derive(Clone)]
pub struct MongoStorage {
    database_name: String,
    client: Client,
}

impl MongoStorage {
    pub async fn new(connection_string: &str, database_name: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(connection_string)
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;
        Ok(Self {
            database_name: database_name.to_string(),
            client,
        })
    }
}

impl From<mongodb::bson::ser::Error> for StorageError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}

impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        StorageError::OperationError(err.to_string())
    }
}

#[async_trait]
impl StorageBackend for MongoStorage {
    async fn upsert_batch(
        &self,
        collection: &str,
        items: Vec<StorageItem>,
    ) -> Result<(), StorageError> {
        let namespace = Namespace {
            db: self.database_name.clone(),
            coll: collection.to_string(),
        };

        let models = items
            .into_iter()
            .map(|item| {
                let mut document = to_document(&item.data)?;
                document.insert("_id", item.key.clone());
                Ok(ReplaceOneModel::builder()
                    .namespace(namespace.clone())
                    .filter(doc! { "_id": item.key })
                    .replacement(document)
                    .upsert(true)
                    .build())
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        let count = models.len();
        self.client.bulk_write(models).await?;
        debug!("Upserted {} documents into {}", count, namespace);

        Ok(())
    }
}
