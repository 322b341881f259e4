#[cfg(feature = "mongodb")]
use super::MongoStorage;
use super::{DiskStorage, MemoryStorage, StorageBackend, StorageError, StorageItem};
use async_trait::async_trait;

pub enum StorageType {
    Disk {
        path: String,
    },
    Memory,
    #[cfg(feature = "mongodb")]
    Mongo {
        connection_string: String,
        database: String,
    },
}

#[derive(Clone)]
pub enum Storage {
    Disk(Box<DiskStorage>),
    Memory(Box<MemoryStorage>),
    #[cfg(feature = "mongodb")]
    Mongo(Box<MongoStorage>),
}

#[async_trait]
impl StorageBackend for Storage {
    fn max_batch_size(&self) -> usize {
        match self {
            Storage::Disk(storage) => storage.max_batch_size(),
            Storage::Memory(storage) => storage.max_batch_size(),
            #[cfg(feature = "mongodb")]
            Storage::Mongo(storage) => storage.max_batch_size(),
        }
    }

    async fn upsert_batch(
        &self,
        collection: &str,
        items: Vec<StorageItem>,
    ) -> Result<(), StorageError> {
        match self {
            Storage::Disk(storage) => storage.upsert_batch(collection, items).await,
            Storage::Memory(storage) => storage.upsert_batch(collection, items).await,
            #[cfg(feature = "mongodb")]
            Storage::Mongo(storage) => storage.upsert_batch(collection, items).await,
        }
    }
}

pub async fn create_storage(storage_type: StorageType) -> Result<Storage, StorageError> {
    match storage_type {
        StorageType::Disk { path } => Ok(Storage::Disk(Box::new(DiskStorage::new(path)?))),
        StorageType::Memory => Ok(Storage::Memory(Box::new(MemoryStorage::new()))),
        #[cfg(feature = "mongodb")]
        StorageType::Mongo {
            connection_string,
            database,
        } => Ok(Storage::Mongo(Box::new(
            MongoStorage::new(&connection_string, &database).await?,
        ))),
    }
}
