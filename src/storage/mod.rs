pub mod base;
pub mod disk;
pub mod factory;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod persister;

pub use base::{StorageBackend, StorageError, StorageItem, MAX_BATCH_SIZE};
pub use disk::DiskStorage;
pub use factory::{create_storage, Storage, StorageType};
pub use memory::MemoryStorage;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStorage;
pub use persister::{batch_timestamp, BatchPersister};
