use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::storage::{BlobStore, StorageError};

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn exists(&self, name: &str) -> bool {
        self.blobs.read().await.contains_key(name)
    }

    async fn read(&self, name: &str) -> Result<Bytes, StorageError> {
        self.blobs.read().await.get(name).cloned().ok_or_else(|| StorageError::not_found(name))
    }

    async fn write(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        self.blobs.write().await.insert(name.to_owned(), content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read() {
        let store = MemoryBlobStore::new();
        assert!(!store.exists("a").await);
        assert!(matches!(store.read("a").await, Err(StorageError::NotFound { .. })));

        store.write("a", Bytes::from_static(b"one")).await.unwrap();
        store.write("a", Bytes::from_static(b"two")).await.unwrap();

        assert!(store.exists("a").await);
        assert_eq!(&store.read("a").await.unwrap()[..], b"two");
    }
}
