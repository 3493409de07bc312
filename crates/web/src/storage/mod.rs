//! Filename-addressed blob storage behind the `/files/` endpoint.
//!
//! The router only needs three operations, captured by [`BlobStore`]:
//! existence check, whole-blob read and whole-blob overwrite. Concurrent
//! writers to the same name are not coordinated; the last write wins.
//!
//! - [`FsBlobStore`]: files in a directory chosen at startup
//! - [`MemoryBlobStore`]: an in-process map, used when no directory is configured

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use thiserror::Error;

mod fs;
mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid blob name: {name:?}")]
    InvalidName { name: String },

    #[error("blob not found: {name}")]
    NotFound { name: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StorageError {
    pub fn invalid_name<S: ToString>(name: S) -> Self {
        Self::InvalidName { name: name.to_string() }
    }

    pub fn not_found<S: ToString>(name: S) -> Self {
        Self::NotFound { name: name.to_string() }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn exists(&self, name: &str) -> bool;

    async fn read(&self, name: &str) -> Result<Bytes, StorageError>;

    /// Stores `content` under `name`, replacing any previous blob.
    async fn write(&self, name: &str, content: Bytes) -> Result<(), StorageError>;
}
