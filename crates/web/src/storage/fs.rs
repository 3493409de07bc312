use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;

use crate::storage::{BlobStore, StorageError};

/// Blobs stored as files directly inside `root`.
///
/// Names are plain file names; anything that could address a path outside
/// `root` is rejected with [`StorageError::InvalidName`].
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let invalid = name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(StorageError::invalid_name(name));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn exists(&self, name: &str) -> bool {
        match self.resolve(name) {
            Ok(path) => tokio::fs::metadata(&path).await.is_ok_and(|metadata| metadata.is_file()),
            Err(_) => false,
        }
    }

    async fn read(&self, name: &str) -> Result<Bytes, StorageError> {
        let path = self.resolve(name)?;
        let content = tokio::fs::read(&path).await?;
        trace!(path = %path.display(), size = content.len(), "read blob");
        Ok(Bytes::from(content))
    }

    async fn write(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, &content).await?;
        trace!(path = %path.display(), size = content.len(), "write blob");
        Ok(())
    }
}
