//! Command line configuration.
//!
//! ```bash
//! petit-web --directory /tmp/files
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::storage::{BlobStore, FsBlobStore, MemoryBlobStore};

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "petit-web")]
#[command(about = "Serves echo, user-agent and file endpoints on localhost:4221", long_about = None)]
pub struct Config {
    /// Directory backing `/files/`; blobs are kept in memory when omitted
    #[arg(long)]
    pub directory: Option<PathBuf>,
}

impl Config {
    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        match &self.directory {
            Some(directory) => {
                info!(directory = %directory.display(), "serving files from directory");
                Arc::new(FsBlobStore::new(directory))
            }
            None => {
                info!("no directory configured, serving files from memory");
                Arc::new(MemoryBlobStore::new())
            }
        }
    }
}
