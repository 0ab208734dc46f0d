// Local filesystem adapter - File system operations through tokio::fs

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::ports::FsPort;

/// Filesystem adapter backed by the local disk
#[derive(Debug, Default, Clone)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn file_size(&self, path: &Path) -> io::Result<u64> {
        let metadata = tokio::fs::metadata(path).await?;
        debug!(path = %path.display(), bytes = metadata.len(), "stat");
        Ok(metadata.len())
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}
