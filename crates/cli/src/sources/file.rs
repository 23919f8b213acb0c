use async_trait::async_trait;
use crypto_return_core::models::symbol::Symbol;
use std::path::PathBuf;

use super::SeriesSource;
use crate::errors::SourceError;

/// Reads series files from a local directory.
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: Symbol) -> PathBuf {
        self.dir.join(format!("{}.json", symbol.file_stem()))
    }
}

#[async_trait]
impl SeriesSource for FileSource {
    fn name(&self) -> &str {
        "File"
    }

    async fn fetch_series(&self, symbol: Symbol) -> Result<String, SourceError> {
        let path = self.path_for(symbol);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}
