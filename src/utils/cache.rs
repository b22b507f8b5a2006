use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::FetchError;

/// Raw page bytes on disk, one file per URL.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

/// Filesystem-safe key: the URL with everything but ASCII letters and digits removed.
pub fn cache_key(url: &str) -> String {
    url.chars().filter(char::is_ascii_alphanumeric).collect()
}

impl FileCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", cache_key(url)))
    }

    pub async fn get(&self, url: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let path = self.path_for(url);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Cache hit for {} ({})", url, path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn put(&self, url: &str, bytes: &[u8]) -> Result<(), FetchError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(url), bytes).await?;
        Ok(())
    }
}
