use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Existence check for include candidates.
///
/// Implementations never fail: anything that prevents reading the file
/// (missing, permission denied, not a regular file) reports `false`.
#[async_trait]
pub trait FileProbe: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;
}

/// Probes the local filesystem. Relative paths are taken relative to `root`.
#[derive(Debug, Clone)]
pub struct LocalFileProbe {
    root: PathBuf,
}

impl LocalFileProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFileProbe { root: root.into() }
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl FileProbe for LocalFileProbe {
    async fn exists(&self, path: &Path) -> bool {
        let path = self.absolute(path);
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(_) => return false,
        };
        // Directories open fine on unix
        file.metadata().await.is_ok_and(|m| m.is_file())
    }
}
