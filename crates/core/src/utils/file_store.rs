//! Upload directory access for receipts and permit documents.

use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

/// Files stored under a single upload root, one sub-directory per kind.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, dir: &str, file_name: &str) -> Result<PathBuf> {
        let invalid = file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..");
        if invalid {
            return Err(Error::invalid(format!("Invalid stored file name '{}'", file_name)));
        }
        Ok(self.root.join(dir).join(file_name))
    }

    pub async fn save(&self, dir: &str, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(dir, file_name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub async fn read(&self, dir: &str, file_name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(dir, file_name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("File '{}'", file_name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, dir: &str, file_name: &str) -> Result<()> {
        let path = self.path_for(dir, file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("receipts", "a.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(store.read("receipts", "a.pdf").await.unwrap(), b"%PDF-1.4");

        store.remove("receipts", "a.pdf").await.unwrap();
        assert!(store.read("receipts", "a.pdf").await.unwrap_err().is_not_found());
        // Second removal is a no-op.
        store.remove("receipts", "a.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_traversal() {
        let store = FileStore::new("/tmp/uploads");
        assert!(store.save("permits", "../x.pdf", b"x").await.is_err());
    }
}
