//! Virtual filesystem handle.
//!
//! The terminal treats its filesystem as opaque: it only hands the handle to
//! the execution runtime. [`MemoryFs`] is the empty in-memory instance used
//! when the caller does not bring one.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{Error, Result};

/// File-like storage presented to sandboxed programs.
pub trait VirtualFs: Send + Sync {
    /// Read a whole file.
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or replace a file.
    fn write_file(&self, path: &str, contents: &[u8]) -> Result<()>;

    /// Check whether a file exists.
    fn exists(&self, path: &str) -> bool;

    /// Remove a file.
    fn remove_file(&self, path: &str) -> Result<()>;

    /// All file paths, sorted.
    fn list(&self) -> Vec<String>;
}

/// Shared handle to a virtual filesystem.
pub type SharedFs = Arc<dyn VirtualFs>;

/// In-memory filesystem keyed by absolute path.
#[derive(Default)]
pub struct MemoryFs {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryFs {
    /// Create an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty filesystem behind a shared handle.
    pub fn shared() -> SharedFs {
        Arc::new(Self::new())
    }

    /// Number of files stored.
    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no files are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `a//b/` and `a/b` name the same file; every path is rooted.
fn normalize(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    format!("/{}", parts.join("/"))
}

impl VirtualFs for MemoryFs {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let key = normalize(path);
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .ok_or(Error::FileNotFound(key))
    }

    fn write_file(&self, path: &str, contents: &[u8]) -> Result<()> {
        let key = normalize(path);
        if key == "/" {
            return Err(Error::InvalidPath(path.to_string()));
        }
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, contents.to_vec());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&normalize(path))
    }

    fn remove_file(&self, path: &str) -> Result<()> {
        let key = normalize(path);
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key)
            .map(|_| ())
            .ok_or(Error::FileNotFound(key))
    }

    fn list(&self) -> Vec<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl fmt::Debug for MemoryFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFs")
            .field("files", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fs_is_empty() {
        let fs = MemoryFs::new();
        assert!(fs.is_empty());
        assert!(fs.list().is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let fs = MemoryFs::new();
        fs.write_file("/tmp/hello.txt", b"hello").unwrap();
        assert_eq!(fs.read_file("/tmp/hello.txt").unwrap(), b"hello");
        assert!(fs.exists("/tmp/hello.txt"));
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_paths_are_normalized() {
        let fs = MemoryFs::new();
        fs.write_file("tmp//a.txt", b"a").unwrap();
        assert!(fs.exists("/tmp/a.txt"));
        assert_eq!(fs.list(), vec!["/tmp/a.txt".to_string()]);
    }

    #[test]
    fn test_read_missing_file() {
        let fs = MemoryFs::new();
        let err = fs.read_file("/nope").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(ref p) if p == "/nope"));
    }

    #[test]
    fn test_write_root_rejected() {
        let fs = MemoryFs::new();
        assert!(fs.write_file("/", b"x").is_err());
    }

    #[test]
    fn test_remove_file() {
        let fs = MemoryFs::new();
        fs.write_file("/a", b"1").unwrap();
        fs.remove_file("/a").unwrap();
        assert!(!fs.exists("/a"));
        assert!(fs.remove_file("/a").is_err());
    }

    #[test]
    fn test_shared_handles_are_distinct() {
        let a = MemoryFs::shared();
        let b = MemoryFs::shared();
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
