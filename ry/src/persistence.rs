use rustc_hash::FxHashMap;
use std::{
    io,
    path::{Path, PathBuf},
};

/// Where buffer contents are loaded from and saved to.
pub trait Persistence: Send {
    fn load(&self, path: &Path) -> io::Result<String>;
    fn save(&mut self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Files kept in memory, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl Persistence for MemoryStorage {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn save(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let mut storage = MemoryStorage::new().with_file("a.txt", "alpha");
        assert_eq!(storage.load(Path::new("a.txt")).unwrap(), "alpha");
        let missing = storage.load(Path::new("b.txt")).unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
        storage.save(Path::new("b.txt"), "beta").unwrap();
        assert_eq!(storage.file("b.txt"), Some("beta"));
    }
}
