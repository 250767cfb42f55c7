use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;


const MODULE: &str = "FILES";


/// Named blobs behind the `/files/` routes.
pub trait FileStore: Sync + Send {
    /// Whole content of the file called `name`
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or replace the file called `name`
    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError>;

    fn kind(&self) -> &'static str;
}

/// Accept only a single ordinary path component as a file name.
fn is_plain_name(name: &str) -> bool {
    !(name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']))
}


/// Files kept in one directory on disk.
pub struct DirStore {
    dir_path: PathBuf,
}

impl DirStore {
    pub fn new<P: Into<PathBuf>>(dir_path: P) -> DirStore {
        DirStore { dir_path: dir_path.into() }
    }

    /// Create the directory if it does not exist yet.
    pub fn prepare(&self) -> io::Result<()> {
        if !self.dir_path.exists() {
            info!("[{}] Creating serving directory {}", MODULE, self.dir_path.display());
            std::fs::create_dir_all(&self.dir_path)?;
        }
        Ok(())
    }

    pub fn dir_path(&self) -> &Path { &self.dir_path }

    fn get_filepath(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !is_plain_name(name) {
            debug!("[{}] Rejected file name {:?}", MODULE, name);
            return Err(StoreError::NotFound);
        }
        Ok(self.dir_path.join(name))
    }
}

impl FileStore for DirStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let filepath = self.get_filepath(name)?;
        match std::fs::read(&filepath) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let filepath = self.get_filepath(name)?;
        std::fs::write(filepath, data)?;
        Ok(())
    }

    fn kind(&self) -> &'static str { "directory" }
}


/// Files kept in a map, gone when the process exits.
pub struct MemoryStore {
    map: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore { map: Mutex::new(HashMap::new()) }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, StoreError> {
        self.map.lock().map_err(|_| StoreError::Io(io::Error::new(io::ErrorKind::Other, "memory store poisoned")))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        if !is_plain_name(name) {
            return Err(StoreError::NotFound);
        }
        self.lock()?.get(name).cloned().ok_or(StoreError::NotFound)
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        if !is_plain_name(name) {
            return Err(StoreError::NotFound);
        }
        self.lock()?.insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn kind(&self) -> &'static str { "memory" }
}
