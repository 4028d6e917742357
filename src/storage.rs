use crate::errors::StoreError;
use crate::models::Entry;
use async_trait::async_trait;
use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tokio::fs;
use tracing::{debug, error, warn};

/// A single named slot holding the serialized entry collection.
#[async_trait]
pub trait StorageSlot: Send + Sync {
    /// `None` when nothing was ever written.
    async fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replaces the slot contents.
    async fn write(&self, bytes: &[u8]) -> io::Result<()>;
}

pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StorageSlot for FileSlot {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let staging = self.staging_path();
        fs::write(&staging, bytes).await?;
        fs::rename(&staging, &self.path).await
    }
}

/// In-memory slot, used in place of the data file under test.
#[derive(Clone, Default)]
pub struct MemorySlot {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemorySlot {
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl StorageSlot for MemorySlot {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut guard = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("memory slot poisoned"))?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }
}

/// Loads and saves the full entry collection through a [`StorageSlot`].
#[derive(Clone)]
pub struct EntryStore {
    slot: Arc<dyn StorageSlot>,
}

impl EntryStore {
    pub fn new(slot: Arc<dyn StorageSlot>) -> Self {
        Self { slot }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileSlot::new(path)))
    }

    /// Never fails: a missing, unreadable or corrupt slot loads as empty.
    pub async fn load(&self) -> Vec<Entry> {
        match self.slot.read().await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(entries) => dedupe_by_date(entries),
                Err(err) => {
                    error!("failed to parse entries: {err}");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("no saved entries, starting empty");
                Vec::new()
            }
            Err(err) => {
                error!("failed to read entries: {err}");
                Vec::new()
            }
        }
    }

    pub async fn save(&self, entries: &[Entry]) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(entries)?;
        self.slot.write(&payload).await?;
        Ok(())
    }
}

/// Keeps the first entry for each date. Only a hand-edited slot can repeat one.
fn dedupe_by_date(entries: Vec<Entry>) -> Vec<Entry> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| {
            let first = seen.insert(entry.date);
            if !first {
                warn!(date = %entry.date, id = %entry.id, "dropping duplicate entry for date");
            }
            first
        })
        .collect()
}
