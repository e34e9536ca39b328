use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::Record;

/// Everything the store writes out: the collection and the serial counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default = "first_serial")]
    pub current_record_id: u64,
}

fn first_serial() -> u64 {
    1
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            current_record_id: first_serial(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read data file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write data file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("data file {path} is not valid: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode records: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

/// Whole-document key-value persistence. `load` returns `Ok(None)` when
/// nothing has been saved yet.
pub trait Storage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Read {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Decode {
                path: self.path.display().to_string(),
                source: e,
            })
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.display().to_string(),
            source,
        };
        let body =
            serde_json::to_string_pretty(snapshot).map_err(|e| StorageError::Encode { source: e })?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, body).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

/// In-process storage for tests and library callers that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: RefCell<Option<Snapshot>>,
    saves: RefCell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: RefCell::new(Some(snapshot)),
            saves: RefCell::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        *self.saved.borrow_mut() = Some(snapshot.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
