//! Selects the repository for every request.
//!
//! Requests are served by the primary store (sqlite or a JSON file) as long
//! as it is reachable. If no connection can be obtained the storage switches
//! to a volatile in-memory database for the rest of the process lifetime.
//! Locations written to memory are never copied back to the primary store.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use lonb_core::{repositories::LocationRepo, usecases as uc};
use lonb_db_jfs::JsonFileDb;
use parking_lot::RwLock;

use crate::{sqlite, Result};

mod memory;

pub use self::memory::InMemoryDb;

type UsecaseResult<T> = std::result::Result<T, uc::Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageSource {
    Sqlite,
    File,
    Memory,
}

impl StorageSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
enum PrimaryStore {
    Sqlite {
        connections: sqlite::Connections,
        url: String,
    },
    JsonFile(Arc<JsonFileDb>),
}

impl PrimaryStore {
    const fn source(&self) -> StorageSource {
        match self {
            Self::Sqlite { .. } => StorageSource::Sqlite,
            Self::JsonFile(_) => StorageSource::File,
        }
    }
}

/// Health information about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStatus {
    pub source: StorageSource,
    pub primary: Option<PrimaryStatus>,
    pub locations_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryStatus {
    pub backend: StorageSource,
    pub url: String,
    pub available: bool,
}

#[derive(Clone)]
pub struct Storage {
    primary: Option<PrimaryStore>,
    memory: Arc<InMemoryDb>,
    // Usecases load a location before they update it. The JSON file
    // and the in-memory store only lock single operations, so every
    // modifying usecase has to hold this lock exclusively.
    usecase_lock: Arc<RwLock<()>>,
    fallen_back: Arc<AtomicBool>,
}

impl Storage {
    fn new(primary: Option<PrimaryStore>) -> Self {
        Self {
            primary,
            memory: Arc::new(InMemoryDb::new()),
            usecase_lock: Arc::new(RwLock::new(())),
            fallen_back: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn sqlite(connections: sqlite::Connections, url: impl Into<String>) -> Self {
        Self::new(Some(PrimaryStore::Sqlite {
            connections,
            url: url.into(),
        }))
    }

    pub fn json_file(db: JsonFileDb) -> Self {
        Self::new(Some(PrimaryStore::JsonFile(Arc::new(db))))
    }

    pub fn in_memory() -> Self {
        Self::new(None)
    }

    fn active_primary(&self) -> Option<&PrimaryStore> {
        if self.fallen_back.load(Ordering::Acquire) {
            return None;
        }
        self.primary.as_ref()
    }

    pub fn source(&self) -> StorageSource {
        self.active_primary()
            .map(PrimaryStore::source)
            .unwrap_or(StorageSource::Memory)
    }

    pub fn is_fallen_back(&self) -> bool {
        self.fallen_back.load(Ordering::Acquire)
    }

    /// Stops using the primary store.
    pub(crate) fn switch_to_memory(&self, err: &anyhow::Error) {
        if self.primary.is_none() {
            return;
        }
        if !self.fallen_back.swap(true, Ordering::AcqRel) {
            log::error!("Primary storage is unavailable, switching to in-memory storage: {err}");
            log::warn!("Locations stored from now on will be lost when the server stops");
        }
    }

    /// Runs a read-only usecase.
    ///
    /// On sqlite modifications are rejected.
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn LocationRepo) -> UsecaseResult<T>,
    {
        match self.active_primary() {
            Some(PrimaryStore::Sqlite { connections, .. }) => match connections.shared() {
                Ok(session) => return Ok(session.run(f)?),
                Err(err) => self.switch_to_memory(&err),
            },
            Some(PrimaryStore::JsonFile(db)) => {
                let _shared = self.usecase_lock.read();
                return Ok(f(db.as_ref())?);
            }
            None => {}
        }
        let _shared = self.usecase_lock.read();
        Ok(f(self.memory.as_ref())?)
    }

    /// Runs a modifying usecase.
    ///
    /// On sqlite the usecase runs inside a single transaction,
    /// on the other stores it runs exclusively.
    pub fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn LocationRepo) -> UsecaseResult<T>,
    {
        match self.active_primary() {
            Some(PrimaryStore::Sqlite { connections, .. }) => match connections.exclusive() {
                Ok(session) => return Ok(session.run(f)?),
                Err(err) => self.switch_to_memory(&err),
            },
            Some(PrimaryStore::JsonFile(db)) => {
                let _exclusive = self.usecase_lock.write();
                return Ok(f(db.as_ref())?);
            }
            None => {}
        }
        let _exclusive = self.usecase_lock.write();
        Ok(f(self.memory.as_ref())?)
    }

    pub fn count_locations(&self) -> Result<usize> {
        self.read(|repo| Ok(repo.count_locations()?))
    }

    pub fn status(&self) -> StorageStatus {
        let primary = self.primary.as_ref().map(|primary| {
            let (url, available) = match primary {
                PrimaryStore::Sqlite { connections, url } => {
                    (url.clone(), !self.is_fallen_back() && connections.shared().is_ok())
                }
                PrimaryStore::JsonFile(db) => (db.path().display().to_string(), true),
            };
            PrimaryStatus {
                backend: primary.source(),
                url,
                available,
            }
        });
        let locations_count = self
            .count_locations()
            .inspect_err(|err| log::warn!("Unable to count locations: {err}"))
            .ok();
        StorageStatus {
            source: self.source(),
            primary,
            locations_count,
        }
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Storage")
            .field("source", &self.source())
            .finish_non_exhaustive()
    }
}
