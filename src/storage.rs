use crate::models::{Button, Counters, LogEntry};
use crate::users::USERS;
use serde::{Serialize, de::DeserializeOwned};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

const COUNTERS_FILE: &str = "counters.json";
const BUTTONS_FILE: &str = "buttons.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File-backed documents: the counters and per-user logs live in the data
/// directory, button definitions in the static directory.
///
/// Nothing is cached. Every read goes to disk and every write replaces the
/// whole document.
pub struct JsonStore {
    data_dir: PathBuf,
    static_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            static_dir: static_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn counters_path(&self) -> PathBuf {
        self.data_dir.join(COUNTERS_FILE)
    }

    pub fn log_path(&self, user: &str) -> PathBuf {
        self.data_dir.join(format!("{user}_log.json"))
    }

    pub fn buttons_path(&self) -> PathBuf {
        self.static_dir.join(BUTTONS_FILE)
    }

    pub fn user_buttons_path(&self, user: &str) -> PathBuf {
        self.static_dir.join(format!("{user}_buttons.json"))
    }

    /// Held for the whole read-modify-write of a mutation.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub async fn read_counters(&self) -> Result<Counters, StoreError> {
        read_document(&self.counters_path()).await
    }

    pub async fn write_counters(&self, counters: &Counters) -> Result<(), StoreError> {
        write_document(&self.counters_path(), counters).await
    }

    pub async fn read_log(&self, user: &str) -> Result<Vec<LogEntry>, StoreError> {
        read_document(&self.log_path(user)).await
    }

    pub async fn write_log(&self, user: &str, log: &[LogEntry]) -> Result<(), StoreError> {
        write_document(&self.log_path(user), log).await
    }

    pub async fn read_buttons(&self) -> Result<Vec<Button>, StoreError> {
        read_document(&self.buttons_path()).await
    }

    pub async fn read_user_buttons(&self, user: &str) -> Result<Vec<Button>, StoreError> {
        read_document(&self.user_buttons_path(user)).await
    }

    /// Creates the default documents on first run and fills in any known
    /// user missing from an existing counters document.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Write {
                path: self.data_dir.clone(),
                source,
            })?;

        let mut counters = self.read_counters().await?;
        let mut changed = !exists(&self.counters_path()).await;
        for user in USERS {
            if !counters.contains_key(user.id) {
                counters.insert(user.id.to_string(), 0);
                changed = true;
            }
        }
        if changed {
            info!(path = %self.counters_path().display(), "initialising counters document");
            self.write_counters(&counters).await?;
        }

        for user in USERS {
            let log_path = self.log_path(user.id);
            if !exists(&log_path).await {
                info!(path = %log_path.display(), "creating empty log");
                self.write_log(user.id, &[]).await?;
            }
        }

        if !exists(&self.buttons_path()).await {
            warn!(path = %self.buttons_path().display(), "global button definitions not found");
        }

        Ok(())
    }
}

async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// A missing file reads as the document's default. A file that exists but
/// does not parse is an error, so it is never silently overwritten.
async fn read_document<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(T::default()),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn write_document<T>(path: &Path, document: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec_pretty(document)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload)
        .await
        .map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
    fs::rename(&tmp, path)
        .await
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
}
