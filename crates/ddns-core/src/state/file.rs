// # File Parameter Store
//
// JSON file implementation of ParameterStore with crash recovery.
//
// ## Purpose
//
// Lets the updater run outside AWS (local daemon, home server) while keeping
// the same "only write when changed" behavior across restarts.
//
// ## Crash Recovery
//
// - Atomic writes: write-then-rename
// - Backup: the previous good file is kept as `.backup`
// - Corruption: falls back to the backup, then to an empty store
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "parameters": {
//     "/home/current-ip": {
//       "value": "203.0.113.5",
//       "last_written": "2025-01-09T12:00:00Z"
//     }
//   }
// }
// ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use super::ParameterRecord;
use crate::Error;
use crate::traits::parameter_store::{ParameterLookup, ParameterStore};

/// Parameter file format version
const PARAMETER_FILE_VERSION: &str = "1.0";

/// File-based parameter store with crash recovery
///
/// Every `put` is written through to disk before returning, so a successful
/// `put` is durable.
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::state::FileParameterStore;
/// use ddns_core::traits::ParameterStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileParameterStore::new("/var/lib/ddns/parameters.json").await?;
///
///     store.put("/home/current-ip", "203.0.113.5").await?;
///
///     let lookup = store.get("/home/current-ip").await?;
///     assert_eq!(lookup.value(), Some("203.0.113.5"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileParameterStore {
    path: PathBuf,
    parameters: Arc<RwLock<HashMap<String, ParameterRecord>>>,
}

/// Serializable file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct ParameterFileFormat {
    version: String,
    parameters: HashMap<String, ParameterRecord>,
}

impl FileParameterStore {
    /// Create or load a file parameter store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Load the existing file
    /// 3. If it is corrupted, load the backup instead
    /// 4. If both fail, start empty
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create parameter directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let parameters = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            parameters: Arc::new(RwLock::new(parameters)),
        })
    }

    /// Get the full record for a parameter
    pub async fn record(&self, name: &str) -> Option<ParameterRecord> {
        self.parameters.read().await.get(name).cloned()
    }

    /// Load parameters with automatic recovery
    async fn load_with_recovery(path: &Path) -> Result<HashMap<String, ParameterRecord>, Error> {
        match Self::load(path).await {
            Ok(parameters) => {
                tracing::debug!(count = parameters.len(), "Loaded parameter file");
                Ok(parameters)
            }
            Err(LoadError::Corrupt(reason)) => {
                tracing::warn!(
                    path = %path.display(),
                    reason = %reason,
                    "Parameter file appears corrupted. Attempting recovery from backup."
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup file found. Starting with empty store.");
                    return Ok(HashMap::new());
                }

                match Self::load(&backup_path).await {
                    Ok(parameters) => {
                        tracing::info!(count = parameters.len(), "Recovered parameters from backup");

                        if let Err(e) = fs::copy(&backup_path, path).await {
                            tracing::error!(error = %e, "Failed to restore parameter file from backup");
                        }

                        Ok(parameters)
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Backup also unreadable. Starting with empty store."
                        );
                        Ok(HashMap::new())
                    }
                }
            }
            Err(LoadError::Io(e)) => Err(e),
        }
    }

    /// Load parameters from a file
    async fn load(path: &Path) -> Result<HashMap<String, ParameterRecord>, LoadError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Parameter file does not exist");
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            LoadError::Io(Error::parameter_store(format!(
                "Failed to read parameter file {}: {}",
                path.display(),
                e
            )))
        })?;

        let file: ParameterFileFormat =
            serde_json::from_str(&content).map_err(|e| LoadError::Corrupt(e.to_string()))?;

        if file.version != PARAMETER_FILE_VERSION {
            tracing::warn!(
                expected = PARAMETER_FILE_VERSION,
                found = %file.version,
                "Parameter file version mismatch. Attempting to load anyway."
            );
        }

        Ok(file.parameters)
    }

    /// Write a snapshot to disk atomically
    async fn write(&self, parameters: &HashMap<String, ParameterRecord>) -> Result<(), Error> {
        let file = ParameterFileFormat {
            version: PARAMETER_FILE_VERSION.to_string(),
            parameters: parameters.clone(),
        };

        let json = serde_json::to_string_pretty(&file)?;

        let temp_path = self.temp_path();
        {
            let mut temp = fs::File::create(&temp_path).await.map_err(|e| {
                Error::parameter_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            temp.write_all(json.as_bytes()).await.map_err(|e| {
                Error::parameter_store(format!(
                    "Failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            temp.flush().await.map_err(|e| {
                Error::parameter_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!(error = %e, "Failed to create backup");
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::parameter_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!(path = %self.path.display(), "Parameter file written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

/// Load failure, split so only corruption triggers backup recovery
enum LoadError {
    Corrupt(String),
    Io(Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Corrupt(reason) => write!(f, "corrupted: {reason}"),
            LoadError::Io(e) => write!(f, "{e}"),
        }
    }
}

#[async_trait]
impl ParameterStore for FileParameterStore {
    async fn get(&self, name: &str) -> Result<ParameterLookup, Error> {
        let guard = self.parameters.read().await;
        Ok(match guard.get(name) {
            Some(record) => ParameterLookup::Found(record.value.clone()),
            None => ParameterLookup::NotFound,
        })
    }

    async fn put(&self, name: &str, value: &str) -> Result<(), Error> {
        // Hold the write lock across the disk write so concurrent puts serialize
        let mut guard = self.parameters.write().await;
        let previous = guard.insert(name.to_string(), ParameterRecord::new(value));

        if let Err(e) = self.write(&guard).await {
            tracing::error!(
                parameter = name,
                value,
                error = %e,
                "Error writing parameter file"
            );

            // Keep memory consistent with disk
            match previous {
                Some(record) => {
                    guard.insert(name.to_string(), record);
                }
                None => {
                    guard.remove(name);
                }
            }
            return Err(e);
        }

        tracing::info!(parameter = name, value, "Successfully updated parameter");
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "file"
    }
}
