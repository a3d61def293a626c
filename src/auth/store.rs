use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use super::error::AuthError;

/// Key-value persistence for credentials and incidental cached lookups.
///
/// Every `set` must be durable on its own; callers update one field at a time.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<(), AuthError>;
    /// Copy of the whole mapping, keys in sorted order.
    fn snapshot(&self) -> BTreeMap<String, Value>;
}

/// JSON-file store holding the entire mapping in memory.
///
/// The file is rewritten in full on every `set` through a temp file and a
/// rename, so a crash leaves either the previous or the new state on disk.
///
/// # Example
/// ```no_run
/// use trakt_list_sync::auth::{FileTokenStore, TokenStore};
///
/// let store = FileTokenStore::load("/tmp/trakt-state.json")?;
/// store.set("list-id:My Collection", serde_json::json!(1234))?;
/// # Ok::<(), trakt_list_sync::auth::AuthError>(())
/// ```
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl FileTokenStore {
    /// Read the persisted mapping; a missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "loaded state file");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), AuthError> {
        let mut entries = self.entries();
        entries.insert(key.to_string(), value);
        let serialized = serde_json::to_vec_pretty(&*entries)?;
        atomic_write(&self.path, &serialized)
    }

    fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries().clone()
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path.file_name().ok_or_else(|| {
        AuthError::Io(format!("State path {} has no file name", path.display()))
    })?;

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_path = path.with_file_name(format!(
        ".{}.tmp-{}-{nonce}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
