use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::{error::StoreError, subscription::Subscription};

/// Durable home for the subscription list. The whole ordered sequence is the
/// payload; every write replaces it.
pub trait SubscriptionStorage: Send + Sync {
    /// `Ok(None)` means nothing has been persisted yet.
    fn read(&self) -> Result<Option<Vec<Subscription>>, StoreError>;
    fn write(&self, subscriptions: &[Subscription]) -> Result<(), StoreError>;
}

/// JSON array stored in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubscriptionStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<Vec<Subscription>>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn write(&self, subscriptions: &[Subscription]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_string_pretty(subscriptions)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// In-process blob. Goes through the same JSON encoding as the file backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.blob.lock().clone()
    }
}

impl SubscriptionStorage for MemoryStorage {
    fn read(&self) -> Result<Option<Vec<Subscription>>, StoreError> {
        match self.blob.lock().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn write(&self, subscriptions: &[Subscription]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(subscriptions)?;
        *self.blob.lock() = Some(payload);
        Ok(())
    }
}

impl<T: SubscriptionStorage + ?Sized> SubscriptionStorage for std::sync::Arc<T> {
    fn read(&self) -> Result<Option<Vec<Subscription>>, StoreError> {
        (**self).read()
    }

    fn write(&self, subscriptions: &[Subscription]) -> Result<(), StoreError> {
        (**self).write(subscriptions)
    }
}
