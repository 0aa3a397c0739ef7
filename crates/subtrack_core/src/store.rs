use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::StoreError,
    storage::{MemoryStorage, SubscriptionStorage},
    subscription::{parse_end_date, Subscription},
};

/// Owns the ordered subscription list and mirrors it to storage after every
/// mutation.
pub struct SubscriptionStore {
    subscriptions: RwLock<Vec<Subscription>>,
    storage: Box<dyn SubscriptionStorage>,
}

pub struct SubscriptionStoreBuilder {
    storage: Option<Box<dyn SubscriptionStorage>>,
}

impl SubscriptionStoreBuilder {
    pub fn new() -> Self {
        Self { storage: None }
    }

    pub fn with_storage(mut self, storage: impl SubscriptionStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn build(self) -> SubscriptionStore {
        let storage = self
            .storage
            .unwrap_or_else(|| Box::new(MemoryStorage::new()));
        let store = SubscriptionStore {
            subscriptions: RwLock::new(Vec::new()),
            storage,
        };
        store.load();
        store
    }
}

impl Default for SubscriptionStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionStore {
    pub fn builder() -> SubscriptionStoreBuilder {
        SubscriptionStoreBuilder::new()
    }

    /// Replaces the in-memory list with the persisted one. Anything that
    /// cannot be read leaves the list empty.
    pub fn load(&self) {
        let loaded = match self.storage.read() {
            Ok(Some(subscriptions)) => subscriptions,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "unable to read stored subscriptions, starting empty");
                Vec::new()
            }
        };
        info!(count = loaded.len(), "subscriptions loaded");
        *self.subscriptions.write() = loaded;
    }

    /// Appends a subscription and persists. Returns the new position, or
    /// `None` when the name is blank or the date does not parse.
    #[instrument(skip(self))]
    pub fn add(&self, name: &str, end_date: &str) -> Result<Option<usize>, StoreError> {
        let name = name.trim();
        let end_date = end_date.trim();
        if name.is_empty() || parse_end_date(end_date).is_none() {
            debug!("ignoring incomplete subscription");
            return Ok(None);
        }

        let mut subscriptions = self.subscriptions.write();
        subscriptions.push(Subscription::new(name, end_date));
        let index = subscriptions.len() - 1;
        self.storage.write(&subscriptions)?;
        info!(index, "subscription added");
        Ok(Some(index))
    }

    /// Removes the subscription at `index` and persists. Out-of-range
    /// positions leave both the list and storage untouched.
    #[instrument(skip(self))]
    pub fn remove_at(&self, index: usize) -> Result<Subscription, StoreError> {
        let mut subscriptions = self.subscriptions.write();
        let len = subscriptions.len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        let removed = subscriptions.remove(index);
        self.storage.write(&subscriptions)?;
        info!(name = %removed.name, "subscription removed");
        Ok(removed)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let subscriptions = self.subscriptions.read();
        self.storage.write(&subscriptions)
    }

    pub fn snapshot(&self) -> Vec<Subscription> {
        self.subscriptions.read().clone()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.read().is_empty()
    }
}
