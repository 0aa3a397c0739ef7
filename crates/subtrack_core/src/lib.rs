pub mod error;
pub mod format;
pub mod notifications;
pub mod notifier;
pub mod storage;
pub mod store;
pub mod subscription;

pub use crate::error::StoreError;
pub use crate::notifier::ExpiryNotifier;
pub use crate::store::{SubscriptionStore, SubscriptionStoreBuilder};
pub use crate::subscription::Subscription;
