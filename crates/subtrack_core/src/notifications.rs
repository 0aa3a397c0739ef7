use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notifier::ExpiryNotice;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub issued_at: DateTime<Utc>,
}

impl NotificationRequest {
    pub fn from_notice(notice: &ExpiryNotice) -> Self {
        Self {
            title: "Subscription expiring".to_string(),
            body: notice.message(),
            issued_at: Utc::now(),
        }
    }
}

/// Where expiry notices end up. Each front end supplies its own.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: NotificationRequest);
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn deliver(&self, notification: NotificationRequest) {
        (**self).deliver(notification)
    }
}
