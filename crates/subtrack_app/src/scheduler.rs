use std::sync::Arc;
use std::time::Duration;

use subtrack_core::ExpiryNotifier;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Recurring expiration scan. The first tick lands one period after start,
/// since the startup scan is run by the caller. Dropping the timer cancels it.
pub struct ScanTimer {
    handle: JoinHandle<()>,
}

impl ScanTimer {
    pub fn start(notifier: Arc<ExpiryNotifier>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("scan timer fired");
                notifier.scan();
            }
        });
        Self { handle }
    }
}

impl Drop for ScanTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use parking_lot::Mutex;
    use subtrack_core::{
        notifications::{NotificationRequest, NotificationSink},
        SubscriptionStore,
    };

    #[derive(Default, Clone)]
    struct RecordingSink {
        delivered: Arc<Mutex<Vec<NotificationRequest>>>,
    }

    impl NotificationSink for RecordingSink {
        fn deliver(&self, notification: NotificationRequest) {
            self.delivered.lock().push(notification);
        }
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn fires_once_per_period_until_dropped() {
        let store = Arc::new(SubscriptionStore::builder().build());
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        store.add("Daily", &today).unwrap();

        let sink = RecordingSink::default();
        let notifier = Arc::new(ExpiryNotifier::new(store, Box::new(sink.clone())));
        let period = Duration::from_secs(24 * 60 * 60);

        let timer = ScanTimer::start(notifier, period);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(sink.delivered.lock().len(), 0, "no scan before the first period");

        tokio::time::sleep(period * 2).await;
        assert_eq!(sink.delivered.lock().len(), 2);

        drop(timer);
        tokio::time::sleep(period * 3).await;
        assert_eq!(sink.delivered.lock().len(), 2);
    }
}
