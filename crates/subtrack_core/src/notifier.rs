use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone};
use tracing::{info, warn};

use crate::{
    format,
    notifications::{NotificationRequest, NotificationSink},
    store::SubscriptionStore,
    subscription::Subscription,
};

/// Subscriptions further out than this many days stay quiet.
pub const NOTICE_WINDOW_DAYS: i64 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryBucket {
    Today,
    Tomorrow { hours_left: i64 },
    InDays(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryNotice {
    pub name: String,
    pub end_date: NaiveDate,
    pub bucket: ExpiryBucket,
}

impl ExpiryNotice {
    pub fn message(&self) -> String {
        match self.bucket {
            ExpiryBucket::Today => format!("{} expires today.", self.name),
            ExpiryBucket::Tomorrow { hours_left } => format!(
                "{} expires tomorrow. Approximately {} hours remain.",
                self.name, hours_left
            ),
            ExpiryBucket::InDays(days) => format!("{} expires in {} days.", self.name, days),
        }
    }
}

/// Buckets `end` relative to `today` using local midnights.
pub fn classify(end: NaiveDate, today: NaiveDate) -> Option<ExpiryBucket> {
    classify_in(&Local, end, today)
}

/// First matching rule wins: same day, next day, then within the window.
/// Past dates never match.
pub fn classify_in<Tz: TimeZone>(tz: &Tz, end: NaiveDate, today: NaiveDate) -> Option<ExpiryBucket> {
    if end == today {
        return Some(ExpiryBucket::Today);
    }

    let span = midnight(tz, end) - midnight(tz, today);

    if today.succ_opt() == Some(end) {
        // Measured midnight to midnight, not from the current time of day,
        // so this reads 24 except across a DST change.
        return Some(ExpiryBucket::Tomorrow {
            hours_left: span.num_hours(),
        });
    }

    let days_left = -(-span.num_milliseconds()).div_euclid(MILLIS_PER_DAY);
    if days_left > 1 && days_left <= NOTICE_WINDOW_DAYS {
        Some(ExpiryBucket::InDays(days_left))
    } else {
        None
    }
}

/// Start of `date` in `tz`. When midnight is skipped by a DST change the day
/// starts at the first wall-clock hour that exists.
fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    (0..=2)
        .find_map(|hour| {
            tz.from_local_datetime(&(naive + Duration::hours(hour)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

pub fn notice_for(subscription: &Subscription, today: NaiveDate) -> Option<ExpiryNotice> {
    let end_date = subscription.parsed_end_date()?;
    classify(end_date, today).map(|bucket| ExpiryNotice {
        name: subscription.name.clone(),
        end_date,
        bucket,
    })
}

pub fn collect_notices(subscriptions: &[Subscription], today: NaiveDate) -> Vec<ExpiryNotice> {
    subscriptions
        .iter()
        .filter_map(|subscription| notice_for(subscription, today))
        .collect()
}

/// Scans the store and hands every qualifying notice to the sink.
pub struct ExpiryNotifier {
    store: Arc<SubscriptionStore>,
    sink: Box<dyn NotificationSink>,
}

impl ExpiryNotifier {
    pub fn new(store: Arc<SubscriptionStore>, sink: Box<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &Arc<SubscriptionStore> {
        &self.store
    }

    pub fn scan(&self) -> Vec<ExpiryNotice> {
        self.scan_on(Local::now().date_naive())
    }

    pub fn scan_on(&self, today: NaiveDate) -> Vec<ExpiryNotice> {
        let subscriptions = self.store.snapshot();
        let mut delivered = Vec::new();

        for subscription in &subscriptions {
            info!(
                name = %subscription.name,
                ends = %format::display_end_date(subscription),
                "subscription status"
            );
            if subscription.parsed_end_date().is_none() {
                warn!(
                    name = %subscription.name,
                    end_date = %subscription.end_date,
                    "unparseable end date, skipping"
                );
                continue;
            }
            if let Some(notice) = notice_for(subscription, today) {
                self.sink.deliver(NotificationRequest::from_notice(&notice));
                delivered.push(notice);
            }
        }

        info!(
            checked = subscriptions.len(),
            notified = delivered.len(),
            "expiration scan finished"
        );
        delivered
    }
}
