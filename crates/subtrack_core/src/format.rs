//! Text shared by the manager view, the read-only listing and the scan log.

use chrono::NaiveDate;

use crate::subscription::Subscription;

pub const INVALID_DATE: &str = "Invalid Date";

/// "Monday, June 10, 2024"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn display_end_date(subscription: &Subscription) -> String {
    subscription
        .parsed_end_date()
        .map(long_date)
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

pub fn listing_row(subscription: &Subscription) -> String {
    format!(
        "{} - expires: {}",
        subscription.name,
        display_end_date(subscription)
    )
}

pub fn manager_row(index: usize, subscription: &Subscription) -> String {
    format!("[{}] {}", index, listing_row(subscription))
}
