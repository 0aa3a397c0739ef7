use subtrack_core::notifications::{NotificationRequest, NotificationSink};

/// Prints each notice as a single toast-style line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn render(notification: &NotificationRequest) -> String {
        format!("[{}] {}", notification.title, notification.body)
    }
}

impl NotificationSink for ConsoleSink {
    fn deliver(&self, notification: NotificationRequest) {
        println!("{}", Self::render(&notification));
    }
}
