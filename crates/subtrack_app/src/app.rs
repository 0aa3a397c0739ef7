use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use subtrack_core::{
    format, notifications::NotificationSink, notifier::ExpiryNotice, storage::JsonFileStorage,
    ExpiryNotifier, SubscriptionStore,
};
use tracing::info;

use crate::{
    cli::{Commands, ListFormat},
    config::AppConfig,
    manage,
    scheduler::ScanTimer,
    sink::ConsoleSink,
};

pub struct App {
    config: AppConfig,
    store: Arc<SubscriptionStore>,
    sink: Arc<dyn NotificationSink>,
}

impl App {
    pub fn open(config: AppConfig) -> Self {
        Self::open_with_sink(config, Arc::new(ConsoleSink))
    }

    pub fn open_with_sink(config: AppConfig, sink: Arc<dyn NotificationSink>) -> Self {
        info!(path = %config.data_file.display(), "opening subscription store");
        let store = SubscriptionStore::builder()
            .with_storage(JsonFileStorage::new(&config.data_file))
            .build();
        Self {
            config,
            store: Arc::new(store),
            sink,
        }
    }

    pub fn store(&self) -> &Arc<SubscriptionStore> {
        &self.store
    }

    pub fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Run => self.run_daemon(),
            Commands::Manage => manage::run_manager(&self.store, io::stdin().lock(), io::stdout()),
            Commands::List { format: list_format } => self.list(list_format, &mut io::stdout()),
            Commands::Add { name, end_date } => self.add(&name, &end_date, &mut io::stdout()),
            Commands::Remove { index } => self.remove(index, &mut io::stdout()),
            Commands::Check { today } => {
                self.check(today);
                Ok(())
            }
        }
    }

    pub fn list<W: Write>(&self, list_format: ListFormat, out: &mut W) -> Result<()> {
        let subscriptions = self.store.snapshot();
        match list_format {
            ListFormat::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(&subscriptions)?)?;
            }
            ListFormat::Table => {
                if subscriptions.is_empty() {
                    writeln!(out, "No subscriptions.")?;
                }
                for (index, subscription) in subscriptions.iter().enumerate() {
                    writeln!(out, "{}", format::manager_row(index, subscription))?;
                }
            }
        }
        Ok(())
    }

    pub fn add<W: Write>(&self, name: &str, end_date: &str, out: &mut W) -> Result<()> {
        if let Some(index) = self.store.add(name, end_date)? {
            let snapshot = self.store.snapshot();
            if let Some(subscription) = snapshot.get(index) {
                writeln!(out, "Added {}", format::manager_row(index, subscription))?;
            }
        }
        Ok(())
    }

    pub fn remove<W: Write>(&self, index: usize, out: &mut W) -> Result<()> {
        let removed = self
            .store
            .remove_at(index)
            .with_context(|| format!("unable to remove subscription {index}"))?;
        writeln!(out, "Removed {}", format::listing_row(&removed))?;
        Ok(())
    }

    pub fn check(&self, today: Option<NaiveDate>) -> Vec<ExpiryNotice> {
        let notifier = self.notifier();
        match today {
            Some(date) => notifier.scan_on(date),
            None => notifier.scan(),
        }
    }

    pub fn run_daemon(&self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start runtime")?;
        runtime.block_on(self.serve_until(tokio::signal::ctrl_c()))
    }

    /// Scans once, then keeps scanning every interval until `shutdown`
    /// resolves. The timer is cancelled before returning.
    pub async fn serve_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = io::Result<()>>,
    {
        info!(
            subscriptions = self.store.len(),
            interval_secs = self.config.scan_interval.as_secs(),
            "subscription tracker loaded"
        );
        let notifier = Arc::new(self.notifier());
        notifier.scan();
        let timer = ScanTimer::start(notifier, self.config.scan_interval);

        let outcome = shutdown
            .await
            .context("failed to listen for shutdown signal");
        drop(timer);
        info!("subscription tracker unloaded");
        outcome
    }

    fn notifier(&self) -> ExpiryNotifier {
        ExpiryNotifier::new(self.store.clone(), Box::new(self.sink.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use parking_lot::Mutex;
    use std::time::Duration;
    use subtrack_core::notifications::NotificationRequest;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<NotificationRequest>>,
    }

    impl NotificationSink for RecordingSink {
        fn deliver(&self, notification: NotificationRequest) {
            self.delivered.lock().push(notification);
        }
    }

    fn app_in(dir: &std::path::Path) -> App {
        App::open(AppConfig {
            data_file: dir.join("subscriptions.json"),
            scan_interval: Duration::from_secs(3600),
        })
    }

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn add_and_list_survive_reopen() {
        let temp = tempdir().unwrap();
        let app = app_in(temp.path());
        let mut out = Vec::new();
        app.add("Music", "2024-06-10", &mut out).unwrap();
        assert_eq!(text(out), "Added [0] Music - expires: Monday, June 10, 2024\n");

        let reopened = app_in(temp.path());
        let mut out = Vec::new();
        reopened.list(ListFormat::Table, &mut out).unwrap();
        assert_eq!(text(out), "[0] Music - expires: Monday, June 10, 2024\n");

        let mut out = Vec::new();
        reopened.list(ListFormat::Json, &mut out).unwrap();
        assert!(text(out).contains("\"endDate\": \"2024-06-10\""));
    }

    #[test]
    fn invalid_add_prints_nothing() {
        let temp = tempdir().unwrap();
        let app = app_in(temp.path());
        let mut out = Vec::new();
        app.add("", "2024-06-10", &mut out).unwrap();
        assert!(out.is_empty());
        assert!(app.store().is_empty());
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let temp = tempdir().unwrap();
        let app = app_in(temp.path());
        let mut out = Vec::new();
        let err = app.remove(0, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("no subscription at position 0"));
    }

    #[test]
    fn check_with_fixed_today() {
        let temp = tempdir().unwrap();
        let app = app_in(temp.path());
        let mut sink = Vec::new();
        app.add("Video", "2024-06-15", &mut sink).unwrap();
        app.add("Far", "2024-06-20", &mut sink).unwrap();

        let notices = app.check(NaiveDate::from_ymd_opt(2024, 6, 10));
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message(), "Video expires in 5 days.");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn serve_scans_at_startup_then_every_interval_until_shutdown() {
        let temp = tempdir().unwrap();
        let interval = Duration::from_secs(3600);
        let sink = Arc::new(RecordingSink::default());
        let app = App::open_with_sink(
            AppConfig {
                data_file: temp.path().join("subscriptions.json"),
                scan_interval: interval,
            },
            sink.clone(),
        );
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        app.add("Daily", &today, &mut io::sink()).unwrap();

        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let watched = sink.clone();
        let driver = async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            assert_eq!(watched.delivered.lock().len(), 1, "startup scan");

            tokio::time::sleep(interval).await;
            assert_eq!(watched.delivered.lock().len(), 2, "first timer scan");

            stop.send(()).unwrap();
        };
        let shutdown = async move {
            let _ = stopped.await;
            Ok::<(), io::Error>(())
        };
        let (served, ()) = tokio::join!(app.serve_until(shutdown), driver);
        served.unwrap();

        tokio::time::sleep(interval * 3).await;
        assert_eq!(sink.delivered.lock().len(), 2, "timer stops after shutdown");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn serve_reports_shutdown_listener_failure() {
        let temp = tempdir().unwrap();
        let app = app_in(temp.path());
        let failing = async { Err::<(), _>(io::Error::new(io::ErrorKind::Other, "no signals")) };
        let err = app.serve_until(failing).await.unwrap_err();
        assert!(format!("{err:#}").contains("no signals"));
    }
}
