pub mod app;
pub mod cli;
pub mod config;
pub mod manage;
pub mod scheduler;
pub mod sink;

use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout is reserved for listings and notices.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
