use clap::Parser;
use subtrack_app::{
    app::App,
    cli::{Cli, Commands},
    config::AppConfig,
    init_tracing,
};

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let mut config = AppConfig::from_env().unwrap_or_default();
    if let Some(path) = cli.data_file {
        config.data_file = path;
    }
    let app = App::open(config);
    if let Err(err) = app.execute(cli.command.unwrap_or(Commands::Run)) {
        eprintln!("subtrack: {err:#}");
        std::process::exit(1);
    }
}
