//! GameShelf entry point.

mod app;
mod config;
mod menu;

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load configuration first: it carries the default log filter.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::Config::load(config_path.as_deref())?;

    // Initialize structured logging on stderr, away from the menus.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        require_login = config.require_login,
        "starting GameShelf"
    );

    app::run(config)?;

    tracing::info!("GameShelf shut down cleanly");
    Ok(())
}
