mod app;
mod cli;
mod config;
mod effects;
mod ticker;
mod ui;

use std::process::ExitCode;

use engine_logging::engine_info;
use log::LevelFilter;

pub use cli::Cli;

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = config::load(cli.config.as_deref())?.with_overrides(&cli);

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    engine_logging::initialize(cli.log.into(), level, &config.log_file);
    engine_info!("Compression service at {}", config.base_url);

    app::run_app(&cli, &config)
}
