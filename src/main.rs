mod cli;
mod commands;
mod config;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use log::LevelFilter;

use crate::cli::Cli;
use crate::config::Settings;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).wrap_err("failed to load settings")?;
    init_logging(cli.verbose, settings.log_level.as_deref());
    log::debug!("{settings:?}");
    commands::run(cli.command, &settings)
}

/// `-v` wins over the configured level, which wins over `RUST_LOG`.
fn init_logging(verbose: u8, configured: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(filters) = configured {
        builder.parse_filters(filters);
    }
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}
