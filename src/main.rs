//! Embo - settings manager for the companion block theme.

mod asset;
mod cli;
mod config;
mod logger;
mod media;
mod plugin;
mod render;
mod settings;
mod store;
mod theme;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::PluginConfig;
use plugin::Plugin;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PluginConfig::load(&cli.config)?;
    debug!("config"; "root {}", config.get_root().display());

    let plugin = Plugin::new(&config)?;
    cli::commands::run(&cli.command, &plugin)
}
