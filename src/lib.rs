//! geoattend library root.
//! Exposes the CLI parser, the high-level run() function, and the attendance core.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod geo;
pub mod location;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::context::build_resolver;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Last { clear } => cli::commands::last::handle(cfg, *clear),
        Commands::Assets => cli::commands::assets::handle(&mut build_resolver(cli, cfg)?),
        Commands::Nearby => cli::commands::nearby::handle(&mut build_resolver(cli, cfg)?),
        Commands::Status { asset } => {
            cli::commands::status::handle(&mut build_resolver(cli, cfg)?, asset.as_deref())
        }
        Commands::Checkin { asset } => {
            cli::commands::attend::check_in(&mut build_resolver(cli, cfg)?, asset.as_deref())
        }
        Commands::Checkout { asset } => {
            cli::commands::attend::check_out(&mut build_resolver(cli, cfg)?, asset.as_deref())
        }
        Commands::History { asset } => {
            cli::commands::history::handle(&mut build_resolver(cli, cfg)?, asset.as_deref())
        }
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once, then command-line overrides are applied
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(api) = &cli.api {
        cfg.api_base_url = api.clone();
    }

    dispatch(&cli, &cfg)
}
