//! bundlectl - bundle add/remove for an OS content updater
//!
//! Installs and removes bundles of OS content on a target system, keeping
//! files shared between bundles and refusing to remove bundles that other
//! installed bundles still require.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod delivery;
mod domain;
mod error;
mod fileset;
mod hash;
mod logging;
mod operations;
mod resolver;
mod scripts;
mod staging;
mod store;
mod telemetry;
#[cfg(test)]
mod test_fixtures;
mod tracking;
mod transaction;
mod ui;

use cli::{Cli, Commands};
use config::Settings;
use error::{Result, ResultCode};

fn dispatch(cli: Cli) -> Result<ResultCode> {
    if let Commands::Completions(args) = &cli.command {
        commands::completions::run(args);
        return Ok(ResultCode::Ok);
    }

    let settings = Settings::load(cli.overrides())?;
    if let Err(e) = logging::init_logging(settings.verbose) {
        eprintln!("Warning: {}", e);
    }
    tracing::debug!(
        "prefix {}, state {}, content {}",
        settings.path_prefix.display(),
        settings.state_dir.display(),
        settings.content_dir.display()
    );

    match cli.command {
        Commands::BundleAdd(args) => commands::add::run(&settings, args),
        Commands::BundleRemove(args) => commands::remove::run(&settings, args),
        Commands::BundleList(args) => commands::list::run(&settings, args),
        Commands::Completions(_) => Ok(ResultCode::Ok),
    }
}

fn main() {
    let cli = Cli::parse();

    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            let code = e.result_code();
            eprintln!("Error: {}", e);
            code
        }
    };
    std::process::exit(code.exit_code());
}
