//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - add: bundle-add arguments
//! - remove: bundle-remove arguments
//! - list: bundle-list arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Overrides;

pub mod add;
pub mod completions;
pub mod list;
pub mod remove;

pub use add::AddArgs;
pub use completions::CompletionsArgs;
pub use list::ListArgs;
pub use remove::RemoveArgs;

/// bundlectl - add and remove OS content bundles
#[derive(Parser, Debug)]
#[command(
    name = "bundlectl",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Add and remove OS content bundles",
    long_about = "bundlectl installs and removes bundles of OS content. Adding a bundle installs \
                  everything it includes; removing one is refused while other installed bundles \
                  still require it.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  bundlectl bundle-add vim                 \x1b[90m# Install vim and its includes\x1b[0m\n   \
                  bundlectl bundle-remove editors --force  \x1b[90m# Remove editors and what requires it\x1b[0m\n   \
                  bundlectl bundle-list --all              \x1b[90m# List installable bundles\x1b[0m\n   \
                  bundlectl bundle-list --has-dep editors  \x1b[90m# Show what requires editors\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Root of the system to operate on
    #[arg(long = "path", short = 'p', global = true, env = "BUNDLECTL_PATH")]
    pub path: Option<PathBuf>,

    /// State directory (defaults to <path>/var/lib/bundlectl)
    #[arg(long = "statedir", short = 'S', global = true)]
    pub state_dir: Option<PathBuf>,

    /// Directory holding manifests and content
    #[arg(long = "content-dir", short = 'c', global = true, env = "BUNDLECTL_CONTENT_DIR")]
    pub content_dir: Option<PathBuf>,

    /// Settings file (defaults to <path>/etc/bundlectl/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings given on the command line
    pub fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            path_prefix: self.path.clone(),
            state_dir: self.state_dir.clone(),
            content_dir: self.content_dir.clone(),
            config_file: self.config.clone(),
            verbose: self.verbose,
            quiet: self.quiet,
            ..Overrides::default()
        };
        match &self.command {
            Commands::BundleAdd(args) => {
                overrides.skip_diskspace_check = args.skip_diskspace_check;
                overrides.skip_optional_bundles = args.skip_optional;
                overrides.wait_for_scripts = args.wait_for_scripts;
            }
            Commands::BundleList(args) => {
                overrides.skip_optional_bundles = args.skip_optional;
            }
            Commands::BundleRemove(_) | Commands::Completions(_) => {}
        }
        overrides
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install bundles and everything they include
    #[command(name = "bundle-add")]
    BundleAdd(AddArgs),

    /// Remove bundles
    #[command(name = "bundle-remove")]
    BundleRemove(RemoveArgs),

    /// List bundles and their dependencies
    #[command(name = "bundle-list")]
    BundleList(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
