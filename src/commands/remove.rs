//! bundle-remove command CLI wrapper
//!
//! Delegates all business logic to operations/remove. Rejected bundles are
//! reported as they are found; only an error that stopped the whole removal
//! is returned as an error.

use crate::cli::RemoveArgs;
use crate::config::Settings;
use crate::error::{Result, ResultCode};
use crate::operations::{RemoveOperation, RemoveOptions, SystemServices};

/// Run bundle-remove
pub fn run(settings: &Settings, args: RemoveArgs) -> Result<ResultCode> {
    let system = SystemServices::new(settings);
    let services = system.services();
    let options = RemoveOptions {
        force: args.force,
        verbose: settings.verbose,
    };

    let report = RemoveOperation::new(&services, options).execute(&args.bundles);
    match report.error {
        Some(e) => Err(e),
        None => Ok(report.result_code()),
    }
}
