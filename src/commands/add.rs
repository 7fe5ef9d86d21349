//! bundle-add command CLI wrapper
//!
//! Delegates all business logic to operations/install.

use crate::cli::AddArgs;
use crate::config::Settings;
use crate::error::{Result, ResultCode};
use crate::operations::SystemServices;
use crate::operations::install::{self, InstallOptions};
use crate::ui;

impl From<&Settings> for InstallOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            skip_diskspace_check: settings.skip_diskspace_check,
            skip_optional_bundles: settings.skip_optional_bundles,
            wait_for_scripts: settings.wait_for_scripts,
        }
    }
}

/// Run bundle-add
pub fn run(settings: &Settings, args: AddArgs) -> Result<ResultCode> {
    let system = SystemServices::new(settings);
    let services = system.services();
    let mut progress = ui::reporter(settings.quiet);

    install::install(
        &services,
        InstallOptions::from(settings),
        &args.bundles,
        progress.as_mut(),
    )?;
    Ok(ResultCode::Ok)
}
