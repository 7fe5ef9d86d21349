//! bundle-list command implementation
//!
//! Picks the query from the flags:
//! - `--deps B`: bundles B includes
//! - `--has-dep B`: bundles requiring B (`--all` searches every bundle)
//! - `--all`: installable bundles
//! - no flag: installed bundles

use crate::cli::ListArgs;
use crate::config::Settings;
use crate::error::{Result, ResultCode};
use crate::operations::{ListOperation, SystemServices};

/// Run bundle-list
pub fn run(settings: &Settings, args: ListArgs) -> Result<ResultCode> {
    let system = SystemServices::new(settings);
    let services = system.services();
    let list = ListOperation::new(&services);

    if let Some(bundle) = &args.deps {
        list.included(bundle, settings.skip_optional_bundles)?;
    } else if let Some(bundle) = &args.has_dep {
        list.required_by(bundle, args.all, settings.verbose)?;
    } else if args.all {
        list.installable()?;
    } else {
        list.installed();
    }
    Ok(ResultCode::Ok)
}
