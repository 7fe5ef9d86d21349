//! Post-update hooks
//!
//! Executables in the hooks directory run in name order after new content is
//! committed, with the target root passed as their only argument. Hook
//! failures are reported but never fail the operation. Without waiting, hooks
//! that already finished are reaped before returning; the rest keep running.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::{debug, warn};

use crate::config::StateLayout;

/// Runs whatever must happen after files change on the target
pub trait PostUpdateHooks {
    /// Start the post-update hooks; `wait` blocks until they have finished
    fn run_post_update(&self, wait: bool);
}

/// Runs the executables found in the hooks directory
#[derive(Debug, Clone)]
pub struct HookRunner {
    hooks_dir: PathBuf,
    prefix: PathBuf,
}

impl HookRunner {
    pub fn new(layout: &StateLayout) -> Self {
        Self {
            hooks_dir: layout.hooks_dir(),
            prefix: layout.prefix.clone(),
        }
    }

    fn hooks(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.hooks_dir) else {
            return Vec::new();
        };
        let mut hooks: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| is_executable(p))
            .collect();
        hooks.sort();
        hooks
    }

    fn spawn(&self, hook: &Path) -> Option<Child> {
        match Command::new(hook)
            .arg(&self.prefix)
            .stdin(Stdio::null())
            .spawn()
        {
            Ok(child) => Some(child),
            Err(e) => {
                warn!("Could not run {}: {}", hook.display(), e);
                None
            }
        }
    }
}

impl PostUpdateHooks for HookRunner {
    fn run_post_update(&self, wait: bool) {
        let mut detached = Vec::new();
        for hook in self.hooks() {
            debug!("Running post-update hook {}", hook.display());
            let Some(mut child) = self.spawn(&hook) else {
                continue;
            };
            if !wait {
                detached.push((hook, child));
                continue;
            }
            match child.wait() {
                Ok(status) => report_status(&hook, status),
                Err(e) => warn!("Could not wait for {}: {}", hook.display(), e),
            }
        }

        reap(&mut detached);
        for (hook, child) in &detached {
            debug!("{} still running as pid {}", hook.display(), child.id());
        }
    }
}

fn report_status(hook: &Path, status: ExitStatus) {
    if !status.success() {
        warn!("{} exited with {}", hook.display(), status);
    }
}

/// Collect the hooks that have exited, keeping the ones still running
fn reap(children: &mut Vec<(PathBuf, Child)>) {
    children.retain_mut(|(hook, child)| match child.try_wait() {
        Ok(Some(status)) => {
            report_status(hook, status);
            false
        }
        Ok(None) => true,
        Err(e) => {
            warn!("Could not check {}: {}", hook.display(), e);
            false
        }
    });
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
