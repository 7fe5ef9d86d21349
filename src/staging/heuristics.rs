//! Path based file classification
//!
//! Content under configuration and state locations belongs to the admin, not
//! to a bundle, and is never written by an install.

/// What a path is used for on the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    /// Admin owned configuration under `/etc`
    Config,
    /// Mutable system state
    State,
    /// Kernel and boot loader content
    Boot,
    Regular,
}

const STATE_PREFIXES: &[&str] = &[
    "/var/",
    "/home/",
    "/root/",
    "/tmp/",
    "/dev/",
    "/proc/",
    "/sys/",
    "/run/",
    "/lost+found/",
    "/mnt/",
    "/media/",
    "/srv/",
];

const STATE_DIRS: &[&str] = &[
    "/var", "/home", "/root", "/tmp", "/dev", "/proc", "/sys", "/run", "/mnt", "/media", "/srv",
];

const BOOT_PREFIXES: &[&str] = &["/boot/", "/usr/lib/kernel/"];

pub fn classify(filename: &str) -> FileClass {
    if filename == "/etc" || filename.starts_with("/etc/") {
        FileClass::Config
    } else if STATE_DIRS.contains(&filename) || STATE_PREFIXES.iter().any(|p| filename.starts_with(p))
    {
        FileClass::State
    } else if BOOT_PREFIXES.iter().any(|p| filename.starts_with(p)) {
        FileClass::Boot
    } else {
        FileClass::Regular
    }
}

/// Whether an install leaves this path alone
pub fn ignore(filename: &str) -> bool {
    matches!(classify(filename), FileClass::Config | FileClass::State)
}
