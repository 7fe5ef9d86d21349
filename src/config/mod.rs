//! Configuration handling for bundlectl
//!
//! This module contains:
//! - `config.yaml` - optional settings file (defaults for every invocation)
//! - [`layout`] - where state, markers, staged blobs and hooks live
//! - [`alias`] - alias definitions expanded by bundle-add

pub mod alias;
pub mod layout;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BundleError, Result};

pub use alias::AliasTable;
pub use layout::StateLayout;

/// Settings file location relative to the target root
pub const SETTINGS_FILE: &str = "etc/bundlectl/config.yaml";

/// Settings file contents (`config.yaml`); every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub content_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub skip_diskspace_check: Option<bool>,
    pub skip_optional_bundles: Option<bool>,
    pub wait_for_scripts: Option<bool>,
    pub telemetry_dir: Option<PathBuf>,
}

impl SettingsFile {
    /// Parse settings from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        Ok(settings)
    }

    /// Load settings from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                Self::from_yaml(&content).map_err(|e| BundleError::ConfigParseFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(BundleError::ConfigParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Values given on the command line; `None`/`false` defers to the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub path_prefix: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub content_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub skip_diskspace_check: bool,
    pub skip_optional_bundles: bool,
    pub wait_for_scripts: bool,
    pub verbose: bool,
    pub quiet: bool,
}

/// Effective settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub path_prefix: PathBuf,
    pub state_dir: PathBuf,
    pub content_dir: PathBuf,
    pub skip_diskspace_check: bool,
    pub skip_optional_bundles: bool,
    pub wait_for_scripts: bool,
    pub telemetry_dir: Option<PathBuf>,
    pub verbose: bool,
    pub quiet: bool,
}

impl Settings {
    /// Merge built-in defaults, the settings file and command line overrides
    pub fn load(overrides: Overrides) -> Result<Self> {
        let path_prefix = overrides
            .path_prefix
            .clone()
            .unwrap_or_else(|| PathBuf::from("/"));
        let config_file = overrides
            .config_file
            .clone()
            .unwrap_or_else(|| path_prefix.join(SETTINGS_FILE));
        let file = SettingsFile::load(&config_file)?;
        Ok(Self::merge(path_prefix, file, overrides))
    }

    fn merge(path_prefix: PathBuf, file: SettingsFile, overrides: Overrides) -> Self {
        let state_dir = overrides
            .state_dir
            .or(file.state_dir)
            .unwrap_or_else(|| path_prefix.join("var/lib/bundlectl"));
        let content_dir = overrides
            .content_dir
            .or(file.content_dir)
            .unwrap_or_else(|| path_prefix.join("var/cache/bundlectl/content"));

        Self {
            state_dir,
            content_dir,
            skip_diskspace_check: overrides.skip_diskspace_check
                || file.skip_diskspace_check.unwrap_or(false),
            skip_optional_bundles: overrides.skip_optional_bundles
                || file.skip_optional_bundles.unwrap_or(false),
            wait_for_scripts: overrides.wait_for_scripts || file.wait_for_scripts.unwrap_or(false),
            telemetry_dir: file.telemetry_dir,
            verbose: overrides.verbose,
            quiet: overrides.quiet,
            path_prefix,
        }
    }

    pub fn layout(&self) -> StateLayout {
        StateLayout::new(&self.path_prefix, &self.state_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_derive_from_prefix() {
        let settings = Settings::merge(
            PathBuf::from("/target"),
            SettingsFile::default(),
            Overrides::default(),
        );
        assert_eq!(settings.state_dir, PathBuf::from("/target/var/lib/bundlectl"));
        assert_eq!(
            settings.content_dir,
            PathBuf::from("/target/var/cache/bundlectl/content")
        );
        assert!(!settings.skip_diskspace_check);
        assert!(!settings.wait_for_scripts);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = SettingsFile {
            state_dir: Some(PathBuf::from("/from-file")),
            content_dir: Some(PathBuf::from("/mirror")),
            wait_for_scripts: Some(true),
            ..SettingsFile::default()
        };
        let overrides = Overrides {
            state_dir: Some(PathBuf::from("/from-cli")),
            skip_diskspace_check: true,
            ..Overrides::default()
        };
        let settings = Settings::merge(PathBuf::from("/"), file, overrides);
        assert_eq!(settings.state_dir, PathBuf::from("/from-cli"));
        assert_eq!(settings.content_dir, PathBuf::from("/mirror"));
        assert!(settings.skip_diskspace_check);
        assert!(settings.wait_for_scripts);
    }

    #[test]
    fn test_settings_file_rejects_unknown_keys() {
        assert!(SettingsFile::from_yaml("contentdir: /x\n").is_err());
        let parsed = SettingsFile::from_yaml("skip_optional_bundles: true\n").unwrap();
        assert_eq!(parsed.skip_optional_bundles, Some(true));
    }

    #[test]
    fn test_missing_settings_file_is_default() {
        let temp = crate::test_fixtures::create_temp_dir();
        let loaded = SettingsFile::load(&temp.path().join("absent.yaml")).unwrap();
        assert_eq!(loaded, SettingsFile::default());
    }

    #[test]
    fn test_unparsable_settings_file_is_an_error() {
        let temp = crate::test_fixtures::create_temp_dir();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "state_dir: [unclosed").unwrap();
        let err = SettingsFile::load(&path).unwrap_err();
        assert!(matches!(err, BundleError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_load_reads_file_under_prefix() {
        let temp = crate::test_fixtures::create_temp_dir();
        let config = temp.path().join(SETTINGS_FILE);
        std::fs::create_dir_all(config.parent().unwrap()).unwrap();
        std::fs::write(&config, "skip_diskspace_check: true\n").unwrap();

        let settings = Settings::load(Overrides {
            path_prefix: Some(temp.path().to_path_buf()),
            ..Overrides::default()
        })
        .unwrap();
        assert!(settings.skip_diskspace_check);
    }
}
