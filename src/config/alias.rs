//! Bundle aliases
//!
//! Alias files hold one definition per line: the alias name followed by the
//! bundles it stands for, separated by whitespace. Blank lines and `#`
//! comments are ignored. Files are read in name order from the system
//! directory first, then the user directory, so a user definition replaces a
//! system one with the same name.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: HashMap<String, Vec<String>>,
}

impl AliasTable {
    /// Load alias definitions from the given directories, lowest precedence first.
    ///
    /// Unreadable directories and files are skipped.
    pub fn load<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut table = Self::default();
        for dir in dirs {
            let Ok(entries) = std::fs::read_dir(dir.as_ref()) else {
                continue;
            };
            let mut files: Vec<_> = entries
                .filter_map(std::result::Result::ok)
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .collect();
            files.sort();

            for file in files {
                match std::fs::read_to_string(&file) {
                    Ok(content) => table.parse_into(&content),
                    Err(e) => debug!("Skipping alias file {}: {}", file.display(), e),
                }
            }
        }
        table
    }

    fn parse_into(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(name) = fields.next() else {
                continue;
            };
            let bundles: Vec<String> = fields.map(str::to_string).collect();
            if !bundles.is_empty() {
                self.aliases.insert(name.to_string(), bundles);
            }
        }
    }

    /// Bundles an alias stands for, or the name itself when it is no alias
    pub fn expand(&self, name: &str) -> Vec<String> {
        self.aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| vec![name.to_string()])
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }
}
