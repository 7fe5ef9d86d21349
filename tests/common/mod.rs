//! Common test utilities for bundlectl integration tests

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Version every test system runs and publishes
pub const VERSION: u32 = 10;

/// A file or directory shipped by a published bundle
pub enum Item<'a> {
    File(&'a str, &'a str),
    Dir(&'a str),
}

/// A target root, state directory and content directory
pub struct TestSystem {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub root: PathBuf,
    pub state: PathBuf,
    pub content: PathBuf,
    bundles: std::cell::RefCell<Vec<String>>,
}

impl TestSystem {
    /// Empty target at [`VERSION`] with nothing published
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let system = Self {
            root: temp.path().join("root"),
            state: temp.path().join("state"),
            content: temp.path().join("content"),
            temp,
            bundles: std::cell::RefCell::new(Vec::new()),
        };
        system.write_root(
            "usr/lib/os-release",
            &format!("NAME=\"Test OS\"\nVERSION_ID={VERSION}\n"),
        );
        std::fs::create_dir_all(system.version_dir().join("files"))
            .expect("Failed to create content directory");
        system.write_mom();
        system
    }

    /// Target publishing `os-core`, `editors` and `vim`, with `os-core` installed.
    ///
    /// `vim` includes `editors`, which includes `os-core`. `vim` and `editors`
    /// both ship `/usr/share/doc/editing.txt`.
    pub fn with_editors() -> Self {
        let system = Self::new();
        system.publish(
            "os-core",
            &[],
            &[Item::Dir("/usr/bin"), Item::File("/usr/bin/sh", "shell\n")],
        );
        system.publish(
            "editors",
            &["os-core"],
            &[
                Item::Dir("/usr/share/editors"),
                Item::File("/usr/share/editors/README", "editors\n"),
                Item::File("/usr/share/doc/editing.txt", "shared notes\n"),
            ],
        );
        system.publish(
            "vim",
            &["editors"],
            &[
                Item::File("/usr/bin/vim", "vim binary\n"),
                Item::File("/usr/share/doc/editing.txt", "shared notes\n"),
            ],
        );
        system.write_root("usr/share/bundles/os-core", "");
        system
    }

    fn version_dir(&self) -> PathBuf {
        self.content.join(VERSION.to_string())
    }

    /// Write `content` to `path` under the target root
    pub fn write_root(&self, path: &str, content: &str) {
        let file_path = self.target(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Path of `path` under the target root
    pub fn target(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.target(path).exists()
    }

    /// Publish a bundle manifest with its blobs and list it in the MoM
    pub fn publish(&self, name: &str, includes: &[&str], items: &[Item<'_>]) {
        let mut size = 0;
        let mut files: String = items.iter().map(|item| self.entry(item, &mut size)).collect();
        let marker = format!("/usr/share/bundles/{name}");
        files.push_str(&self.entry(&Item::File(&marker, ""), &mut size));

        let includes = includes
            .iter()
            .map(|i| format!("\"{i}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let manifest = format!(
            "component: {name}\nversion: {VERSION}\ncontentsize: {size}\nincludes: [{includes}]\nfiles:\n{files}"
        );
        write_file(&self.version_dir().join(format!("Manifest.{name}")), &manifest);

        self.bundles.borrow_mut().push(name.to_string());
        self.write_mom();
    }

    /// Manifest lines for one item, writing its blob
    fn entry(&self, item: &Item<'_>, size: &mut usize) -> String {
        match item {
            Item::Dir(path) => {
                format!("  - filename: {path}\n    last_change: {VERSION}\n    directory: true\n")
            }
            Item::File(path, data) => {
                let hex = blake3::hash(data.as_bytes()).to_hex().to_string();
                std::fs::write(self.version_dir().join("files").join(&hex), data)
                    .expect("Failed to write blob");
                *size += data.len();
                format!(
                    "  - filename: {path}\n    hash: \"blake3:{hex}\"\n    last_change: {VERSION}\n"
                )
            }
        }
    }

    fn write_mom(&self) {
        let mut mom = format!("component: MoM\nversion: {VERSION}\nfiles: []\n");
        let bundles = self.bundles.borrow();
        if !bundles.is_empty() {
            mom = format!("component: MoM\nversion: {VERSION}\nfiles:\n");
            for name in bundles.iter() {
                let _ = write!(mom, "  - filename: {name}\n    last_change: {VERSION}\n");
            }
        }
        write_file(&self.version_dir().join("Manifest.MoM"), &mom);
    }

    /// bundlectl pointed at this system
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("bundlectl").expect("bundlectl binary");
        cmd.env_remove("BUNDLECTL_PATH");
        cmd.env_remove("BUNDLECTL_CONTENT_DIR");
        cmd.env("NO_COLOR", "1");
        cmd.arg("--path")
            .arg(&self.root)
            .arg("--statedir")
            .arg(&self.state)
            .arg("--content-dir")
            .arg(&self.content);
        cmd
    }

    /// Run bundle-add for `bundles`, skipping the free space check
    pub fn add(&self, bundles: &[&str]) -> assert_cmd::assert::Assert {
        self.cmd()
            .arg("bundle-add")
            .arg("--skip-diskspace-check")
            .args(bundles)
            .assert()
    }
}

fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).expect("Failed to write manifest");
}
