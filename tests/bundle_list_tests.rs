//! bundle-list integration tests

mod common;

use common::{Item, TestSystem};
use predicates::prelude::*;

fn installed_editors() -> TestSystem {
    let system = TestSystem::with_editors();
    system.publish(
        "emacs",
        &["editors"],
        &[Item::File("/usr/bin/emacs", "emacs binary\n")],
    );
    system.add(&["vim"]).success();
    system
}

#[test]
fn test_list_installed() {
    let system = installed_editors();

    system
        .cmd()
        .arg("bundle-list")
        .assert()
        .success()
        .stdout(predicate::str::contains("editors"))
        .stdout(predicate::str::contains("os-core"))
        .stdout(predicate::str::contains("vim"))
        .stdout(predicate::str::contains("emacs").not());
}

#[test]
fn test_list_all_shows_installable() {
    let system = installed_editors();

    system
        .cmd()
        .args(["bundle-list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("emacs"))
        .stdout(predicate::str::contains("vim"));
}

#[test]
fn test_list_deps() {
    let system = installed_editors();

    system
        .cmd()
        .args(["bundle-list", "--deps", "vim"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bundles included by vim:"))
        .stdout(predicate::str::contains("editors"))
        .stdout(predicate::str::contains("os-core"));

    system
        .cmd()
        .args(["bundle-list", "--deps", "os-core"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No included bundles"));
}

#[test]
fn test_list_has_dep_among_installed() {
    let system = installed_editors();

    system
        .cmd()
        .args(["bundle-list", "--has-dep", "editors"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Installed bundles that have editors as a dependency:",
        ))
        .stdout(predicate::str::contains(" - vim"))
        .stdout(predicate::str::contains("emacs").not());
}

#[test]
fn test_list_has_dep_among_all() {
    let system = installed_editors();

    system
        .cmd()
        .args(["bundle-list", "--has-dep", "editors", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" - emacs"))
        .stdout(predicate::str::contains(" - vim"));
}

#[test]
fn test_list_has_dep_of_uninstalled_bundle() {
    let system = installed_editors();

    system
        .cmd()
        .args(["bundle-list", "--has-dep", "emacs"])
        .assert()
        .code(5);
}

#[test]
fn test_list_deps_of_unknown_bundle() {
    let system = installed_editors();

    system
        .cmd()
        .args(["bundle-list", "--deps", "ghost"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Bundle \"ghost\" is invalid"));
}
