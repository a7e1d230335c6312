//! CLI surface smoke tests. Nothing here touches the network.

use assert_cmd::Command;
use predicates::prelude::*;

fn greenroom() -> Command {
    Command::cargo_bin("greenroom").expect("binary builds")
}

#[test]
fn help_lists_every_subcommand() {
    greenroom()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("price"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("fan"))
        .stdout(predicate::str::contains("boost"))
        .stdout(predicate::str::contains("claim"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn boost_help_explains_both_steps() {
    greenroom()
        .args(["boost", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn status_requires_a_wallet() {
    greenroom()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--wallet"));
}

#[test]
fn malformed_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    use std::io::Write;
    file.write_all(b"this is not toml [[[").unwrap();

    greenroom()
        .args(["--config"])
        .arg(file.path())
        .arg("price")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse"));
}

#[test]
fn version_flag_works() {
    greenroom()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("greenroom"));
}
