#![cfg(feature = "cli")]

use std::process::Command;

fn co2watch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_co2watch"))
}

#[test]
fn version_prints_package_version() {
    let output = co2watch()
        .arg("version")
        .output()
        .expect("binary should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn watch_rejects_invalid_interval() {
    let output = co2watch()
        .args(["watch", "--interval", "soon"])
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid interval"));
}

#[test]
fn unknown_subcommand_fails_usage() {
    let output = co2watch()
        .arg("calibrate")
        .output()
        .expect("binary should run");

    assert!(!output.status.success());
}
