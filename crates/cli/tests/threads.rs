use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn zero_threads_argument_errors() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    Command::cargo_bin("sinktracer")?
        .arg("scan")
        .arg(tmp.path())
        .arg("--threads")
        .arg("0")
        .assert()
        .failure()
        .stderr(contains("threads must be greater than 0"));
    Ok(())
}

#[test]
fn zero_depth_argument_errors() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    Command::cargo_bin("sinktracer")?
        .arg("scan")
        .arg(tmp.path())
        .arg("--depth")
        .arg("0")
        .assert()
        .failure()
        .stderr(contains("depth must be at least 1"));
    Ok(())
}
