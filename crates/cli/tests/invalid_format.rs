use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn unknown_format_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("sinktracer")?
        .args(["scan", ".", "--format", "sarif"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'sarif'"));
    Ok(())
}
