use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_help_lists_options() {
    let mut cmd = Command::new(cargo_bin!("securecard"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--static-dir"));
}

#[test]
fn test_config_is_required() {
    let mut cmd = Command::new(cargo_bin!("securecard"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::new(cargo_bin!("securecard"));
    cmd.arg("--config").arg(dir.path().join("absent.toml"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_invalid_config_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"api_uri = "https://cst.test-gsc.vfims.com""#).unwrap();
    writeln!(file, r#"basic_token = """#).unwrap();
    writeln!(file, r#"ppc_id = "ppc-1""#).unwrap();
    writeln!(file, r#"threeds_contract_id = "3ds-1""#).unwrap();
    writeln!(file, r#"key_alias = "KEY-ALIAS""#).unwrap();
    writeln!(file, r#"contract_currency = "ISK""#).unwrap();
    writeln!(file, r#"public_key = "MIIBIjAN""#).unwrap();
    writeln!(file, r#"verifone_js_url = "https://cst.test-gsc.vfims.com/verifone.js""#).unwrap();
    writeln!(
        file,
        r#"songbird_js_url = "https://songbirdstag.cardinalcommerce.com/songbird.js""#
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("securecard"));
    cmd.arg("--config").arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("basic_token"));
}

#[test]
fn test_malformed_config_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "api_uri = [").unwrap();

    let mut cmd = Command::new(cargo_bin!("securecard"));
    cmd.arg("--config").arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Config parse error"));
}
