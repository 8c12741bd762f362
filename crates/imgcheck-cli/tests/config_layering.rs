//! Configuration file layering tests: XDG, project-local, CLI precedence.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use imgcheck_test_support::SyntheticImage;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn imgcheck(work: &Path, xdg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("imgcheck").expect("binary built");
    cmd.env("XDG_CONFIG_HOME", xdg);
    cmd.current_dir(work);
    cmd
}

fn first_record(stdout: &[u8]) -> Value {
    let line = String::from_utf8_lossy(stdout)
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(String::from)
        .expect("at least one output record");
    serde_json::from_str(&line).expect("valid JSON line")
}

fn write_sharp(work: &Path) {
    std::fs::write(work.join("sharp.png"), SyntheticImage::sharp_png(64, 64))
        .expect("write fixture");
}

#[test]
fn test_project_config_raises_threshold() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    write_sharp(work.path());

    // A threshold far above any achievable variance makes everything blurry.
    std::fs::write(
        work.path().join(".imgcheck.toml"),
        "[quality]\nblur_threshold = 1e12\n",
    )
    .expect("write config");

    let output = imgcheck(work.path(), xdg.path())
        .args(["analyze", "--quiet", "sharp.png"])
        .assert()
        .code(1)
        .get_output()
        .clone();

    assert_eq!(first_record(&output.stdout)["is_blurry"], true);
}

#[test]
fn test_cli_flag_beats_project_config() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    write_sharp(work.path());

    std::fs::write(
        work.path().join(".imgcheck.toml"),
        "[quality]\nblur_threshold = 1e12\n",
    )
    .expect("write config");

    let output = imgcheck(work.path(), xdg.path())
        .args(["analyze", "--quiet", "--blur-threshold", "1", "sharp.png"])
        .assert()
        .code(0)
        .get_output()
        .clone();

    assert_eq!(first_record(&output.stdout)["is_blurry"], false);
}

#[test]
fn test_xdg_config_applies_when_no_project_config() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    write_sharp(work.path());

    let config_dir = xdg.path().join("imgcheck");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(
        config_dir.join("config.toml"),
        "[quality]\nblur_threshold = 1e12\n",
    )
    .expect("write config");

    imgcheck(work.path(), xdg.path())
        .args(["analyze", "--quiet", "sharp.png"])
        .assert()
        .code(1);
}

#[test]
fn test_project_config_beats_xdg_config() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    write_sharp(work.path());

    let config_dir = xdg.path().join("imgcheck");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(
        config_dir.join("config.toml"),
        "[quality]\nblur_threshold = 1e12\n",
    )
    .expect("write config");

    // Project-local config restores a sane threshold.
    std::fs::write(
        work.path().join(".imgcheck.toml"),
        "[quality]\nblur_threshold = 1.0\n",
    )
    .expect("write config");

    imgcheck(work.path(), xdg.path())
        .args(["analyze", "--quiet", "sharp.png"])
        .assert()
        .code(0);
}

#[test]
fn test_config_output_format_json() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    write_sharp(work.path());

    std::fs::write(work.path().join(".imgcheck.toml"), "[output]\nformat = 'json'\n")
        .expect("write config");

    let output = imgcheck(work.path(), xdg.path())
        .args(["analyze", "--quiet", "sharp.png"])
        .assert()
        .code(0)
        .get_output()
        .clone();

    let value: Value = serde_json::from_slice(&output.stdout).expect("one JSON document");
    assert!(value.is_array());
}

#[test]
fn test_malformed_config_is_ignored() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    write_sharp(work.path());

    std::fs::write(work.path().join(".imgcheck.toml"), "[quality\noops")
        .expect("write config");

    // Falls back to defaults instead of refusing to run.
    imgcheck(work.path(), xdg.path())
        .args(["analyze", "--quiet", "sharp.png"])
        .assert()
        .code(0);
}

#[test]
fn test_config_models_dir_redirects_model_storage() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    let weights = work.path().join("weights");

    std::fs::write(
        work.path().join(".imgcheck.toml"),
        format!("[models]\ndir = '{}'\n", weights.display()),
    )
    .expect("write config");

    imgcheck(work.path(), xdg.path())
        .args(["models", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(weights.display().to_string()));
}

#[test]
fn test_cli_models_dir_beats_config() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    write_sharp(work.path());

    let config_weights = work.path().join("config-weights");
    let cli_weights = work.path().join("cli-weights");
    std::fs::write(
        work.path().join(".imgcheck.toml"),
        format!("[models]\ndir = '{}'\n", config_weights.display()),
    )
    .expect("write config");

    // Neither directory holds weights; the missing-model error names the
    // directory that won, which must be the flag's.
    imgcheck(work.path(), xdg.path())
        .arg("remove-bg")
        .arg("--models-dir")
        .arg(&cli_weights)
        .arg("sharp.png")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(cli_weights.display().to_string()))
        .stderr(predicate::str::contains("config-weights").not());
}

#[test]
fn test_config_cutpoints_change_classification() {
    let work = TempDir::new().expect("temp dir");
    let xdg = TempDir::new().expect("temp dir");
    write_sharp(work.path());

    // Push all cut-points above any achievable variance; the sharp image
    // still clears the blur threshold but lands in the lowest band.
    std::fs::write(
        work.path().join(".imgcheck.toml"),
        "[quality]\nclarity_cutpoints = [1e12, 1e13, 1e14]\n",
    )
    .expect("write config");

    let output = imgcheck(work.path(), xdg.path())
        .args(["analyze", "--quiet", "sharp.png"])
        .assert()
        .get_output()
        .clone();

    let record = first_record(&output.stdout);
    assert_eq!(record["is_blurry"], false);
    assert_eq!(record["clarity"], "Blurry");
}
