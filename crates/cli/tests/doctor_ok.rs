use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn doctor_reads_provided_config_path() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
vault_root = "/tmp/v"

[links]
slugify_character = "_"
preview_label_styling = "label"
"#;
    write_file(&cfg, toml);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ngr"));
    cmd.args(["doctor", "--config", cfg.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   ngr doctor"))
        .stdout(predicate::str::contains("profile: default"))
        .stdout(predicate::str::contains("vault_root: /tmp/v"))
        .stdout(predicate::str::contains("links.slugify_character: Underscore"))
        .stdout(predicate::str::contains("links.preview_label_styling: Plain"));
}

#[test]
fn doctor_uses_xdg_default_when_present() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("notegraph").join("config.toml");
    write_file(
        &cfg_path,
        r#"
version = 1
profile = "default"
[profiles.default]
vault_root = "/tmp/v"
"#,
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ngr"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.arg("doctor");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   ngr doctor"))
        .stdout(predicate::str::contains("vault_root: /tmp/v"));
}

#[test]
fn doctor_counts_notes() {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    write_file(&vault.join("a.md"), "");
    write_file(&vault.join("sub/b.md"), "");
    write_file(&vault.join(".trash/c.md"), "");

    let cfg = tmp.path().join("config.toml");
    write_file(
        &cfg,
        &format!("version = 1\n[profiles.default]\nvault_root = \"{}\"\n", vault.display()),
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ngr"));
    cmd.arg("--config").arg(&cfg).arg("doctor");
    cmd.assert().success().stdout(predicate::str::contains("notes: 2"));
}
