//! Integration tests for the deptool binary.
//!
//! These tests exercise the full CLI against real repositories laid out as
//! `<base>/<owner>/<name>` in a temporary directory, with `--base-url`
//! pointing at `<base>`.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A hosting root with one repository at `openshift/api`.
struct Hosted {
    base: TempDir,
    /// Isolated HOME / XDG_CONFIG_HOME so no user config leaks in.
    home: TempDir,
    carry: String,
    upstream: Vec<String>,
}

impl Hosted {
    fn new() -> Self {
        let base = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let repo = base.path().join("openshift").join("api");
        std::fs::create_dir_all(&repo).unwrap();

        git(&repo, &["init", "-q"]);
        git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&repo, &["config", "user.email", "test@example.com"]);
        git(&repo, &["config", "user.name", "Test User"]);
        git(&repo, &["config", "tag.gpgsign", "false"]);
        git(&repo, &["config", "commit.gpgsign", "false"]);

        let a = commit(&repo, "a.go", "A");
        let b = commit(&repo, "b.go", "B");
        let u = commit(&repo, "u.go", "U");
        git(&repo, &["tag", "-a", "v1.0.0", "-m", "v1.0.0"]);
        git(&repo, &["checkout", "-q", "-b", "release-1.0"]);
        commit(&repo, "Godeps/Godeps.json", "sync Godeps");
        let c = commit(&repo, "carry.go", "UPSTREAM: <carry>: keep patch");

        Self {
            base,
            home,
            carry: c,
            upstream: vec![u, b, a],
        }
    }

    fn base_url(&self) -> String {
        self.base.path().display().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("deptool").unwrap();
        cmd.env_remove("DEPTOOL_CONFIG")
            .env_remove("RUST_LOG")
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        cmd
    }

    fn listing(&self, subcommand: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.args([
            "--base-url",
            &self.base_url(),
            subcommand,
            "--repository",
            "openshift/api",
            "--upstream-tag",
            "v1.0.0",
            "--downstream-branch",
            "release-1.0",
        ]);
        cmd
    }
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("git command failed");
    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn commit(dir: &Path, path: &str, message: &str) -> String {
    let full = dir.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(&full, format!("{}\n", message)).unwrap();
    git(dir, &["add", path]);
    git(dir, &["commit", "-q", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

fn line(hash: &str, summary: &str) -> String {
    format!("{}: {}", &hash[..8], summary)
}

// =============================================================================
// Basics
// =============================================================================

#[test]
fn version_flag_works() {
    Command::cargo_bin("deptool")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("deptool"));
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("deptool")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show-carries"))
        .stdout(predicate::str::contains("completion"));
}

#[test]
fn completion_script() {
    Command::cargo_bin("deptool")
        .unwrap()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deptool"));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn missing_repository() {
    let hosted = Hosted::new();
    hosted
        .cmd()
        .args(["show-carries", "--upstream-tag", "v1.0.0"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "error: repository must be specified",
        ));
}

#[test]
fn missing_upstream_tag() {
    let hosted = Hosted::new();
    hosted
        .cmd()
        .args([
            "show",
            "--repository",
            "openshift/api",
            "--downstream-branch",
            "release-1.0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: upstream tag must be specified",
        ));
}

#[test]
fn missing_downstream_branch() {
    let hosted = Hosted::new();
    hosted
        .cmd()
        .args([
            "show",
            "--repository",
            "openshift/api",
            "--upstream-tag",
            "",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("upstream tag must be specified"));

    hosted
        .cmd()
        .args([
            "show",
            "--repository",
            "openshift/api",
            "--upstream-tag",
            "v1.0.0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: downstream branch must be specified",
        ));
}

// =============================================================================
// Listings
// =============================================================================

#[test]
fn show_carries_text() {
    let hosted = Hosted::new();
    hosted
        .listing("show-carries")
        .assert()
        .success()
        .stdout(format!(
            "{}\n",
            line(&hosted.carry, "UPSTREAM: <carry>: keep patch")
        ));
}

#[test]
fn show_upstream_text() {
    let hosted = Hosted::new();
    let expected: Vec<String> = hosted
        .upstream
        .iter()
        .zip(["U", "B", "A"])
        .map(|(hash, summary)| line(hash, summary))
        .collect();

    hosted
        .listing("show")
        .assert()
        .success()
        .stdout(format!("{}\n", expected.join("\n")));
}

#[test]
fn show_carries_json() {
    let hosted = Hosted::new();
    let output = hosted
        .listing("show-carries")
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["hash"], hosted.carry.as_str());
    assert_eq!(records[0]["short"], &hosted.carry[..8]);
    assert_eq!(records[0]["summary"], "UPSTREAM: <carry>: keep patch");
    assert_eq!(records[0]["parents"].as_array().unwrap().len(), 1);
}

#[test]
fn format_from_config_file() {
    let hosted = Hosted::new();
    let config_dir = hosted.home.path().join(".config").join("deptool");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "format = \"json\"\n").unwrap();

    hosted
        .listing("show-carries")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn invalid_config_is_reported() {
    let hosted = Hosted::new();
    let config = hosted.home.path().join("bad.toml");
    std::fs::write(&config, "colour = \"always\"\n").unwrap();

    hosted
        .listing("show-carries")
        .env("DEPTOOL_CONFIG", &config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: failed to load configuration"));
}

#[test]
fn completion_ignores_broken_config() {
    let hosted = Hosted::new();
    let config = hosted.home.path().join("bad.toml");
    std::fs::write(&config, "colour = \"always\"\n").unwrap();

    hosted
        .cmd()
        .env("DEPTOOL_CONFIG", &config)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deptool"));
}

#[test]
fn debug_explains_verdicts() {
    let hosted = Hosted::new();
    hosted
        .listing("show-carries")
        .arg("--debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped (metadata only)"))
        .stderr(predicate::str::contains("skipped (already upstream)"));
}

#[test]
fn quiet_still_prints_listing() {
    let hosted = Hosted::new();
    hosted
        .listing("show-carries")
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains(&hosted.carry[..8]));
}

#[test]
fn order_override() {
    let hosted = Hosted::new();
    hosted
        .listing("show")
        .args(["--order", "time"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&hosted.upstream[0][..8]));
}

// =============================================================================
// Failures after validation
// =============================================================================

#[test]
fn unknown_repository_fails_to_fetch() {
    let hosted = Hosted::new();
    hosted
        .cmd()
        .args([
            "--base-url",
            &hosted.base_url(),
            "show-carries",
            "--repository",
            "openshift/missing",
            "--upstream-tag",
            "v1.0.0",
            "--downstream-branch",
            "release-1.0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: failed to fetch repository"));
}

#[test]
fn unknown_tag() {
    let hosted = Hosted::new();
    hosted
        .cmd()
        .args([
            "--base-url",
            &hosted.base_url(),
            "show",
            "--repository",
            "openshift/api",
            "--upstream-tag",
            "v9.9.9",
            "--downstream-branch",
            "release-1.0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refs/tags/v9.9.9"));
}

#[test]
fn branch_must_exist_under_remote_alias() {
    let hosted = Hosted::new();
    hosted
        .listing("show-carries")
        .args(["--remote", "origin"])
        .assert()
        .success();

    hosted
        .cmd()
        .args([
            "--base-url",
            &hosted.base_url(),
            "show-carries",
            "--repository",
            "openshift/api",
            "--upstream-tag",
            "v1.0.0",
            "--downstream-branch",
            "no-such-branch",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refs/remotes/upstream/no-such-branch"));
}
