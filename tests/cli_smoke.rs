use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn init_git_repo(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    assert!(Command::new("git")
        .args(["init", "-q"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "core.autocrlf", "false"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "user.email", "you@example.com"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "user.name", "Your Name"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn commit_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    assert!(Command::new("git")
        .args(["add", "."])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["commit", "-q", "-m", &format!("add {name}")])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn huntd() -> Command {
    let mut cmd = Command::cargo_bin("huntd").unwrap();
    cmd.env_remove("HUNTD_LOG").arg("--no-progress");
    cmd
}

fn json_of(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn scan_json_reports_analytics() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let repo = dir.path().join("project");
    init_git_repo(&repo);
    commit_file(&repo, "src/a.rs", "fn a(){}\n");
    commit_file(&repo, "src/b.rs", "fn b(){}\nfn c(){}\n");

    let v = json_of(huntd().args(["scan", "--json"]).arg(dir.path()));

    assert_eq!(v["version"], 1);
    assert_eq!(v["analytics"]["total_repos"], 1);
    assert_eq!(v["analytics"]["total_commits"], 2);
    assert_eq!(v["analytics"]["languages"][0]["language"], "Rust");
    assert_eq!(v["analytics"]["languages"][0]["lines"], 3);
    assert_eq!(v["analytics"]["streaks"]["today_commits"], 2);
    assert_eq!(v["analytics"]["repo_rankings"][0]["name"], "project");
    assert_eq!(v["analytics"]["heatmap"].as_array().map(Vec::len), Some(7));
    assert_eq!(v["achievements"].as_array().map(Vec::len), Some(10));
}

#[test]
fn scan_without_repos_prints_error_object() {
    let dir = tempdir().unwrap();
    let v = json_of(huntd().args(["scan", "--json"]).arg(dir.path()));
    assert_eq!(v, serde_json::json!({ "error": "No repos found" }));
}

#[test]
fn author_filter_narrows_commits_but_not_repos() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let repo = dir.path().join("project");
    init_git_repo(&repo);
    commit_file(&repo, "a.txt", "a\n");

    let v = json_of(
        huntd()
            .args(["scan", "--json", "--author", "nobody-at-all"])
            .arg(dir.path()),
    );
    assert_eq!(v["analytics"]["total_repos"], 1);
    assert_eq!(v["analytics"]["total_commits"], 0);
    assert_eq!(v["filters"]["author"], "nobody-at-all");

    let v = json_of(huntd().args(["scan", "--json", "--author", "YOU@EXAMPLE"]).arg(dir.path()));
    assert_eq!(v["analytics"]["total_commits"], 1);
}

#[test]
fn inverted_date_range_is_rejected() {
    let dir = tempdir().unwrap();
    huntd()
        .args(["scan", "--since", "2025-02-01", "--until", "2025-01-01"])
        .arg(dir.path())
        .assert()
        .failure();

    huntd()
        .args(["scan", "--since", "not a date"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn heatmap_weeks_must_be_in_range() {
    let dir = tempdir().unwrap();
    for weeks in ["0", "14000000"] {
        huntd()
            .args(["scan", "--json", "--weeks", weeks])
            .arg(dir.path())
            .assert()
            .failure();
    }
    huntd()
        .args(["scan", "--json", "--weeks", "5200"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn compare_reports_missing_side() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let work = dir.path().join("work");
    init_git_repo(&work.join("api"));
    commit_file(&work.join("api"), "main.go", "package main\n");
    let empty = dir.path().join("empty");
    fs::create_dir_all(&empty).unwrap();

    let v = json_of(huntd().args(["compare", "--json"]).arg(&work).arg(&empty));

    let sides = v["compare"].as_array().unwrap();
    assert_eq!(sides.len(), 2);
    assert_eq!(sides[0]["total_repos"], 1);
    assert_eq!(sides[0]["total_commits"], 1);
    assert_eq!(sides[0]["languages"][0]["language"], "Go");
    assert_eq!(sides[1]["error"], "No repos found");
    assert_eq!(sides[1]["path"], empty.to_str().unwrap());
}

#[test]
fn repos_lists_discovered_paths() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("one").join(".git")).unwrap();
    fs::create_dir_all(dir.path().join("two").join(".git")).unwrap();
    fs::create_dir_all(dir.path().join("node_modules").join("dep").join(".git")).unwrap();

    let v = json_of(huntd().args(["repos", "--json"]).arg(dir.path()));
    let listed: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].ends_with("one"));
    assert!(listed[1].ends_with("two"));
}

#[test]
fn summary_renders_for_humans() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let repo = dir.path().join("project");
    init_git_repo(&repo);
    commit_file(&repo, "README.md", "# hi\n");

    let out = huntd()
        .arg("scan")
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Repositories"));
    assert!(text.contains("project"));
    assert!(text.contains("Markdown"));
}
