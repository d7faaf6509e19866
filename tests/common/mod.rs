#![allow(dead_code)]

use chrono::{DateTime, Duration};
use huntd::clock::Clock;
use huntd::language::extension_of;
use huntd::model::{Commit, FileChange, RepoInfo, Timestamp};

/// Wednesday 2025-06-18, noon UTC.
pub const NOW: &str = "2025-06-18T12:00:00+00:00";

pub fn clock() -> Clock {
    Clock::fixed(DateTime::parse_from_rfc3339(NOW).unwrap())
}

pub fn at(rfc3339: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().into()
}

pub fn days_ago(days: i64) -> Timestamp {
    (clock().now() - Duration::days(days)).into()
}

pub fn commit(hash: &str, timestamp: Timestamp) -> Commit {
    commit_lines(hash, timestamp, 0, 0)
}

pub fn commit_lines(hash: &str, timestamp: Timestamp, insertions: u64, deletions: u64) -> Commit {
    Commit {
        hash: hash.to_string(),
        author: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        timestamp,
        subject: format!("commit {hash}"),
        insertions,
        deletions,
        files_changed: 1,
    }
}

pub fn change(hash: &str, timestamp: Timestamp, path: &str, added: u64, removed: u64) -> FileChange {
    FileChange {
        hash: hash.to_string(),
        timestamp,
        path: path.to_string(),
        ext: extension_of(path),
        added,
        removed,
    }
}

pub fn repo(name: &str, commits: Vec<Commit>, file_changes: Vec<FileChange>) -> RepoInfo {
    let mut info = RepoInfo::new(format!("/code/{name}"), name);
    info.total_commits = commits.len() as u64;
    info.branch_count = 1;
    info.last_commit = commits.first().map(|c| c.timestamp);
    info.commits = commits;
    info.file_changes = file_changes;
    info
}

/// One commit per entry, each `days_ago` from the fixed clock.
pub fn commits_on(days: &[i64]) -> Vec<Commit> {
    days.iter()
        .enumerate()
        .map(|(i, &d)| commit(&format!("c{i}"), days_ago(d)))
        .collect()
}
