use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// A commit instant. Extracted history always carries its recorded offset;
/// offset-less values are read as already being local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

impl Timestamp {
    /// Wall-clock time in the timestamp's own offset.
    pub fn local(&self) -> NaiveDateTime {
        match self {
            Timestamp::Zoned(dt) => dt.naive_local(),
            Timestamp::Local(naive) => *naive,
        }
    }

    pub fn local_date(&self) -> NaiveDate {
        self.local().date()
    }

    /// Offset-less values are taken to be UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Timestamp::Zoned(dt) => dt.with_timezone(&Utc),
            Timestamp::Local(naive) => naive.and_utc(),
        }
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Timestamp::Zoned(dt)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Timestamp::Local(naive)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub author: String,
    pub email: String,
    pub timestamp: Timestamp,
    pub subject: String,
    pub insertions: u64,
    pub deletions: u64,
    pub files_changed: u32,
}

impl Commit {
    pub fn lines_changed(&self) -> u64 {
        self.insertions + self.deletions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChange {
    pub hash: String,
    pub timestamp: Timestamp,
    pub path: String,
    pub ext: String,
    pub added: u64,
    pub removed: u64,
}

impl FileChange {
    pub fn churn(&self) -> u64 {
        self.added + self.removed
    }
}

/// Everything the scan learned about one repository.
///
/// `total_commits`, `branch_count` and `last_commit` describe the whole
/// history; `commits` and `file_changes` may have been narrowed by a
/// [`ScanFilter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub path: String,
    pub name: String,
    pub branch_count: u32,
    pub last_commit: Option<Timestamp>,
    pub has_readme: bool,
    pub total_commits: u64,
    pub is_dirty: bool,
    pub commits: Vec<Commit>,
    pub file_changes: Vec<FileChange>,
}

impl RepoInfo {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            branch_count: 0,
            last_commit: None,
            has_readme: false,
            total_commits: 0,
            is_dirty: false,
            commits: Vec::new(),
            file_changes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
    pub today_commits: u32,
}

/// Streak lengths without the day-specific count, as shown side by side in `compare`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

impl From<&Streaks> for StreakSummary {
    fn from(streaks: &Streaks) -> Self {
        Self {
            current: streaks.current,
            longest: streaks.longest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPattern {
    pub busiest_day: String,
    pub busiest_hour: u32,
    pub avg_commits_per_day: f64,
    pub commits_by_hour: Vec<u32>,
    pub commits_by_dow: Vec<u32>,
}

impl Default for ActivityPattern {
    fn default() -> Self {
        Self {
            busiest_day: String::new(),
            busiest_hour: 0,
            avg_commits_per_day: 0.0,
            commits_by_hour: vec![0; 24],
            commits_by_dow: vec![0; 7],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTotal {
    pub language: String,
    pub lines: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEvolution {
    /// `YYYY-MM` → language → lines changed.
    pub monthly: BTreeMap<String, BTreeMap<String, u64>>,
    pub top_languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoRanking {
    pub name: String,
    pub path: String,
    pub commits: u64,
    pub primary_language: String,
    pub health_score: u32,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub last_commit: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeVelocity {
    /// ISO week key (`YYYY-Www`) → commits, chronological.
    pub commits_by_week: BTreeMap<String, u32>,
    pub lines_by_week: BTreeMap<String, u64>,
    pub trend: Trend,
    pub peak_week: String,
    pub peak_commits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusLevel {
    #[serde(rename = "deep focus")]
    DeepFocus,
    #[serde(rename = "balanced")]
    Balanced,
    #[serde(rename = "scattered")]
    Scattered,
}

impl fmt::Display for FocusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusLevel::DeepFocus => write!(f, "deep focus"),
            FocusLevel::Balanced => write!(f, "balanced"),
            FocusLevel::Scattered => write!(f, "scattered"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusScore {
    pub avg_repos_per_day: f64,
    pub most_focused_day: Option<NaiveDate>,
    pub most_scattered_day: Option<NaiveDate>,
    pub interpretation: Option<FocusLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkdaySplit {
    pub weekday_commits: u32,
    pub weekend_commits: u32,
    pub weekday_pct: f64,
    pub weekend_pct: f64,
    pub weekday_lines: u64,
    pub weekend_lines: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHotspot {
    pub path: String,
    pub churn: u64,
    pub touches: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_repos: usize,
    pub total_commits: usize,
    pub total_languages: usize,
    pub streaks: Streaks,
    /// 7 rows (Mon..Sun) × N week columns, oldest week first.
    pub heatmap: Vec<Vec<u32>>,
    pub languages: Vec<LanguageTotal>,
    pub repo_rankings: Vec<RepoRanking>,
    pub activity: ActivityPattern,
    pub language_evolution: LanguageEvolution,
    pub code_velocity: CodeVelocity,
    pub focus_score: FocusScore,
    pub workday_split: WorkdaySplit,
    pub file_hotspots: Vec<FileHotspot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub name: String,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterLabels {
    pub since: Option<String>,
    pub until: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub scan_path: String,
    pub filters: FilterLabels,
    pub analytics: Analytics,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompareEntry {
    Found {
        path: String,
        total_repos: usize,
        total_commits: usize,
        total_languages: usize,
        streaks: StreakSummary,
        languages: Vec<LanguageTotal>,
    },
    Missing {
        error: String,
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub compare: Vec<CompareEntry>,
    pub filters: FilterLabels,
}

/// Narrows a repository's history by commit time and author.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

impl ScanFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.since.is_none() && self.until.is_none() && self.author.is_none()
    }

    pub fn contains(&self, timestamp: &Timestamp) -> bool {
        let ts = timestamp.to_utc();
        if let Some(since) = self.since {
            if ts < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if ts > until {
                return false;
            }
        }
        true
    }

    pub fn matches(&self, commit: &Commit) -> bool {
        if !self.contains(&commit.timestamp) {
            return false;
        }
        match &self.author {
            Some(needle) => {
                let needle = needle.to_lowercase();
                commit.author.to_lowercase().contains(&needle)
                    || commit.email.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Drops non-matching commits and the file changes that belong to them.
    /// Whole-history fields of `repo` are left alone.
    pub fn apply(&self, mut repo: RepoInfo) -> RepoInfo {
        if self.is_empty() {
            return repo;
        }
        repo.commits.retain(|c| self.matches(c));
        let kept: HashSet<&str> = repo.commits.iter().map(|c| c.hash.as_str()).collect();
        let file_changes = std::mem::take(&mut repo.file_changes)
            .into_iter()
            .filter(|fc| kept.contains(fc.hash.as_str()))
            .collect();
        repo.file_changes = file_changes;
        repo
    }
}

