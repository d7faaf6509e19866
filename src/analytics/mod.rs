//! Aggregation engine: pure functions from scanned history to statistics.
//!
//! Every aggregator reads borrowed input and returns a fresh value. Anything
//! that depends on "now" takes a [`Clock`] so a build is reproducible.

pub mod activity;
pub mod heatmap;
pub mod hotspots;
pub mod languages;
pub mod ranking;
pub mod streaks;
pub mod velocity;

pub use activity::{compute_activity_patterns, compute_focus_score, compute_workday_split};
pub use heatmap::compute_heatmap;
pub use hotspots::compute_file_hotspots;
pub use languages::{compute_language_evolution, compute_languages};
pub use ranking::{compute_health_score, compute_repo_rankings};
pub use streaks::compute_streaks;
pub use velocity::compute_code_velocity;

use crate::clock::Clock;
use crate::model::{Analytics, Commit, FileChange, RepoInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsOptions {
    pub heatmap_weeks: usize,
    pub hotspot_limit: usize,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            heatmap_weeks: heatmap::DEFAULT_WEEKS,
            hotspot_limit: hotspots::DEFAULT_TOP_N,
        }
    }
}

pub fn build_analytics(repos: &[RepoInfo], clock: &Clock) -> Analytics {
    build_analytics_with(repos, clock, &AnalyticsOptions::default())
}

pub fn build_analytics_with(repos: &[RepoInfo], clock: &Clock, options: &AnalyticsOptions) -> Analytics {
    let all_commits: Vec<Commit> = repos.iter().flat_map(|r| r.commits.iter().cloned()).collect();
    let all_file_changes: Vec<FileChange> = repos
        .iter()
        .flat_map(|r| r.file_changes.iter().cloned())
        .collect();

    let languages = compute_languages(&all_file_changes);

    Analytics {
        total_repos: repos.len(),
        total_commits: all_commits.len(),
        total_languages: languages.len(),
        streaks: compute_streaks(&all_commits, clock),
        heatmap: compute_heatmap(&all_commits, options.heatmap_weeks, clock),
        languages,
        repo_rankings: compute_repo_rankings(repos, clock),
        activity: compute_activity_patterns(&all_commits, clock),
        language_evolution: compute_language_evolution(&all_file_changes),
        code_velocity: compute_code_velocity(&all_commits),
        focus_score: compute_focus_score(repos),
        workday_split: compute_workday_split(&all_commits),
        file_hotspots: compute_file_hotspots(repos, options.hotspot_limit),
    }
}
