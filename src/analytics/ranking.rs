use super::languages::LanguageTally;
use crate::clock::Clock;
use crate::language::language_for;
use crate::model::{RepoInfo, RepoRanking};

pub const NO_LANGUAGE: &str = "—";

/// Ranks repositories by (filtered) commit count, busiest first.
pub fn compute_repo_rankings(repos: &[RepoInfo], clock: &Clock) -> Vec<RepoRanking> {
    let mut rankings: Vec<RepoRanking> = repos
        .iter()
        .map(|repo| {
            let mut tally = LanguageTally::default();
            for fc in &repo.file_changes {
                tally.add(language_for(&fc.ext), fc.churn());
            }
            let primary_language = tally
                .into_ranked()
                .into_iter()
                .next()
                .map(|t| t.language)
                .unwrap_or_else(|| NO_LANGUAGE.to_string());

            RepoRanking {
                name: repo.name.clone(),
                path: repo.path.clone(),
                commits: repo.commits.len() as u64,
                primary_language,
                health_score: compute_health_score(repo, clock),
                lines_added: repo.commits.iter().map(|c| c.insertions).sum(),
                lines_removed: repo.commits.iter().map(|c| c.deletions).sum(),
                last_commit: repo.last_commit,
            }
        })
        .collect();

    rankings.sort_by(|a, b| b.commits.cmp(&a.commits));
    rankings
}

/// 0-100 composite of recency, volume, README, branch count and a clean
/// working tree. Uses whole-history fields only.
pub fn compute_health_score(repo: &RepoInfo, clock: &Clock) -> u32 {
    recency_points(repo, clock)
        + volume_points(repo.total_commits)
        + if repo.has_readme { 15 } else { 0 }
        + branch_points(repo.branch_count)
        + if !repo.is_dirty && repo.total_commits > 0 { 10 } else { 0 }
}

fn recency_points(repo: &RepoInfo, clock: &Clock) -> u32 {
    let Some(last) = repo.last_commit else {
        return 0;
    };
    let days_ago = (clock.now_utc() - last.to_utc()).num_days();
    match days_ago {
        d if d <= 7 => 40,
        d if d <= 30 => 30,
        d if d <= 90 => 20,
        d if d <= 365 => 10,
        _ => 0,
    }
}

fn volume_points(total_commits: u64) -> u32 {
    match total_commits {
        n if n >= 100 => 20,
        n if n >= 50 => 15,
        n if n >= 10 => 10,
        n if n >= 1 => 5,
        _ => 0,
    }
}

fn branch_points(branches: u32) -> u32 {
    match branches {
        0 => 0,
        1..=5 => 15,
        6..=10 => 10,
        _ => 5,
    }
}
