use crate::clock::Clock;
use crate::model::{ActivityPattern, Commit, FocusLevel, FocusScore, RepoInfo, WorkdaySplit};
use crate::util::{is_weekend, round1, DAYS};
use chrono::{Datelike, NaiveDate, Timelike};
use std::collections::{BTreeMap, HashSet};

/// When commits happen: hour-of-day and weekday histograms in local time.
pub fn compute_activity_patterns(commits: &[Commit], clock: &Clock) -> ActivityPattern {
    if commits.is_empty() {
        return ActivityPattern::default();
    }

    let mut by_hour = vec![0u32; 24];
    let mut by_dow = vec![0u32; 7];
    for commit in commits {
        let local = commit.timestamp.local();
        by_hour[local.hour() as usize] += 1;
        by_dow[local.weekday().num_days_from_monday() as usize] += 1;
    }

    let busiest_hour = first_max_index(&by_hour);
    let busiest_dow = first_max_index(&by_dow);

    let avg_commits_per_day = match commits.iter().map(|c| c.timestamp.local_date()).min() {
        Some(first) => {
            let span = (clock.today() - first).num_days().max(1);
            round1(commits.len() as f64 / span as f64)
        }
        None => 0.0,
    };

    ActivityPattern {
        busiest_day: DAYS[busiest_dow].to_string(),
        busiest_hour: busiest_hour as u32,
        avg_commits_per_day,
        commits_by_hour: by_hour,
        commits_by_dow: by_dow,
    }
}

fn first_max_index(counts: &[u32]) -> usize {
    let max = counts.iter().copied().max().unwrap_or(0);
    counts.iter().position(|&c| c == max).unwrap_or(0)
}

/// How many repositories get touched per active day.
pub fn compute_focus_score(repos: &[RepoInfo]) -> FocusScore {
    let mut per_day: BTreeMap<NaiveDate, HashSet<usize>> = BTreeMap::new();
    for (index, repo) in repos.iter().enumerate() {
        for commit in &repo.commits {
            per_day
                .entry(commit.timestamp.local_date())
                .or_default()
                .insert(index);
        }
    }

    if per_day.is_empty() {
        return FocusScore::default();
    }

    let total: usize = per_day.values().map(HashSet::len).sum();
    let avg_repos_per_day = round1(total as f64 / per_day.len() as f64);

    // BTreeMap iterates oldest first, so strict comparisons keep the
    // earliest date on ties.
    let mut focused: Option<(NaiveDate, usize)> = None;
    let mut scattered: Option<(NaiveDate, usize)> = None;
    for (&date, repos) in &per_day {
        let n = repos.len();
        if focused.map_or(true, |(_, best)| n < best) {
            focused = Some((date, n));
        }
        if scattered.map_or(true, |(_, best)| n > best) {
            scattered = Some((date, n));
        }
    }

    let interpretation = if avg_repos_per_day <= 2.0 {
        FocusLevel::DeepFocus
    } else if avg_repos_per_day <= 5.0 {
        FocusLevel::Balanced
    } else {
        FocusLevel::Scattered
    };

    FocusScore {
        avg_repos_per_day,
        most_focused_day: focused.map(|(d, _)| d),
        most_scattered_day: scattered.map(|(d, _)| d),
        interpretation: Some(interpretation),
    }
}

pub fn compute_workday_split(commits: &[Commit]) -> WorkdaySplit {
    let mut split = WorkdaySplit::default();
    for commit in commits {
        if is_weekend(commit.timestamp.local().weekday()) {
            split.weekend_commits += 1;
            split.weekend_lines += commit.lines_changed();
        } else {
            split.weekday_commits += 1;
            split.weekday_lines += commit.lines_changed();
        }
    }

    let total = (split.weekday_commits + split.weekend_commits).max(1) as f64;
    split.weekday_pct = round1(split.weekday_commits as f64 / total * 100.0);
    split.weekend_pct = round1(split.weekend_commits as f64 / total * 100.0);
    split
}
