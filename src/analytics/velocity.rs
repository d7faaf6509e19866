use crate::model::{CodeVelocity, Commit, Trend};
use crate::util::week_key;
use std::collections::BTreeMap;

const TREND_WINDOW: usize = 4;
const TREND_UP: f64 = 1.15;
const TREND_DOWN: f64 = 0.85;

pub fn compute_code_velocity(commits: &[Commit]) -> CodeVelocity {
    let mut commits_by_week: BTreeMap<String, u32> = BTreeMap::new();
    let mut lines_by_week: BTreeMap<String, u64> = BTreeMap::new();

    for commit in commits {
        let week = week_key(commit.timestamp.local_date());
        *commits_by_week.entry(week.clone()).or_insert(0) += 1;
        *lines_by_week.entry(week).or_insert(0) += commit.lines_changed();
    }

    // Earliest week wins a tie for the peak.
    let (peak_week, peak_commits) = commits_by_week
        .iter()
        .fold(None::<(&String, u32)>, |best, (week, &n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((week, n)),
        })
        .map(|(week, n)| (week.clone(), n))
        .unwrap_or_default();

    let counts: Vec<u32> = commits_by_week.values().copied().collect();
    let trend = classify_trend(&counts);

    CodeVelocity {
        commits_by_week,
        lines_by_week,
        trend,
        peak_week,
        peak_commits,
    }
}

/// Compares the last four weeks against the four before them. Needs at
/// least eight weeks of history.
fn classify_trend(weekly: &[u32]) -> Trend {
    if weekly.len() < TREND_WINDOW * 2 {
        return Trend::Stable;
    }

    let recent = &weekly[weekly.len() - TREND_WINDOW..];
    let prior = &weekly[weekly.len() - TREND_WINDOW * 2..weekly.len() - TREND_WINDOW];
    let mean = |xs: &[u32]| xs.iter().map(|&x| x as f64).sum::<f64>() / xs.len() as f64;

    let prior_mean = mean(prior);
    if prior_mean == 0.0 {
        return Trend::Stable;
    }

    let ratio = mean(recent) / prior_mean;
    if ratio >= TREND_UP {
        Trend::Up
    } else if ratio <= TREND_DOWN {
        Trend::Down
    } else {
        Trend::Stable
    }
}
