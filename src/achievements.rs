use crate::model::{Achievement, Analytics};

type Predicate = fn(&Analytics) -> bool;

/// Badge names paired with their unlock condition.
pub const BADGES: &[(&str, Predicate)] = &[
    ("Century", |a: &Analytics| a.streaks.longest >= 100),
    ("Marathon", |a: &Analytics| a.streaks.longest >= 365),
    ("Prolific", |a: &Analytics| a.total_commits >= 1000),
    ("Night Owl", |a: &Analytics| hour_share(a, 0..6) >= 0.5),
    ("Early Bird", |a: &Analytics| hour_share(a, 5..9) >= 0.5),
    ("Weekend Warrior", |a: &Analytics| a.workday_split.weekend_pct >= 40.0),
    ("Polyglot", |a: &Analytics| a.languages.iter().filter(|l| l.lines >= 100).count() >= 5),
    ("Diversified", |a: &Analytics| a.total_repos >= 10),
    ("Monorepo Monster", |a: &Analytics| a.repo_rankings.iter().any(|r| r.commits >= 500)),
    ("Clean Freak", |a: &Analytics| {
        !a.repo_rankings.is_empty() && a.repo_rankings.iter().all(|r| r.health_score >= 80)
    }),
];

fn hour_share(analytics: &Analytics, hours: std::ops::Range<usize>) -> f64 {
    let by_hour = &analytics.activity.commits_by_hour;
    let total = by_hour.iter().sum::<u32>().max(1);
    let in_range: u32 = by_hour.get(hours).map(|s| s.iter().sum()).unwrap_or(0);
    in_range as f64 / total as f64
}

pub fn compute_achievements(analytics: &Analytics) -> Vec<Achievement> {
    BADGES
        .iter()
        .map(|(name, unlocked)| Achievement {
            name: name.to_string(),
            unlocked: unlocked(analytics),
        })
        .collect()
}
