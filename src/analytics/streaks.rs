use crate::clock::Clock;
use crate::model::{Commit, Streaks};
use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

pub fn compute_streaks(commits: &[Commit], clock: &Clock) -> Streaks {
    if commits.is_empty() {
        return Streaks::default();
    }

    let dates: BTreeSet<NaiveDate> = commits.iter().map(|c| c.timestamp.local_date()).collect();
    let today = clock.today();

    let today_commits = commits
        .iter()
        .filter(|c| c.timestamp.local_date() == today)
        .count() as u32;

    let mut longest = 1u32;
    let mut run = 1u32;
    let mut previous: Option<NaiveDate> = None;
    for &date in &dates {
        if let Some(prev) = previous {
            if prev.checked_add_days(Days::new(1)) == Some(date) {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 1;
            }
        }
        previous = Some(date);
    }

    // A streak survives until a whole day passes without a commit.
    let mut check = if dates.contains(&today) {
        Some(today)
    } else {
        today.pred_opt()
    };
    let mut current = 0u32;
    while let Some(day) = check.filter(|d| dates.contains(d)) {
        current += 1;
        check = day.pred_opt();
    }

    Streaks {
        current,
        longest,
        today_commits,
    }
}
