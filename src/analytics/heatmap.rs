use crate::clock::Clock;
use crate::model::Commit;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

pub const DEFAULT_WEEKS: usize = 52;
/// Widest grid built; larger requests are clamped to this.
pub const MAX_WEEKS: usize = 5200;

/// Builds a 7 × `weeks` grid of daily commit counts.
///
/// Rows run Monday (0) to Sunday (6); the last column is the current week.
/// Days after today are never filled. `weeks` is capped at [`MAX_WEEKS`].
pub fn compute_heatmap(commits: &[Commit], weeks: usize, clock: &Clock) -> Vec<Vec<u32>> {
    let weeks = weeks.min(MAX_WEEKS);
    let mut matrix = vec![vec![0u32; weeks]; 7];
    if weeks == 0 {
        return matrix;
    }

    let today = clock.today();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let Some(start) = monday.checked_sub_signed(Duration::weeks(weeks as i64 - 1)) else {
        return matrix;
    };

    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for commit in commits {
        *counts.entry(commit.timestamp.local_date()).or_insert(0) += 1;
    }

    for (week, column_start) in (0..weeks).map(|w| (w, start + Duration::weeks(w as i64))) {
        for (dow, row) in matrix.iter_mut().enumerate() {
            let Some(day) = column_start.checked_add_signed(Duration::days(dow as i64)) else {
                continue;
            };
            if day <= today {
                row[week] = counts.get(&day).copied().unwrap_or(0);
            }
        }
    }

    matrix
}
