mod common;

use common::*;
use huntd::analytics::heatmap::MAX_WEEKS;
use huntd::analytics::*;
use huntd::model::{FocusLevel, LanguageTotal, RepoInfo, Streaks, Trend};
use pretty_assertions::assert_eq;

fn lang(language: &str, lines: u64) -> LanguageTotal {
    LanguageTotal {
        language: language.to_string(),
        lines,
    }
}

#[test]
fn streaks_empty_input_is_zero() {
    assert_eq!(compute_streaks(&[], &clock()), Streaks::default());
}

#[test]
fn streaks_break_on_gaps_and_count_back_from_today() {
    let commits = commits_on(&[0, 1, 5, 6]);
    let streaks = compute_streaks(&commits, &clock());
    assert_eq!(
        streaks,
        Streaks {
            current: 2,
            longest: 2,
            today_commits: 1,
        }
    );
}

#[test]
fn streak_survives_until_a_full_day_is_missed() {
    let commits = commits_on(&[1, 2, 3]);
    let streaks = compute_streaks(&commits, &clock());
    assert_eq!(streaks.current, 3);
    assert_eq!(streaks.today_commits, 0);

    let stale = commits_on(&[2, 3]);
    let streaks = compute_streaks(&stale, &clock());
    assert_eq!(streaks.current, 0);
    assert_eq!(streaks.longest, 2);
}

#[test]
fn same_day_commits_count_once_toward_streaks() {
    let commits = commits_on(&[0, 0, 0]);
    let streaks = compute_streaks(&commits, &clock());
    assert_eq!(streaks.longest, 1);
    assert_eq!(streaks.current, 1);
    assert_eq!(streaks.today_commits, 3);
}

#[test]
fn streaks_use_the_commit_offset_for_its_date() {
    // 04:30 UTC on the 18th is still the evening of the 17th in -05:00.
    let commits = vec![commit("a", at("2025-06-17T23:30:00-05:00"))];
    let streaks = compute_streaks(&commits, &clock());
    assert_eq!(streaks.today_commits, 0);
    assert_eq!(streaks.current, 1);
    assert_eq!(streaks.longest, 1);
}

#[test]
fn heatmap_has_seven_rows_of_requested_weeks() {
    let heatmap = compute_heatmap(&[], 52, &clock());
    assert_eq!(heatmap.len(), 7);
    assert!(heatmap.iter().all(|row| row.len() == 52));
    assert!(heatmap.iter().flatten().all(|&cell| cell == 0));

    let empty = compute_heatmap(&commits_on(&[0]), 0, &clock());
    assert_eq!(empty.len(), 7);
    assert!(empty.iter().all(Vec::is_empty));
}

#[test]
fn heatmap_places_commits_by_weekday_and_week() {
    // Today is a Wednesday; ten days ago was Sunday 2025-06-08.
    let commits = commits_on(&[0, 0, 10, 400]);
    let heatmap = compute_heatmap(&commits, 52, &clock());

    assert_eq!(heatmap[2][51], 2);
    assert_eq!(heatmap[6][49], 1);
    assert_eq!(heatmap.iter().flatten().sum::<u32>(), 3);
}

#[test]
fn heatmap_never_fills_future_days() {
    let commits = commits_on(&[-1, -2, 0]);
    let heatmap = compute_heatmap(&commits, 4, &clock());
    assert_eq!(heatmap[3][3], 0);
    assert_eq!(heatmap[4][3], 0);
    assert_eq!(heatmap.iter().flatten().sum::<u32>(), 1);
}

#[test]
fn heatmap_clamps_oversized_windows() {
    let heatmap = compute_heatmap(&commits_on(&[0, 3000]), 14_000_000, &clock());
    assert_eq!(heatmap.len(), 7);
    assert!(heatmap.iter().all(|row| row.len() == MAX_WEEKS));
    assert_eq!(heatmap[2][MAX_WEEKS - 1], 1);
    assert_eq!(heatmap.iter().flatten().sum::<u32>(), 2);

    let widest = compute_heatmap(&[], usize::MAX, &clock());
    assert!(widest.iter().all(|row| row.len() == MAX_WEEKS));
}

#[test]
fn languages_sum_churn_per_language() {
    let ts = days_ago(1);
    let changes = vec![
        change("a", ts, "main.py", 10, 5),
        change("a", ts, "lib.rs", 20, 0),
        change("b", ts, "util.py", 1, 0),
    ];
    assert_eq!(
        compute_languages(&changes),
        vec![lang("Rust", 20), lang("Python", 16)]
    );
}

#[test]
fn language_ties_keep_first_seen_order() {
    let ts = days_ago(1);
    let changes = vec![
        change("a", ts, "x.go", 3, 2),
        change("a", ts, "y.rs", 5, 0),
        change("a", ts, "Makefile", 1, 0),
        change("a", ts, "data.xyz", 1, 0),
    ];
    assert_eq!(
        compute_languages(&changes),
        vec![lang("Go", 5), lang("Rust", 5), lang("(no ext)", 1), lang(".xyz", 1)]
    );
}

#[test]
fn language_evolution_groups_by_month_and_keeps_top_eight() {
    let exts = ["py", "rs", "go", "js", "ts", "rb", "java", "c", "cpp", "lua"];
    let mut changes = Vec::new();
    for (i, ext) in exts.iter().enumerate() {
        let lines = (exts.len() - i) as u64;
        changes.push(change("a", at("2025-01-15T10:00:00+00:00"), &format!("f.{ext}"), lines, 0));
    }
    changes.push(change("b", at("2025-02-01T10:00:00+00:00"), "g.py", 4, 1));

    let evolution = compute_language_evolution(&changes);

    assert_eq!(
        evolution.monthly.keys().cloned().collect::<Vec<_>>(),
        vec!["2025-01".to_string(), "2025-02".to_string()]
    );
    assert_eq!(evolution.monthly["2025-01"]["Python"], 10);
    assert_eq!(evolution.monthly["2025-02"]["Python"], 5);
    assert_eq!(evolution.monthly["2025-01"].len(), 10);
    assert_eq!(
        evolution.top_languages,
        vec!["Python", "Rust", "Go", "JavaScript", "TypeScript", "Ruby", "Java", "C"]
    );
}

fn healthy_repo() -> RepoInfo {
    let mut info = RepoInfo::new("/code/healthy", "healthy");
    info.last_commit = Some(days_ago(1));
    info.total_commits = 150;
    info.has_readme = true;
    info.branch_count = 3;
    info.is_dirty = false;
    info
}

#[test]
fn perfect_repo_scores_one_hundred() {
    assert_eq!(compute_health_score(&healthy_repo(), &clock()), 100);
}

#[test]
fn stale_repo_loses_recency_points() {
    let mut info = healthy_repo();
    info.last_commit = Some(days_ago(400));
    assert_eq!(compute_health_score(&info, &clock()), 60);

    info.last_commit = Some(days_ago(20));
    assert_eq!(compute_health_score(&info, &clock()), 90);
    info.last_commit = Some(days_ago(60));
    assert_eq!(compute_health_score(&info, &clock()), 80);
    info.last_commit = Some(days_ago(200));
    assert_eq!(compute_health_score(&info, &clock()), 70);
}

#[test]
fn empty_repo_scores_zero() {
    let info = RepoInfo::new("/code/empty", "empty");
    assert_eq!(compute_health_score(&info, &clock()), 0);
}

#[test]
fn health_tiers_for_volume_branches_and_cleanliness() {
    let mut info = healthy_repo();
    info.is_dirty = true;
    assert_eq!(compute_health_score(&info, &clock()), 90);

    let mut info = healthy_repo();
    info.total_commits = 12;
    info.branch_count = 8;
    assert_eq!(compute_health_score(&info, &clock()), 40 + 10 + 15 + 10 + 10);

    let mut info = healthy_repo();
    info.total_commits = 50;
    info.branch_count = 30;
    assert_eq!(compute_health_score(&info, &clock()), 40 + 15 + 15 + 5 + 10);

    let mut info = RepoInfo::new("/code/docs", "docs");
    info.has_readme = true;
    assert_eq!(compute_health_score(&info, &clock()), 15);
}

#[test]
fn rankings_sort_by_commits_and_pick_primary_language() {
    let ts = days_ago(2);
    let a = repo(
        "a",
        vec![
            commit_lines("a1", ts, 10, 2),
            commit_lines("a2", ts, 5, 1),
            commit_lines("a3", ts, 0, 0),
        ],
        vec![change("a1", ts, "x.py", 10, 0), change("a2", ts, "y.rs", 30, 0)],
    );
    let b = repo("b", commits_on(&[1, 2, 3, 4, 5]), vec![]);
    let c = repo("c", commits_on(&[1, 2, 3]), vec![]);

    let rankings = compute_repo_rankings(&[a, b, c], &clock());
    let names: Vec<&str> = rankings.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "c"]);

    let a = &rankings[1];
    assert_eq!(a.commits, 3);
    assert_eq!(a.primary_language, "Rust");
    assert_eq!(a.lines_added, 15);
    assert_eq!(a.lines_removed, 3);
    assert_eq!(rankings[0].primary_language, ranking::NO_LANGUAGE);
}

#[test]
fn activity_pattern_empty_input() {
    let activity = compute_activity_patterns(&[], &clock());
    assert_eq!(activity.busiest_day, "");
    assert_eq!(activity.avg_commits_per_day, 0.0);
    assert_eq!(activity.commits_by_hour, vec![0; 24]);
    assert_eq!(activity.commits_by_dow, vec![0; 7]);
}

#[test]
fn activity_ties_pick_the_lowest_index() {
    let commits = vec![
        commit("a", at("2025-06-16T09:15:00+00:00")),
        commit("b", at("2025-06-16T14:00:00+00:00")),
        commit("c", at("2025-06-17T09:45:00+00:00")),
        commit("d", at("2025-06-17T14:30:00+00:00")),
    ];
    let activity = compute_activity_patterns(&commits, &clock());
    assert_eq!(activity.busiest_hour, 9);
    assert_eq!(activity.busiest_day, "Monday");
    assert_eq!(activity.commits_by_hour[9], 2);
    assert_eq!(activity.commits_by_hour[14], 2);
    assert_eq!(activity.commits_by_dow[..2], [2, 2]);
}

#[test]
fn activity_uses_local_hour() {
    let commits = vec![commit("a", at("2025-06-16T23:30:00-05:00"))];
    let activity = compute_activity_patterns(&commits, &clock());
    assert_eq!(activity.busiest_hour, 23);
    assert_eq!(activity.busiest_day, "Monday");
}

#[test]
fn average_commits_per_day_spans_to_today() {
    let commits = commits_on(&[10, 5, 0]);
    let activity = compute_activity_patterns(&commits, &clock());
    assert_eq!(activity.avg_commits_per_day, 0.3);

    let today_only = commits_on(&[0, 0]);
    let activity = compute_activity_patterns(&today_only, &clock());
    assert_eq!(activity.avg_commits_per_day, 2.0);
}

fn weekly(counts: &[usize]) -> Vec<huntd::model::Commit> {
    let mut commits = Vec::new();
    for (week, &n) in counts.iter().enumerate() {
        for i in 0..n {
            let day = chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap() + chrono::Duration::weeks(week as i64);
            let ts = day.and_hms_opt(10, 0, 0).unwrap();
            commits.push(commit_lines(&format!("w{week}-{i}"), ts.into(), 3, 1));
        }
    }
    commits
}

#[test]
fn fewer_than_eight_weeks_is_stable() {
    let velocity = compute_code_velocity(&weekly(&[1, 20, 40]));
    assert_eq!(velocity.commits_by_week.len(), 3);
    assert_eq!(velocity.trend, Trend::Stable);
    assert_eq!(velocity.peak_week, "2025-W04");
    assert_eq!(velocity.peak_commits, 40);
}

#[test]
fn trend_compares_last_four_weeks_with_the_four_before() {
    assert_eq!(compute_code_velocity(&weekly(&[1, 1, 1, 1, 2, 2, 2, 2])).trend, Trend::Up);
    assert_eq!(compute_code_velocity(&weekly(&[4, 4, 4, 4, 1, 1, 1, 1])).trend, Trend::Down);
    assert_eq!(compute_code_velocity(&weekly(&[9, 1, 1, 1, 1, 1, 1, 1, 1])).trend, Trend::Stable);
}

#[test]
fn velocity_counts_lines_and_earliest_peak_wins() {
    let velocity = compute_code_velocity(&weekly(&[2, 1, 2]));
    assert_eq!(velocity.peak_week, "2025-W02");
    assert_eq!(velocity.peak_commits, 2);
    assert_eq!(velocity.lines_by_week["2025-W02"], 8);
    assert_eq!(velocity.lines_by_week["2025-W03"], 4);
}

#[test]
fn velocity_empty_input() {
    let velocity = compute_code_velocity(&[]);
    assert!(velocity.commits_by_week.is_empty());
    assert_eq!(velocity.peak_week, "");
    assert_eq!(velocity.peak_commits, 0);
    assert_eq!(velocity.trend, Trend::Stable);
}

#[test]
fn single_repo_on_distinct_days_is_deep_focus() {
    let repos = vec![repo("solo", commits_on(&[1, 2, 3, 4, 5]), vec![])];
    let focus = compute_focus_score(&repos);
    assert_eq!(focus.avg_repos_per_day, 1.0);
    assert_eq!(focus.interpretation, Some(FocusLevel::DeepFocus));
    assert_eq!(focus.interpretation.map(|l| l.to_string()).as_deref(), Some("deep focus"));
}

#[test]
fn focus_picks_earliest_date_on_ties() {
    let repos = vec![
        repo("a", commits_on(&[3, 2, 1]), vec![]),
        repo("b", commits_on(&[3]), vec![]),
        repo("c", commits_on(&[3]), vec![]),
    ];
    let focus = compute_focus_score(&repos);
    // Day 3 ago: three repos; days 2 and 1 ago: one each.
    assert_eq!(focus.avg_repos_per_day, 1.7);
    assert_eq!(focus.most_scattered_day, Some(days_ago(3).local_date()));
    assert_eq!(focus.most_focused_day, Some(days_ago(2).local_date()));
}

#[test]
fn focus_interpretation_thresholds() {
    let balanced: Vec<_> = ["a", "b", "c"].iter().map(|n| repo(n, commits_on(&[1]), vec![])).collect();
    assert_eq!(compute_focus_score(&balanced).interpretation, Some(FocusLevel::Balanced));

    let scattered: Vec<_> = ["a", "b", "c", "d", "e", "f"]
        .iter()
        .map(|n| repo(n, commits_on(&[1]), vec![]))
        .collect();
    assert_eq!(compute_focus_score(&scattered).interpretation, Some(FocusLevel::Scattered));

    let empty = compute_focus_score(&[repo("a", vec![], vec![])]);
    assert_eq!(empty.interpretation, None);
    assert_eq!(empty.avg_repos_per_day, 0.0);
    assert_eq!(empty.most_focused_day, None);
}

#[test]
fn workday_split_partitions_by_local_weekday() {
    let commits = vec![
        commit_lines("sat", at("2025-06-14T10:00:00+00:00"), 10, 5),
        commit_lines("mon", at("2025-06-16T10:00:00+00:00"), 1, 1),
        commit_lines("tue", at("2025-06-17T10:00:00+00:00"), 2, 0),
    ];
    let split = compute_workday_split(&commits);
    assert_eq!(split.weekday_commits, 2);
    assert_eq!(split.weekend_commits, 1);
    assert_eq!(split.weekday_pct, 66.7);
    assert_eq!(split.weekend_pct, 33.3);
    assert_eq!(split.weekday_lines, 4);
    assert_eq!(split.weekend_lines, 15);
}

#[test]
fn workday_split_empty_is_all_zero() {
    let split = compute_workday_split(&[]);
    assert_eq!(split.weekday_pct, 0.0);
    assert_eq!(split.weekend_pct, 0.0);
    assert_eq!(split.weekday_commits + split.weekend_commits, 0);
}

#[test]
fn hotspots_sum_churn_and_count_distinct_commits() {
    let ts = days_ago(1);
    let repos = vec![repo(
        "r",
        vec![],
        vec![change("h1", ts, "hot.py", 60, 40), change("h2", ts, "hot.py", 150, 50)],
    )];
    let hotspots = compute_file_hotspots(&repos, 15);
    assert_eq!(hotspots.len(), 1);
    assert_eq!(hotspots[0].path, "r/hot.py");
    assert_eq!(hotspots[0].churn, 300);
    assert_eq!(hotspots[0].touches, 2);
}

#[test]
fn hotspots_dedupe_touches_sort_and_truncate() {
    let ts = days_ago(1);
    let repos = vec![
        repo(
            "one",
            vec![],
            vec![
                change("x", ts, "b.rs", 5, 5),
                change("x", ts, "b.rs", 1, 0),
                change("y", ts, "a.rs", 10, 0),
                change("y", ts, "c.rs", 1, 0),
            ],
        ),
        repo("two", vec![], vec![change("z", ts, "a.rs", 50, 0)]),
    ];

    let hotspots = compute_file_hotspots(&repos, 3);
    let view: Vec<(&str, u64, u32)> = hotspots.iter().map(|h| (h.path.as_str(), h.churn, h.touches)).collect();
    assert_eq!(view, vec![("two/a.rs", 50, 1), ("one/b.rs", 11, 1), ("one/a.rs", 10, 1)]);

    assert!(compute_file_hotspots(&repos, 0).is_empty());
}

fn sample_repos() -> Vec<RepoInfo> {
    let ts = days_ago(3);
    vec![
        repo(
            "api",
            vec![commit_lines("a1", days_ago(0), 12, 3), commit_lines("a2", ts, 4, 4)],
            vec![change("a1", days_ago(0), "src/main.rs", 12, 3), change("a2", ts, "README.md", 4, 4)],
        ),
        repo(
            "web",
            vec![commit_lines("w1", days_ago(1), 30, 0)],
            vec![change("w1", days_ago(1), "app.ts", 30, 0)],
        ),
    ]
}

#[test]
fn build_assembles_every_aggregate() {
    let repos = sample_repos();
    let analytics = build_analytics(&repos, &clock());

    assert_eq!(analytics.total_repos, 2);
    assert_eq!(analytics.total_commits, 3);
    assert_eq!(analytics.total_languages, 3);
    assert_eq!(analytics.languages[0], lang("TypeScript", 30));
    assert_eq!(analytics.streaks.current, 2);
    assert_eq!(analytics.heatmap.len(), 7);
    assert_eq!(analytics.heatmap[0].len(), 52);
    assert_eq!(analytics.repo_rankings[0].name, "api");
    assert_eq!(analytics.file_hotspots[0].path, "web/app.ts");
}

#[test]
fn build_honours_options() {
    let options = AnalyticsOptions {
        heatmap_weeks: 4,
        hotspot_limit: 1,
    };
    let analytics = build_analytics_with(&sample_repos(), &clock(), &options);
    assert!(analytics.heatmap.iter().all(|row| row.len() == 4));
    assert_eq!(analytics.file_hotspots.len(), 1);
}

#[test]
fn build_is_deterministic_and_leaves_input_alone() {
    let repos = sample_repos();
    let before = repos.clone();
    let first = build_analytics(&repos, &clock());
    let second = build_analytics(&repos, &clock());
    assert_eq!(first, second);
    assert_eq!(repos, before);
}

#[test]
fn build_of_nothing_is_empty() {
    let analytics = build_analytics(&[], &clock());
    assert_eq!(analytics.total_repos, 0);
    assert_eq!(analytics.total_commits, 0);
    assert!(analytics.languages.is_empty());
    assert!(analytics.repo_rankings.is_empty());
    assert_eq!(analytics.focus_score.interpretation, None);
}
