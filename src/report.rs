use crate::achievements::compute_achievements;
use crate::analytics::{build_analytics_with, AnalyticsOptions};
use crate::clock::Clock;
use crate::model::{
    Achievement, Analytics, AnalyticsOutput, CompareEntry, CompareOutput, FilterLabels, RepoInfo, StreakSummary,
    SCHEMA_VERSION,
};
use crate::util::{format_hour, DAYS};
use anyhow::Result;
use console::style;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;

const TOP_REPOS: usize = 15;
const TOP_LANGUAGES: usize = 10;
const TOP_HOTSPOTS: usize = 10;

pub const NO_REPOS: &str = "No repos found";

pub fn analytics_output(
    scan_path: &str,
    filters: FilterLabels,
    repos: &[RepoInfo],
    clock: &Clock,
    options: &AnalyticsOptions,
) -> AnalyticsOutput {
    let analytics = build_analytics_with(repos, clock, options);
    let achievements = compute_achievements(&analytics);
    AnalyticsOutput {
        version: SCHEMA_VERSION,
        generated_at: clock.now_utc(),
        scan_path: scan_path.to_string(),
        filters,
        analytics,
        achievements,
    }
}

pub fn compare_entry(path: &str, repos: &[RepoInfo], clock: &Clock, options: &AnalyticsOptions) -> CompareEntry {
    if repos.is_empty() {
        return CompareEntry::Missing {
            error: NO_REPOS.to_string(),
            path: path.to_string(),
        };
    }
    let a = build_analytics_with(repos, clock, options);
    CompareEntry::Found {
        path: path.to_string(),
        total_repos: a.total_repos,
        total_commits: a.total_commits,
        total_languages: a.total_languages,
        streaks: StreakSummary::from(&a.streaks),
        languages: a.languages,
    }
}

pub fn output_json(output: &AnalyticsOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_no_repos_json() -> Result<()> {
    println!("{}", serde_json::to_string(&json!({ "error": NO_REPOS }))?);
    Ok(())
}

pub fn output_compare_json(entries: Vec<CompareEntry>, filters: FilterLabels, clock: &Clock) -> Result<()> {
    let output = CompareOutput {
        version: SCHEMA_VERSION,
        generated_at: clock.now_utc(),
        compare: entries,
        filters,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_repo_list(paths: &[PathBuf], json: bool) -> Result<()> {
    if json {
        let listed: Vec<String> = paths.iter().map(|p| p.to_string_lossy().to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
    } else {
        for path in paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}

pub fn output_summary(output: &AnalyticsOutput) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_summary(&mut stdout, output)?;
    Ok(())
}

pub fn output_compare_summary(entries: &[CompareEntry]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for entry in entries {
        write_compare_entry(&mut stdout, entry)?;
    }
    Ok(())
}

/// Renders the human-readable report for one scan.
pub fn write_summary<W: Write>(out: &mut W, output: &AnalyticsOutput) -> Result<()> {
    let a = &output.analytics;

    write_filters(out, &output.filters)?;
    heading(out, &format!("huntd · {}", output.scan_path))?;
    writeln!(
        out,
        "  {} repos  {} commits  {} languages",
        style(a.total_repos).cyan().bold(),
        style(thousands(a.total_commits as u64)).green().bold(),
        style(a.total_languages).yellow().bold()
    )?;
    writeln!(
        out,
        "  streak {} days (longest {}), {} commits today",
        style(a.streaks.current).green().bold(),
        style(a.streaks.longest).yellow().bold(),
        a.streaks.today_commits
    )?;

    write_heatmap(out, &a.heatmap)?;
    write_repositories(out, a)?;
    write_languages(out, a)?;
    write_activity(out, a)?;
    write_velocity_and_focus(out, a)?;
    write_hotspots(out, a)?;
    write_badges(out, &output.achievements)?;
    Ok(())
}

fn write_filters<W: Write>(out: &mut W, filters: &FilterLabels) -> Result<()> {
    let mut parts = Vec::new();
    if let Some(since) = &filters.since {
        parts.push(format!("since {since}"));
    }
    if let Some(until) = &filters.until {
        parts.push(format!("until {until}"));
    }
    if let Some(author) = &filters.author {
        parts.push(format!("author {author}"));
    }
    if !parts.is_empty() {
        writeln!(out, "Filtering commits {}", parts.join(", "))?;
    }
    Ok(())
}

fn heading<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(title).bold())?;
    writeln!(out, "{}", "─".repeat(50))?;
    Ok(())
}

fn write_heatmap<W: Write>(out: &mut W, heatmap: &[Vec<u32>]) -> Result<()> {
    let max = heatmap.iter().flatten().copied().max().unwrap_or(0);
    if max == 0 {
        return Ok(());
    }
    heading(out, "Contribution Heatmap")?;
    for (day, row) in DAYS.iter().zip(heatmap) {
        let cells: String = row
            .iter()
            .map(|&count| {
                let intensity = ((count as f64 / max as f64) * 4.0).ceil() as u32;
                match intensity {
                    0 => " ",
                    1 => "░",
                    2 => "▒",
                    3 => "▓",
                    _ => "█",
                }
            })
            .collect();
        writeln!(out, "  {:<3} {}", &day[..3], style(cells).green())?;
    }
    Ok(())
}

fn write_repositories<W: Write>(out: &mut W, a: &Analytics) -> Result<()> {
    if a.repo_rankings.is_empty() {
        return Ok(());
    }
    heading(out, "Repositories")?;
    for r in a.repo_rankings.iter().take(TOP_REPOS) {
        let health = match r.health_score {
            80.. => style(r.health_score).green(),
            50..=79 => style(r.health_score).yellow(),
            _ => style(r.health_score).red(),
        };
        writeln!(
            out,
            "  {:<28} {:>7} commits  {:<12} health {:>3}  {} {}",
            r.name,
            thousands(r.commits),
            r.primary_language,
            health,
            style(format!("+{}", thousands(r.lines_added))).green(),
            style(format!("-{}", thousands(r.lines_removed))).red()
        )?;
    }
    Ok(())
}

fn write_languages<W: Write>(out: &mut W, a: &Analytics) -> Result<()> {
    if a.languages.is_empty() {
        return Ok(());
    }
    heading(out, "Languages")?;
    let total = a.languages.iter().map(|l| l.lines).sum::<u64>().max(1);
    for lang in a.languages.iter().take(TOP_LANGUAGES) {
        let pct = lang.lines as f64 / total as f64 * 100.0;
        let bar = "█".repeat((pct / 5.0).round() as usize);
        writeln!(
            out,
            "  {:<14} {:>10} lines {:>5.1}%  {}",
            lang.language,
            thousands(lang.lines),
            pct,
            style(bar).blue()
        )?;
    }
    Ok(())
}

fn write_activity<W: Write>(out: &mut W, a: &Analytics) -> Result<()> {
    if a.total_commits == 0 {
        return Ok(());
    }
    heading(out, "Activity")?;
    writeln!(out, "  busiest day   {}", style(&a.activity.busiest_day).cyan())?;
    writeln!(out, "  busiest hour  {}", style(format_hour(a.activity.busiest_hour)).cyan())?;
    writeln!(out, "  commits/day   {}", a.activity.avg_commits_per_day)?;

    let ws = &a.workday_split;
    writeln!(
        out,
        "  weekdays {}% ({} commits, +{} lines)  weekends {}% ({} commits, +{} lines)",
        style(ws.weekday_pct).bold(),
        thousands(ws.weekday_commits as u64),
        thousands(ws.weekday_lines),
        style(ws.weekend_pct).magenta().bold(),
        thousands(ws.weekend_commits as u64),
        thousands(ws.weekend_lines)
    )?;
    Ok(())
}

fn write_velocity_and_focus<W: Write>(out: &mut W, a: &Analytics) -> Result<()> {
    let v = &a.code_velocity;
    if !v.commits_by_week.is_empty() {
        heading(out, "Velocity")?;
        writeln!(out, "  trend      {}", style(v.trend).bold())?;
        writeln!(out, "  peak week  {} ({} commits)", v.peak_week, v.peak_commits)?;
    }

    let f = &a.focus_score;
    if let Some(level) = f.interpretation {
        heading(out, "Focus")?;
        writeln!(out, "  {} repos/day, {}", f.avg_repos_per_day, style(level).bold())?;
        if let Some(day) = f.most_focused_day {
            writeln!(out, "  most focused   {day}")?;
        }
        if let Some(day) = f.most_scattered_day {
            writeln!(out, "  most scattered {day}")?;
        }
    }
    Ok(())
}

fn write_hotspots<W: Write>(out: &mut W, a: &Analytics) -> Result<()> {
    if a.file_hotspots.is_empty() {
        return Ok(());
    }
    heading(out, "File Hotspots")?;
    for h in a.file_hotspots.iter().take(TOP_HOTSPOTS) {
        writeln!(
            out,
            "  {:<48} churn {:>8}  touches {:>4}",
            h.path,
            style(thousands(h.churn)).red(),
            h.touches
        )?;
    }
    Ok(())
}

fn write_badges<W: Write>(out: &mut W, achievements: &[Achievement]) -> Result<()> {
    let unlocked: Vec<&str> = achievements
        .iter()
        .filter(|b| b.unlocked)
        .map(|b| b.name.as_str())
        .collect();
    if unlocked.is_empty() {
        return Ok(());
    }
    heading(out, "Badges")?;
    writeln!(out, "  {}", style(unlocked.join(" · ")).yellow())?;
    Ok(())
}

fn write_compare_entry<W: Write>(out: &mut W, entry: &CompareEntry) -> Result<()> {
    match entry {
        CompareEntry::Missing { error, path } => {
            heading(out, label_for(path))?;
            writeln!(out, "  {}", style(error).dim())?;
        }
        CompareEntry::Found {
            path,
            total_repos,
            total_commits,
            total_languages,
            streaks,
            languages,
        } => {
            heading(out, label_for(path))?;
            writeln!(out, "  {:>8} repos", style(total_repos).cyan().bold())?;
            writeln!(out, "  {:>8} commits", style(thousands(*total_commits as u64)).green().bold())?;
            writeln!(out, "  {:>8} languages", style(total_languages).yellow().bold())?;
            writeln!(out, "  {:>8} day streak", style(streaks.current).green().bold())?;
            writeln!(out, "  {:>8} longest", style(streaks.longest).yellow().bold())?;
            if let Some(top) = languages.first() {
                writeln!(out, "  {:>8} top language", style(&top.language).cyan().bold())?;
            }
        }
    }
    Ok(())
}

/// Last path segment, or the whole path when there is none (`/`).
pub fn label_for(path: &str) -> &str {
    match path.trim_end_matches('/').rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => path,
    }
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
