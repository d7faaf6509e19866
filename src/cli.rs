use crate::analytics::AnalyticsOptions;
use crate::clock::Clock;
use crate::error::HuntdError;
use crate::model::{FilterLabels, RepoInfo, ScanFilter};
use crate::report;
use crate::scan::{self, expand_home, ScanOptions};
use crate::util::parse_date;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "huntd")]
#[command(about = "Developer analytics across every git repository under a directory")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Only commits after this date (RFC3339, YYYY-MM-DD, or e.g. \"3 months ago\")")]
    pub since: Option<String>,

    #[arg(long, global = true, help = "Only commits before this date (RFC3339, YYYY-MM-DD, or e.g. \"2weeks\")")]
    pub until: Option<String>,

    #[arg(long, global = true, help = "Only commits whose author name or email contains this text")]
    pub author: Option<String>,

    #[arg(long, global = true, help = "Directory for the extraction cache database")]
    pub cache: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = scan::DEFAULT_MAX_DEPTH, help = "Maximum directory depth when discovering repositories")]
    pub max_depth: usize,

    #[arg(long, global = true, default_value_t = scan::DEFAULT_JOBS, help = "Repositories scanned in parallel")]
    pub jobs: usize,

    #[arg(
        long,
        global = true,
        default_value_t = crate::analytics::heatmap::DEFAULT_WEEKS,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=crate::analytics::heatmap::MAX_WEEKS as u64),
        help = "Weeks shown in the heatmap"
    )]
    pub weeks: usize,

    #[arg(long, global = true, default_value_t = crate::analytics::hotspots::DEFAULT_TOP_N, help = "Number of file hotspots to report")]
    pub top: usize,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity (-v info, -vv debug)")]
    pub verbose: u8,

    #[arg(long, global = true, help = "Hide the progress bar")]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory tree and report analytics
    Scan {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(default_value = ".", help = "Directory to scan")]
        path: String,
    },
    /// Compare analytics for two directory trees
    Compare {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        first: String,

        second: String,
    },
    /// List discovered repositories
    Repos {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(default_value = ".", help = "Directory to search")]
        path: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.common.verbose)?;
        let clock = Clock::system();

        match self.command {
            Commands::Scan { json, path } => exec_scan(&self.common, &clock, &path, json),
            Commands::Compare { json, first, second } => {
                exec_compare(&self.common, &clock, [first.as_str(), second.as_str()], json)
            }
            Commands::Repos { json, path } => exec_repos(&self.common, &path, json),
        }
    }
}

impl CommonArgs {
    /// Resolves the textual date and author flags against `clock`.
    pub fn filter(&self, clock: &Clock) -> Result<ScanFilter, HuntdError> {
        let now = clock.now_utc();
        let mut filter = ScanFilter::new();
        if let Some(since) = &self.since {
            filter = filter.with_since(parse_date(since, now, false)?);
        }
        if let Some(until) = &self.until {
            filter = filter.with_until(parse_date(until, now, true)?);
        }
        if let (Some(since), Some(until)) = (filter.since, filter.until) {
            if since > until {
                return Err(HuntdError::InvalidDate(format!(
                    "--since ({since}) is after --until ({until})"
                )));
            }
        }
        if let Some(author) = &self.author {
            filter = filter.with_author(author.clone());
        }
        Ok(filter)
    }

    pub fn labels(&self) -> FilterLabels {
        FilterLabels {
            since: self.since.clone(),
            until: self.until.clone(),
            author: self.author.clone(),
        }
    }

    pub fn scan_options(&self, clock: &Clock) -> Result<ScanOptions> {
        Ok(ScanOptions {
            max_depth: self.max_depth,
            jobs: self.jobs,
            filter: self.filter(clock).context("Invalid filter")?,
            cache_dir: self.cache.as_deref().map(|dir| expand_home(&dir.to_string_lossy())),
            progress: !self.no_progress,
        })
    }

    pub fn analytics_options(&self) -> AnalyticsOptions {
        AnalyticsOptions {
            heatmap_weeks: self.weeks,
            hotspot_limit: self.top,
        }
    }
}

fn scan_path(common: &CommonArgs, clock: &Clock, path: &str) -> Result<Vec<RepoInfo>> {
    let options = common.scan_options(clock)?;
    let root = expand_home(path);
    debug!(root = %root.display(), "scanning");
    scan::scan_root(&root, &options).with_context(|| format!("Failed to scan {}", root.display()))
}

fn exec_scan(common: &CommonArgs, clock: &Clock, path: &str, json: bool) -> Result<()> {
    let repos = scan_path(common, clock, path)?;

    if repos.is_empty() {
        if json {
            return report::output_no_repos_json();
        }
        println!("{}", report::NO_REPOS);
        return Ok(());
    }

    let output = report::analytics_output(path, common.labels(), &repos, clock, &common.analytics_options());
    if json {
        report::output_json(&output)
    } else {
        report::output_summary(&output)
    }
}

fn exec_compare(common: &CommonArgs, clock: &Clock, paths: [&str; 2], json: bool) -> Result<()> {
    let options = common.analytics_options();
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let repos = scan_path(common, clock, path)?;
        entries.push(report::compare_entry(path, &repos, clock, &options));
    }

    if json {
        report::output_compare_json(entries, common.labels(), clock)
    } else {
        report::output_compare_summary(&entries)
    }
}

fn exec_repos(common: &CommonArgs, path: &str, json: bool) -> Result<()> {
    let root = expand_home(path);
    let repos = scan::find_repos(&root, common.max_depth)
        .with_context(|| format!("Failed to search {}", root.display()))?;
    report::output_repo_list(&repos, json)
}
