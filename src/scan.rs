use crate::cache::Cache;
use crate::error::{HuntdError, Result};
use crate::git::{fingerprint, GitRepo};
use crate::model::{RepoInfo, ScanFilter};
use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const DEFAULT_JOBS: usize = 8;

/// Directory names never worth descending into.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".venv",
    "venv",
    "__pycache__",
    "target",
    "build",
    "dist",
    ".gradle",
    ".dart_tool",
    "vendor",
    ".next",
    ".nuxt",
    "bin",
    "obj",
    ".tox",
    ".mypy_cache",
    ".ruff_cache",
    ".pytest_cache",
    "site-packages",
    ".cargo",
    ".rustup",
    "Pods",
];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub max_depth: usize,
    pub jobs: usize,
    pub filter: ScanFilter,
    pub cache_dir: Option<PathBuf>,
    pub progress: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            jobs: DEFAULT_JOBS,
            filter: ScanFilter::default(),
            cache_dir: None,
            progress: false,
        }
    }
}

pub fn expand_home(root: &str) -> PathBuf {
    match root.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(rest.trim_start_matches('/')))
            .unwrap_or_else(|| PathBuf::from(root)),
        _ => PathBuf::from(root),
    }
}

/// Finds git repositories under `root`, sorted by path.
///
/// Hidden and skip-listed directories are pruned, and the walk never
/// descends into a repository it has found, so submodules are not listed.
pub fn find_repos(root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
    let root = std::fs::canonicalize(root)?;

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .max_depth(Some(max_depth))
        .filter_entry(|entry| {
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return false;
            }
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if SKIP_DIRS.contains(&&*name) {
                return false;
            }
            entry
                .path()
                .parent()
                .map_or(true, |parent| !parent.join(".git").is_dir())
        });

    let mut repos = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory");
                continue;
            }
        };
        if entry.path().join(".git").is_dir() {
            repos.push(entry.into_path());
        }
    }

    repos.sort();
    Ok(repos)
}

/// Scans every repository on a bounded pool and applies the filter.
///
/// A repository that fails to scan is logged and left out; output keeps the
/// order of `paths`.
pub fn scan_all(paths: &[PathBuf], options: &ScanOptions) -> Result<Vec<RepoInfo>> {
    let cache = options
        .cache_dir
        .as_ref()
        .map(Cache::new)
        .transpose()?
        .map(Mutex::new);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.max(1))
        .build()
        .map_err(|e| HuntdError::Other(format!("Failed to build scan pool: {e}")))?;

    let pb = if options.progress && console::Term::stderr().is_term() {
        ProgressBar::new(paths.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  [{pos}/{len}] {bar:30.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    info!(repos = paths.len(), jobs = options.jobs, "scanning repositories");

    let repos: Vec<RepoInfo> = pool.install(|| {
        paths
            .par_iter()
            .filter_map(|path| {
                let result = scan_one(path, cache.as_ref());
                pb.inc(1);
                pb.set_message(
                    path.file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                );
                match result {
                    Ok(repo) => Some(options.filter.apply(repo)),
                    Err(e) => {
                        warn!(repo = %path.display(), error = %e, "scan failed, repository omitted");
                        None
                    }
                }
            })
            .collect()
    });

    pb.finish_and_clear();
    info!(scanned = repos.len(), "scan complete");
    Ok(repos)
}

/// Discovers and scans everything under `root`. A missing root yields no
/// repositories rather than an error.
pub fn scan_root(root: &Path, options: &ScanOptions) -> Result<Vec<RepoInfo>> {
    if !root.is_dir() {
        warn!(root = %root.display(), "not a directory");
        return Ok(Vec::new());
    }
    let paths = find_repos(root, options.max_depth)?;
    if paths.is_empty() {
        return Ok(Vec::new());
    }
    scan_all(&paths, options)
}

fn scan_one(path: &Path, cache: Option<&Mutex<Cache>>) -> Result<RepoInfo> {
    let repo = GitRepo::open(path)?;
    let Some(cache) = cache else {
        debug!(repo = %path.display(), "scanning without cache");
        return repo.scan();
    };

    let tips = repo.tips()?;
    let key = repo.path().to_string_lossy().to_string();
    let fp = fingerprint(&tips);
    let ids = repo.reachable(&tips);

    let cached = lock(cache)?.load(&key, &fp)?;
    let history = match cached {
        Some(history) => {
            debug!(repo = %key, "cache hit");
            history
        }
        None => {
            debug!(repo = %key, commits = ids.len(), "cache miss, extracting history");
            let history = repo.history(&ids)?;
            lock(cache)?.store(&key, &fp, &history)?;
            history
        }
    };

    let mut info = repo.metadata(ids.len() as u64)?;
    info.commits = history.commits;
    info.file_changes = history.file_changes;
    Ok(info)
}

fn lock(cache: &Mutex<Cache>) -> Result<std::sync::MutexGuard<'_, Cache>> {
    cache
        .lock()
        .map_err(|_| HuntdError::Cache("cache lock poisoned".to_string()))
}
