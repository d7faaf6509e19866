use crate::error::{HuntdError, Result};
use crate::language::extension_of;
use crate::model::{Commit, FileChange, RepoInfo, Timestamp};
use chrono::{DateTime, FixedOffset};
use gix::object::tree::diff::ChangeDetached;
use gix::{ObjectId, Repository};
use similar::{ChangeTag, TextDiff};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

/// Commit records and per-file line deltas for one repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    pub commits: Vec<Commit>,
    pub file_changes: Vec<FileChange>,
}

struct Delta {
    path: String,
    /// `None` for binary blobs.
    lines: Option<(u64, u64)>,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = gix::open(path.as_ref())?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Full scan: metadata plus complete history.
    pub fn scan(&self) -> Result<RepoInfo> {
        let tips = self.tips()?;
        let ids = self.reachable(&tips);
        let history = self.history(&ids)?;
        let mut info = self.metadata(ids.len() as u64)?;
        info.commits = history.commits;
        info.file_changes = history.file_changes;
        Ok(info)
    }

    /// Every ref target plus HEAD, sorted and deduplicated.
    pub fn tips(&self) -> Result<Vec<ObjectId>> {
        let platform = self.repo.references().map_err(HuntdError::git)?;
        let mut tips: Vec<ObjectId> = platform
            .all()
            .map_err(HuntdError::git)?
            .flatten()
            .filter_map(|mut reference| reference.peel_to_id_in_place().ok().map(|id| id.detach()))
            .collect();
        if let Ok(head) = self.repo.head_id() {
            tips.push(head.detach());
        }
        tips.sort();
        tips.dedup();
        Ok(tips)
    }

    /// Commit ids reachable from `tips`. Non-commit tips (tagged trees or
    /// blobs) and missing parents of shallow clones are skipped.
    pub fn reachable(&self, tips: &[ObjectId]) -> Vec<ObjectId> {
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut ids = Vec::new();
        let mut stack: VecDeque<ObjectId> = tips.iter().copied().collect();

        while let Some(id) = stack.pop_back() {
            if !seen.insert(id) {
                continue;
            }
            let Ok(commit) = self.repo.find_commit(id) else {
                continue;
            };
            ids.push(id);
            for parent in commit.parent_ids() {
                stack.push_back(parent.detach());
            }
        }

        ids
    }

    /// Whole-history metadata. `total_commits` comes from the caller's walk.
    pub fn metadata(&self, total_commits: u64) -> Result<RepoInfo> {
        let mut info = RepoInfo::new(self.path.to_string_lossy(), self.name());
        info.total_commits = total_commits;
        info.branch_count = self.branch_count()?;
        info.has_readme = self.has_readme();
        info.is_dirty = self.is_dirty();
        info.last_commit = match self.repo.head_commit() {
            Ok(head) => Some(to_timestamp(head.author()?.time().map_err(HuntdError::git)?)?),
            Err(_) => None,
        };
        Ok(info)
    }

    fn branch_count(&self) -> Result<u32> {
        let platform = self.repo.references().map_err(HuntdError::git)?;
        let local = platform.local_branches().map_err(HuntdError::git)?.flatten().count();
        let remote = platform.remote_branches().map_err(HuntdError::git)?.flatten().count();
        Ok((local + remote) as u32)
    }

    fn has_readme(&self) -> bool {
        let Ok(tree) = self.repo.head_commit().map_err(HuntdError::git).and_then(|c| Ok(c.tree()?)) else {
            return false;
        };
        tree.decode()
            .map(|decoded| {
                decoded
                    .entries
                    .iter()
                    .any(|entry| entry.filename.to_string().to_lowercase().contains("readme"))
            })
            .unwrap_or(false)
    }

    /// Staged, modified or untracked paths, like a non-empty `git status --porcelain`.
    fn is_dirty(&self) -> bool {
        let status = self
            .repo
            .status(gix::progress::Discard)
            .map_err(HuntdError::git)
            .and_then(|platform| platform.into_iter(Vec::new()).map_err(HuntdError::git));
        match status {
            Ok(mut items) => items.any(|item| item.is_ok()),
            Err(e) => {
                debug!(repo = %self.path.display(), error = %e, "status check failed, assuming clean");
                false
            }
        }
    }

    /// Commit records for `ids`, newest first, with numstat-style deltas
    /// against the first parent. Merge commits carry no diff.
    pub fn history(&self, ids: &[ObjectId]) -> Result<History> {
        let mut records = Vec::with_capacity(ids.len());
        for &id in ids {
            records.push(self.commit_record(id)?);
        }
        records.sort_by(|a, b| b.0.timestamp.to_utc().cmp(&a.0.timestamp.to_utc()));

        let mut history = History::default();
        for (commit, mut changes) in records {
            history.commits.push(commit);
            history.file_changes.append(&mut changes);
        }
        Ok(history)
    }

    fn commit_record(&self, id: ObjectId) -> Result<(Commit, Vec<FileChange>)> {
        let commit = self.repo.find_commit(id)?;
        let author = commit.author()?;
        let timestamp = to_timestamp(author.time().map_err(HuntdError::git)?)?;
        let message = commit.message()?;
        let parents: Vec<ObjectId> = commit.parent_ids().map(|p| p.detach()).collect();

        let deltas = match parents.as_slice() {
            [] => self.tree_deltas(None, id)?,
            [parent] => self.tree_deltas(Some(*parent), id)?,
            _ => Vec::new(),
        };

        let hash = id.to_string();
        let mut insertions = 0u64;
        let mut deletions = 0u64;
        let mut file_changes = Vec::new();
        for delta in &deltas {
            if let Some((added, removed)) = delta.lines {
                insertions += added;
                deletions += removed;
                file_changes.push(FileChange {
                    hash: hash.clone(),
                    timestamp,
                    path: delta.path.clone(),
                    ext: extension_of(&delta.path),
                    added,
                    removed,
                });
            }
        }

        let record = Commit {
            hash,
            author: author.name.to_string(),
            email: author.email.to_string(),
            timestamp,
            subject: message.title.to_string(),
            insertions,
            deletions,
            files_changed: deltas.len() as u32,
        };
        Ok((record, file_changes))
    }

    fn tree_deltas(&self, parent: Option<ObjectId>, id: ObjectId) -> Result<Vec<Delta>> {
        let commit_tree = self.repo.find_commit(id)?.tree()?;
        let parent_tree = match parent {
            Some(parent_id) => Some(self.repo.find_commit(parent_id)?.tree()?),
            None => None,
        };

        let changes: Vec<ChangeDetached> =
            self.repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)?;

        let mut deltas = Vec::new();
        for change in changes {
            if let Some(delta) = self.delta_for(change) {
                deltas.push(delta);
            }
        }
        Ok(deltas)
    }

    fn delta_for(&self, change: ChangeDetached) -> Option<Delta> {
        let (location, old_id, new_id, entry_mode) = match change {
            ChangeDetached::Addition { location, id, entry_mode, .. } => (location, None, Some(id), entry_mode),
            ChangeDetached::Deletion { location, id, entry_mode, .. } => (location, Some(id), None, entry_mode),
            ChangeDetached::Modification {
                location,
                previous_id,
                id,
                entry_mode,
                ..
            } => (location, Some(previous_id), Some(id), entry_mode),
            ChangeDetached::Rewrite {
                location,
                source_id,
                id,
                entry_mode,
                ..
            } => (location, Some(source_id), Some(id), entry_mode),
        };
        if entry_mode.is_tree() || entry_mode.is_commit() {
            return None;
        }

        let old = match old_id {
            Some(oid) => Some(self.repo.find_object(oid).ok()?.data.clone()),
            None => None,
        };
        let new = match new_id {
            Some(oid) => Some(self.repo.find_object(oid).ok()?.data.clone()),
            None => None,
        };

        let binary = [&old, &new].into_iter().flatten().any(|data| is_binary(data));
        let lines = if binary {
            None
        } else {
            Some(line_delta(old.as_deref().unwrap_or_default(), new.as_deref().unwrap_or_default()))
        };

        Some(Delta {
            path: location.to_string(),
            lines,
        })
    }
}

/// Tip ids joined into a cache key; changes whenever any ref moves.
pub fn fingerprint(tips: &[ObjectId]) -> String {
    tips.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

fn to_timestamp(time: gix::date::Time) -> Result<Timestamp> {
    let offset = FixedOffset::east_opt(time.offset)
        .ok_or_else(|| HuntdError::InvalidDate(format!("Invalid offset: {}", time.offset)))?;
    let utc = DateTime::from_timestamp(time.seconds, 0)
        .ok_or_else(|| HuntdError::InvalidDate(format!("Invalid timestamp: {}", time.seconds)))?;
    Ok(Timestamp::Zoned(utc.with_timezone(&offset)))
}

/// Same sniff as git: a NUL byte within the first 8000 bytes.
fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8000).any(|&b| b == 0)
}

/// Added and removed line counts between two blob versions.
fn line_delta(old: &[u8], new: &[u8]) -> (u64, u64) {
    let old = String::from_utf8_lossy(old);
    let new = String::from_utf8_lossy(new);
    TextDiff::from_lines(&*old, &*new)
        .iter_all_changes()
        .fold((0, 0), |(added, removed), change| match change.tag() {
            ChangeTag::Insert => (added + 1, removed),
            ChangeTag::Delete => (added, removed + 1),
            ChangeTag::Equal => (added, removed),
        })
}
