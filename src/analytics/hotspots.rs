use crate::model::{FileHotspot, RepoInfo};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_TOP_N: usize = 15;

struct HotspotAccum<'a> {
    churn: u64,
    commits: HashSet<&'a str>,
}

/// Files with the most line churn across every repository, keyed as
/// `repo_name/path`. Touches count distinct commits, not numstat rows.
pub fn compute_file_hotspots(repos: &[RepoInfo], top_n: usize) -> Vec<FileHotspot> {
    let mut map: HashMap<String, HotspotAccum<'_>> = HashMap::new();

    for repo in repos {
        for fc in &repo.file_changes {
            let entry = map
                .entry(format!("{}/{}", repo.name, fc.path))
                .or_insert_with(|| HotspotAccum {
                    churn: 0,
                    commits: HashSet::new(),
                });
            entry.churn += fc.churn();
            entry.commits.insert(fc.hash.as_str());
        }
    }

    let mut hotspots: Vec<FileHotspot> = map
        .into_iter()
        .map(|(path, HotspotAccum { churn, commits })| FileHotspot {
            path,
            churn,
            touches: commits.len() as u32,
        })
        .collect();

    hotspots.sort_by(|a, b| b.churn.cmp(&a.churn).then_with(|| a.path.cmp(&b.path)));
    hotspots.truncate(top_n);
    hotspots
}
