use crate::error::{HuntdError, Result};
use crate::git::History;
use crate::model::{Commit, FileChange, Timestamp, SCHEMA_VERSION};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite store of extracted history, keyed by repository path and the
/// fingerprint of its ref tips.
pub struct Cache {
    conn: Connection,
}

impl Cache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref();
        std::fs::create_dir_all(cache_dir)?;
        let conn = Connection::open(cache_dir.join("cache.db"))?;
        let mut cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    pub fn in_memory() -> Result<Self> {
        let mut cache = Self {
            conn: Connection::open_in_memory()?,
        };
        cache.initialize()?;
        Ok(cache)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS repos (
                path TEXT PRIMARY KEY,
                fingerprint TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS commits (
                repo TEXT NOT NULL,
                hash TEXT NOT NULL,
                author TEXT NOT NULL,
                email TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                subject TEXT NOT NULL,
                insertions INTEGER NOT NULL,
                deletions INTEGER NOT NULL,
                files_changed INTEGER NOT NULL,
                seq INTEGER NOT NULL,
                PRIMARY KEY (repo, hash),
                FOREIGN KEY (repo) REFERENCES repos(path)
            );
            CREATE TABLE IF NOT EXISTS file_changes (
                repo TEXT NOT NULL,
                hash TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                path TEXT NOT NULL,
                ext TEXT NOT NULL,
                added INTEGER NOT NULL,
                removed INTEGER NOT NULL,
                seq INTEGER NOT NULL,
                FOREIGN KEY (repo) REFERENCES repos(path)
            );
            CREATE INDEX IF NOT EXISTS idx_file_changes_repo ON file_changes(repo);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(HuntdError::Cache(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    /// Cached history for `repo_path`, if it was stored under `fingerprint`.
    pub fn load(&self, repo_path: &str, fingerprint: &str) -> Result<Option<History>> {
        let stored: Option<String> = match self.conn.query_row(
            "SELECT fingerprint FROM repos WHERE path = ?",
            params![repo_path],
            |row| row.get(0),
        ) {
            Ok(fp) => Some(fp),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };
        if stored.as_deref() != Some(fingerprint) {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT hash, author, email, timestamp, subject, insertions, deletions, files_changed
             FROM commits WHERE repo = ? ORDER BY seq",
        )?;
        let commits = stmt
            .query_map(params![repo_path], |row| {
                Ok(Commit {
                    hash: row.get(0)?,
                    author: row.get(1)?,
                    email: row.get(2)?,
                    timestamp: parse_timestamp(row.get::<_, String>(3)?, 3)?,
                    subject: row.get(4)?,
                    insertions: row.get::<_, i64>(5)? as u64,
                    deletions: row.get::<_, i64>(6)? as u64,
                    files_changed: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT hash, timestamp, path, ext, added, removed
             FROM file_changes WHERE repo = ? ORDER BY seq",
        )?;
        let file_changes = stmt
            .query_map(params![repo_path], |row| {
                Ok(FileChange {
                    hash: row.get(0)?,
                    timestamp: parse_timestamp(row.get::<_, String>(1)?, 1)?,
                    path: row.get(2)?,
                    ext: row.get(3)?,
                    added: row.get::<_, i64>(4)? as u64,
                    removed: row.get::<_, i64>(5)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(History { commits, file_changes }))
    }

    /// Replaces whatever was cached for `repo_path`.
    pub fn store(&mut self, repo_path: &str, fingerprint: &str, history: &History) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM file_changes WHERE repo = ?", params![repo_path])?;
        tx.execute("DELETE FROM commits WHERE repo = ?", params![repo_path])?;
        tx.execute(
            "INSERT OR REPLACE INTO repos (path, fingerprint) VALUES (?, ?)",
            params![repo_path, fingerprint],
        )?;

        {
            let mut insert_commit_stmt = tx.prepare(
                "INSERT OR REPLACE INTO commits
                 (repo, hash, author, email, timestamp, subject, insertions, deletions, files_changed, seq)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (seq, c) in history.commits.iter().enumerate() {
                insert_commit_stmt.execute(params![
                    repo_path,
                    c.hash,
                    c.author,
                    c.email,
                    serde_json::to_string(&c.timestamp)?,
                    c.subject,
                    c.insertions as i64,
                    c.deletions as i64,
                    c.files_changed,
                    seq as i64
                ])?;
            }

            let mut insert_file_stmt = tx.prepare(
                "INSERT INTO file_changes (repo, hash, timestamp, path, ext, added, removed, seq)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (seq, f) in history.file_changes.iter().enumerate() {
                insert_file_stmt.execute(params![
                    repo_path,
                    f.hash,
                    serde_json::to_string(&f.timestamp)?,
                    f.path,
                    f.ext,
                    f.added as i64,
                    f.removed as i64,
                    seq as i64
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn parse_timestamp(raw: String, column: usize) -> rusqlite::Result<Timestamp> {
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}
