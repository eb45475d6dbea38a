// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const DB_ENV: &str = "LEDGERLY_DB";
pub const LOG_ENV: &str = "LEDGERLY_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const SNAPSHOT_FILE: &str = "ledgerly-snapshot.json";

/// Paths and levels resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub log_filter: String,
}

impl Settings {
    /// `--db` wins over `LEDGERLY_DB`, which wins over the platform data dir.
    pub fn resolve(
        db_flag: Option<&str>,
        snapshot_flag: Option<&str>,
        log_flag: Option<&str>,
    ) -> Result<Self> {
        let env_db = std::env::var(DB_ENV).ok();
        let env_log = std::env::var(LOG_ENV).ok();
        Self::resolve_with(db_flag, env_db.as_deref(), snapshot_flag, log_flag, env_log.as_deref())
    }

    pub fn resolve_with(
        db_flag: Option<&str>,
        db_env: Option<&str>,
        snapshot_flag: Option<&str>,
        log_flag: Option<&str>,
        log_env: Option<&str>,
    ) -> Result<Self> {
        let db_path = match db_flag.or(db_env).filter(|s| !s.trim().is_empty()) {
            Some(p) => PathBuf::from(p),
            None => default_db_path()?,
        };
        let snapshot_path = match snapshot_flag {
            Some(p) => PathBuf::from(p),
            None => snapshot_beside(&db_path),
        };
        let log_filter = log_flag
            .or(log_env)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string();
        Ok(Self {
            db_path,
            snapshot_path,
            log_filter,
        })
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "Ledgerly", "Ledgerly")
        .context("Could not determine data directory")?;
    let dir = proj.data_dir();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create {}", dir.display()))?;
    Ok(dir.join("ledgerly.sqlite"))
}

fn snapshot_beside(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(SNAPSHOT_FILE),
        _ => PathBuf::from(SNAPSHOT_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_environment() {
        let s = Settings::resolve_with(
            Some("/tmp/a.sqlite"),
            Some("/tmp/b.sqlite"),
            None,
            None,
            Some("debug"),
        )
        .unwrap();
        assert_eq!(s.db_path, PathBuf::from("/tmp/a.sqlite"));
        assert_eq!(s.snapshot_path, PathBuf::from("/tmp").join(SNAPSHOT_FILE));
        assert_eq!(s.log_filter, "debug");
    }

    #[test]
    fn log_level_defaults_to_warn() {
        let s = Settings::resolve_with(Some("ledger.sqlite"), None, Some("snap.json"), None, None)
            .unwrap();
        assert_eq!(s.log_filter, DEFAULT_LOG_LEVEL);
        assert_eq!(s.snapshot_path, PathBuf::from("snap.json"));
    }
}
