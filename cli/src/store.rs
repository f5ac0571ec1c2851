use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sapper_core::{Leaderboard, LeaderboardEntry};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not determine a data directory for this platform")]
    NoDataDir,
    #[error("Failed to write leaderboard to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to encode leaderboard")]
    Encode(#[from] serde_json::Error),
}

/// JSON file holding the ranked leaderboard, replaced as a whole on every save.
#[derive(Clone, Debug)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `leaderboard.json` inside the platform data directory.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let project_dirs =
            ProjectDirs::from("dev", "sugoijan", "sapper").ok_or(StoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join("leaderboard.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing file is created empty, a corrupt one is reset.
    pub fn load(&self) -> Leaderboard {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No leaderboard at {}, starting fresh", self.path.display());
                return self.reset();
            }
            Err(err) => {
                log::warn!(
                    "Could not read leaderboard at {}: {}",
                    self.path.display(),
                    err
                );
                return self.reset();
            }
        };

        match serde_json::from_str::<Leaderboard>(&text) {
            Ok(leaderboard) => {
                log::debug!("Loaded {} leaderboard entries", leaderboard.len());
                leaderboard
            }
            Err(err) => {
                log::warn!(
                    "Corrupt leaderboard at {}, resetting: {}",
                    self.path.display(),
                    err
                );
                self.reset()
            }
        }
    }

    pub fn save(&self, leaderboard: &Leaderboard) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut data = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut data, formatter);
        leaderboard.serialize(&mut serializer)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        // write next to the target and swap, so readers never see half a file
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, &data).map_err(write_err)?;
        fs::rename(&staging, &self.path).map_err(write_err)?;
        log::debug!(
            "Saved {} leaderboard entries to {}",
            leaderboard.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Loads, merges `entry` and saves; returns the new board and the entry's rank.
    pub fn add(&self, entry: LeaderboardEntry) -> Result<(Leaderboard, Option<usize>), StoreError> {
        let mut leaderboard = self.load();
        let rank = leaderboard.insert(entry);
        self.save(&leaderboard)?;
        Ok((leaderboard, rank))
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.save(&Leaderboard::new())
    }

    fn reset(&self) -> Leaderboard {
        let empty = Leaderboard::new();
        if let Err(err) = self.save(&empty) {
            log::warn!("{}", err);
        }
        empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32, duration: u32) -> LeaderboardEntry {
        LeaderboardEntry::new(name, score, "Easy", duration)
    }

    #[test]
    fn missing_file_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path().join("nested").join("scores.json"));

        let leaderboard = store.load();

        assert!(leaderboard.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "[]");
    }

    #[test]
    fn corrupt_file_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ not json").unwrap();
        let store = LeaderboardStore::new(&path);

        assert!(store.load().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn non_list_content_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, r#"{"name": "solo", "score": 3}"#).unwrap();

        assert!(LeaderboardStore::new(&path).load().is_empty());
    }

    #[test]
    fn ranking_survives_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path().join("scores.json"));

        for (score, duration) in [(50, 10), (80, 20), (80, 5), (30, 40)] {
            store.add(entry("p", score, duration)).unwrap();
        }
        let reloaded = store.load();

        let ranking: Vec<_> = reloaded
            .entries()
            .iter()
            .map(|e| (e.score, e.duration))
            .collect();
        assert_eq!(ranking, [(80, 5), (80, 20), (50, 10), (30, 40)]);
    }

    #[test]
    fn add_keeps_top_ten() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path().join("scores.json"));

        let mut last_rank = None;
        for score in 1..=12 {
            last_rank = store.add(entry("p", score, 60)).unwrap().1;
        }

        assert_eq!(last_rank, Some(0));
        let reloaded = store.load();
        assert_eq!(reloaded.len(), 10);
        assert_eq!(reloaded.entries()[9].score, 3);
    }

    #[test]
    fn hand_edited_file_is_reranked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(
            &path,
            r#"[
                {"name": "slow", "score": 10, "level": "Easy", "duration": 90},
                {"name": "fast", "score": 10, "level": "Easy", "duration": 30},
                {"score": 40}
            ]"#,
        )
        .unwrap();

        let leaderboard = LeaderboardStore::new(&path).load();

        let names: Vec<_> = leaderboard.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Unknown", "fast", "slow"]);
    }

    #[test]
    fn record_without_score_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(
            &path,
            r#"[
                {"name": "a", "score": 10, "level": "Easy", "duration": 5},
                {"name": "b", "level": "Easy", "duration": 7}
            ]"#,
        )
        .unwrap();
        let store = LeaderboardStore::new(&path);

        let leaderboard = store.load();

        let ranking: Vec<_> = leaderboard
            .entries()
            .iter()
            .map(|e| (e.name.as_str(), e.score))
            .collect();
        assert_eq!(ranking, [("a", 10), ("b", 0)]);
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn saved_file_uses_documented_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path().join("scores.json"));
        store.add(LeaderboardEntry::new("ana", 42, "Time Challenge", 75)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();

        assert_eq!(
            raw,
            serde_json::json!([
                {"name": "ana", "score": 42, "level": "Time Challenge", "duration": 75}
            ])
        );
    }

    #[test]
    fn clear_empties_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeaderboardStore::new(dir.path().join("scores.json"));
        store.add(entry("p", 1, 1)).unwrap();

        store.clear().unwrap();

        assert!(store.load().is_empty());
    }
}
