use alloc::string::{String, ToString};
use alloc::vec::Vec;
use alloc::format;
use core::cmp::Reverse;

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept on the board.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// One finished session as recorded on the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default = "unknown_player")]
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub level: String,
    /// Play time in seconds.
    #[serde(default)]
    pub duration: u32,
}

fn unknown_player() -> String {
    "Unknown".to_string()
}

impl LeaderboardEntry {
    pub fn new(
        name: impl Into<String>,
        score: u32,
        level: impl Into<String>,
        duration: u32,
    ) -> Self {
        Self {
            name: name.into(),
            score,
            level: level.into(),
            duration,
        }
    }

    /// Higher score first, then the faster run.
    fn rank_key(&self) -> (Reverse<u32>, u32) {
        (Reverse(self.score), self.duration)
    }
}

/// Ranked top entries, always sorted and never longer than [`LEADERBOARD_CAPACITY`].
///
/// Deserialization goes through [`Leaderboard::from_entries`], so whatever a
/// storage backend hands back is re-ranked before use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LeaderboardEntry>", into = "Vec<LeaderboardEntry>")]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        rank(&mut entries);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// New leaderboard with `entry` merged in; `self` is left untouched.
    pub fn record(&self, entry: LeaderboardEntry) -> Self {
        Self {
            entries: record(&self.entries, entry),
        }
    }

    /// Merges `entry` in place and returns its 0-based rank, `None` if it did not make the cut.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        // ties keep the older entry ahead, so the new one lands after its equals
        let position = self
            .entries
            .partition_point(|existing| existing.rank_key() <= entry.rank_key());
        if position >= LEADERBOARD_CAPACITY {
            return None;
        }
        self.entries.insert(position, entry);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        Some(position)
    }

    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }
}

impl From<Vec<LeaderboardEntry>> for Leaderboard {
    fn from(entries: Vec<LeaderboardEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Leaderboard> for Vec<LeaderboardEntry> {
    fn from(leaderboard: Leaderboard) -> Self {
        leaderboard.entries
    }
}

/// Appends `new_entry`, ranks by score descending then duration ascending, keeps the top 10.
pub fn record(entries: &[LeaderboardEntry], new_entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
    let mut merged = Vec::with_capacity(entries.len() + 1);
    merged.extend_from_slice(entries);
    merged.push(new_entry);
    rank(&mut merged);
    merged
}

fn rank(entries: &mut Vec<LeaderboardEntry>) {
    // stable, equal keys stay in insertion order
    entries.sort_by_key(LeaderboardEntry::rank_key);
    entries.truncate(LEADERBOARD_CAPACITY);
}

/// Formats seconds as `MM:SS`, minutes keep growing past an hour.
pub fn format_duration(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32, duration: u32) -> LeaderboardEntry {
        LeaderboardEntry::new(name, score, "Easy", duration)
    }

    fn ranking(entries: &[LeaderboardEntry]) -> Vec<(u32, u32)> {
        entries.iter().map(|e| (e.score, e.duration)).collect()
    }

    #[test]
    fn ranks_by_score_then_duration() {
        let mut entries = Vec::new();
        for (score, duration) in [(50, 10), (80, 20), (80, 5), (30, 40)] {
            entries = record(&entries, entry("p", score, duration));
        }

        assert_eq!(ranking(&entries), [(80, 5), (80, 20), (50, 10), (30, 40)]);
    }

    #[test]
    fn keeps_only_top_ten() {
        let mut board = Leaderboard::new();
        for score in 1..=12 {
            board = board.record(entry("p", score * 10, 100 - score));
        }

        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
        assert_eq!(board.entries()[0].score, 120);
        assert_eq!(board.entries()[9].score, 30);
    }

    #[test]
    fn record_does_not_touch_the_input() {
        let original = Leaderboard::from_entries(Vec::from([entry("a", 10, 10)]));

        let updated = original.record(entry("b", 20, 10));

        assert_eq!(original.len(), 1);
        assert_eq!(updated.entries()[0].name, "b");
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut entries = Vec::new();
        for name in ["first", "second", "third"] {
            entries = record(&entries, entry(name, 40, 30));
        }

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn insert_agrees_with_record() {
        let scores = [(5, 9), (70, 3), (70, 1), (20, 20), (70, 3), (1, 1), (99, 50)];
        let mut in_place = Leaderboard::new();
        let mut pure = Vec::new();

        for (score, duration) in scores.into_iter().cycle().take(25) {
            in_place.insert(entry("p", score, duration));
            pure = record(&pure, entry("p", score, duration));
        }

        assert_eq!(in_place.entries(), pure.as_slice());
    }

    #[test]
    fn insert_reports_rank() {
        let mut board = Leaderboard::new();
        for score in 1..=10 {
            board.insert(entry("p", score * 10, 10));
        }

        assert_eq!(board.insert(entry("low", 5, 10)), None);
        assert_eq!(board.insert(entry("tie", 100, 10)), Some(1));
        assert_eq!(board.insert(entry("top", 500, 99)), Some(0));
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
    }

    #[test]
    fn from_entries_normalizes_unsorted_input() {
        let entries = (0..15).map(|i| entry("p", i, 0)).collect();

        let board = Leaderboard::from_entries(entries);

        assert_eq!(board.len(), 10);
        assert_eq!(board.entries()[0].score, 14);
        assert_eq!(board.entries()[9].score, 5);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(75), "01:15");
        assert_eq!(format_duration(3_725), "62:05");
    }
}
