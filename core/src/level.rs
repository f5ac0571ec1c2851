use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

/// Named difficulty levels offered by the level selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPreset {
    Easy,
    Medium,
    Hard,
    TimeChallenge,
    Expert,
}

impl LevelPreset {
    pub const ALL: [LevelPreset; 5] = [
        Self::Easy,
        Self::Medium,
        Self::Hard,
        Self::TimeChallenge,
        Self::Expert,
    ];

    pub const fn config(self) -> GameConfig {
        use LevelPreset::*;
        match self {
            Easy => GameConfig::new_unchecked(9, 9, 10),
            Medium => GameConfig::new_unchecked(16, 16, 40),
            Hard => GameConfig::new_unchecked(24, 24, 99),
            TimeChallenge => GameConfig::new_unchecked(16, 16, 40).with_time_limit(120),
            Expert => GameConfig::new_unchecked(24, 24, 99).with_time_limit(60),
        }
    }

    /// Label stored in leaderboard entries.
    pub const fn label(self) -> &'static str {
        use LevelPreset::*;
        match self {
            Easy => "Easy",
            Medium => "Medium",
            Hard => "Hard",
            TimeChallenge => "Time Challenge",
            Expert => "Expert",
        }
    }
}

impl fmt::Display for LevelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LevelPreset {
    type Err = UnknownLevel;

    /// Accepts labels case-insensitively, ignoring spaces, dashes and underscores.
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let wanted = s.chars().filter(|c| !matches!(c, ' ' | '-' | '_'));
        Self::ALL
            .into_iter()
            .find(|level| {
                level
                    .label()
                    .chars()
                    .filter(|&c| c != ' ')
                    .map(|c| c.to_ascii_lowercase())
                    .eq(wanted.clone().map(|c| c.to_ascii_lowercase()))
            })
            .ok_or(UnknownLevel)
    }
}

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Unknown level name")]
pub struct UnknownLevel;
