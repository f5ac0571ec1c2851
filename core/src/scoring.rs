use core::fmt;

use serde::{Deserialize, Serialize};

use crate::*;

/// How reveal points are credited.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealCredit {
    /// Every safe cell opened, flooded ones included.
    #[default]
    PerCell,
    /// Once per reveal that opened anything.
    PerAction,
}

/// Point values for player actions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub reveal_points: u32,
    pub reveal_credit: RevealCredit,
    pub correct_flag_points: u32,
    pub wrong_flag_penalty: u32,
}

impl ScoringPolicy {
    /// Points for a reveal that opened `opened` safe cells.
    pub fn reveal_delta(&self, opened: CellCount) -> i64 {
        let units = match self.reveal_credit {
            RevealCredit::PerCell => opened,
            RevealCredit::PerAction => opened.min(1),
        };
        i64::from(self.reveal_points) * i64::from(units)
    }

    /// Points for placing a flag; removing a flag is always worth nothing.
    pub fn flag_delta(&self, on_mine: bool) -> i64 {
        if on_mine {
            i64::from(self.correct_flag_points)
        } else {
            -i64::from(self.wrong_flag_penalty)
        }
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            reveal_points: 1,
            reveal_credit: RevealCredit::PerCell,
            correct_flag_points: 5,
            wrong_flag_penalty: 2,
        }
    }
}

/// Non-negative score, clamped after every change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);

    pub const fn value(self) -> u32 {
        self.0
    }

    pub fn apply(&mut self, delta: i64) {
        let next = i64::from(self.0).saturating_add(delta);
        self.0 = next.clamp(0, i64::from(u32::MAX)) as u32;
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
