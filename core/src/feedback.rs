use serde::{Deserialize, Serialize};

use crate::*;

/// What a single session operation did, for the presentation layer to react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    NoChange,
    Revealed { opened: CellCount },
    Detonated { at: Coord2 },
    /// The reveal that cleared the last safe cell.
    Won { opened: CellCount },
    TimedOut,
    Flagged,
    Unflagged,
}

impl SessionEvent {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn sound_cue(self) -> Option<SoundCue> {
        use SessionEvent::*;
        match self {
            NoChange | TimedOut => None,
            Revealed { .. } | Flagged | Unflagged => Some(SoundCue::Click),
            Detonated { .. } => Some(SoundCue::Explosion),
            Won { .. } => Some(SoundCue::Win),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Click,
    Explosion,
    Win,
}

/// Audio collaborator, called by the front-end with the cue of each event.
pub trait SoundPlayer {
    fn play(&mut self, cue: SoundCue);

    fn play_for(&mut self, event: SessionEvent) {
        if let Some(cue) = event.sound_cue() {
            self.play(cue);
        }
    }
}

/// Player used when no audio device is available.
#[derive(Copy, Clone, Debug, Default)]
pub struct Muted;

impl SoundPlayer for Muted {
    fn play(&mut self, _cue: SoundCue) {}
}

impl<F: FnMut(SoundCue)> SoundPlayer for F {
    fn play(&mut self, cue: SoundCue) {
        self(cue)
    }
}
