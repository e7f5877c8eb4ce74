use serde::{Deserialize, Serialize};

use super::schedule::Phase;

/// Which command a tray menu should currently offer in its Start/Pause slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuAction {
    Start,
    Pause,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Start => "Start",
            MenuAction::Pause => "Pause",
        }
    }
}

/// Read-only projection of engine state for presentation collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub current_cycle: u32,
    pub total_cycles: u32,
    /// Remaining time rounded to whole seconds.
    pub remaining_secs: u64,
    /// Elapsed share of the current phase, 0.0 .. 1.0.
    pub progress: f64,
    pub is_rest_phase: bool,
    pub running: bool,
}

impl Snapshot {
    pub fn primary_action(&self) -> MenuAction {
        if self.running {
            MenuAction::Pause
        } else {
            MenuAction::Start
        }
    }

    /// Remaining time as `MM:SS`. Minutes are not wrapped at 60.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    /// Paused means a run is in progress but ticks are not being consumed.
    pub fn is_paused(&self) -> bool {
        !self.running && self.phase != Phase::Stopped
    }
}

/// Tooltip line, e.g. `Work Cycle 2/4 - 12:30`.
impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Cycle {}/{} - {}",
            self.phase,
            self.current_cycle,
            self.total_cycles,
            self.clock()
        )
    }
}
