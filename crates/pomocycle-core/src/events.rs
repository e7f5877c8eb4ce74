use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Snapshot, Tick};

/// A phase change caused by the countdown reaching zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// WORK finished; `cycle` is the cycle whose rest begins.
    RestStarting { cycle: u32 },
    /// REST finished and another cycle follows; `cycle` is the new one.
    WorkStarting { cycle: u32 },
    /// The last REST finished and the engine stopped.
    RunComplete { cycles: u32 },
}

impl Transition {
    /// Notification title shown by a tray collaborator.
    pub fn title(&self) -> &'static str {
        match self {
            Transition::RestStarting { .. } => "Break Time",
            Transition::WorkStarting { .. } => "Work Time",
            Transition::RunComplete { .. } => "Pomodoro Finished",
        }
    }

    /// Notification body shown by a tray collaborator.
    pub fn message(&self) -> &'static str {
        match self {
            Transition::RestStarting { .. } => "Time to rest!",
            Transition::WorkStarting { .. } => "Back to work!",
            Transition::RunComplete { .. } => "All cycles complete! Good job!",
        }
    }

    /// Full-screen overlay text. Run completion has no overlay.
    pub fn overlay(&self) -> Option<&'static str> {
        match self {
            Transition::RestStarting { .. } => Some("Time to Rest!"),
            Transition::WorkStarting { .. } => Some("Time to Work!"),
            Transition::RunComplete { .. } => None,
        }
    }
}

/// Outbound envelope pushed by drivers to presentation collaborators.
///
/// `StateSnapshot` follows every engine call; `PhaseTransition` is only
/// produced when a tick changed phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StateSnapshot {
        snapshot: Snapshot,
        at: DateTime<Utc>,
    },
    PhaseTransition {
        transition: Transition,
        snapshot: Snapshot,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn snapshot(snapshot: Snapshot) -> Self {
        Event::StateSnapshot {
            snapshot,
            at: Utc::now(),
        }
    }

    /// Expand a tick into its events: the transition first, if any.
    pub fn from_tick(tick: &Tick) -> Vec<Self> {
        let at = Utc::now();
        let mut events = Vec::with_capacity(2);
        if let Some(transition) = tick.transition {
            events.push(Event::PhaseTransition {
                transition,
                snapshot: tick.snapshot,
                at,
            });
        }
        events.push(Event::StateSnapshot {
            snapshot: tick.snapshot,
            at,
        });
        events
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, Event::PhaseTransition { .. })
    }
}
