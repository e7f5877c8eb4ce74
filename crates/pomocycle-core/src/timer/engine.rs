//! Interval engine implementation.
//!
//! The engine is a delta-driven state machine. It owns no timer and no
//! threads - the caller measures elapsed time and feeds it to `advance()`.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Work -> Rest -> Work -> ... -> Rest -> Stopped
//! ```
//!
//! A run holds `total_cycles` Work+Rest pairs. Pausing keeps the phase and
//! remaining time; reset and reconfigure return to `Stopped`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = IntervalEngine::new(Configuration::default())?;
//! engine.start();
//! // In a loop:
//! let tick = engine.advance(clock.elapsed_secs()); // tick.transition is Some on a phase change
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use super::schedule::{Configuration, Phase};
use super::snapshot::Snapshot;
use crate::error::ValidationError;
use crate::events::Transition;

/// Result of a single `advance()` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub snapshot: Snapshot,
    /// Set only when this call crossed zero and changed phase.
    pub transition: Option<Transition>,
}

/// Work/rest cycle controller.
#[derive(Debug, Clone, Serialize)]
pub struct IntervalEngine {
    config: Configuration,
    phase: Phase,
    current_cycle: u32,
    /// Remaining time in seconds for the current phase.
    remaining_secs: f64,
    running: bool,
}

impl IntervalEngine {
    /// Create an engine in the `Stopped` phase.
    pub fn new(config: Configuration) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Stopped,
            current_cycle: 1,
            remaining_secs: 0.0,
            running: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    /// True only while a run is in progress and consuming ticks.
    pub fn is_running(&self) -> bool {
        self.running && self.phase != Phase::Stopped
    }

    /// 0.0 .. 1.0 elapsed share of the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.config.phase_duration(self.phase);
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs / total as f64).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            current_cycle: self.current_cycle,
            total_cycles: self.config.total_cycles,
            remaining_secs: self.remaining_secs.round() as u64,
            progress: self.progress(),
            is_rest_phase: self.phase == Phase::Rest,
            running: self.is_running(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new run from `Stopped`, or resume a paused one.
    pub fn start(&mut self) -> Snapshot {
        if self.phase == Phase::Stopped {
            self.enter(Phase::Work);
            self.current_cycle = 1;
            debug!(work_secs = self.config.work_secs, "run started");
        } else {
            debug!(phase = %self.phase, remaining_secs = self.remaining_secs, "resumed");
        }
        self.running = true;
        self.snapshot()
    }

    pub fn pause(&mut self) -> Snapshot {
        debug!(phase = %self.phase, remaining_secs = self.remaining_secs, "paused");
        self.running = false;
        self.snapshot()
    }

    /// Pause when running, start otherwise.
    pub fn toggle(&mut self) -> Snapshot {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Snapshot {
        debug!("reset");
        self.stop();
        self.snapshot()
    }

    /// Replace the configuration and reset. Never auto-starts.
    ///
    /// An invalid configuration leaves the engine untouched.
    pub fn reconfigure(&mut self, config: Configuration) -> Result<Snapshot, ValidationError> {
        if let Err(err) = config.validate() {
            warn!(%err, "configuration rejected");
            return Err(err);
        }
        self.config = config;
        self.stop();
        info!(
            work_secs = config.work_secs,
            rest_secs = config.rest_secs,
            total_cycles = config.total_cycles,
            "reconfigured"
        );
        Ok(self.snapshot())
    }

    /// Consume `delta_secs` of elapsed time.
    ///
    /// Performs at most one phase transition per call; time past zero is
    /// dropped. Non-positive and NaN deltas are ignored.
    pub fn advance(&mut self, delta_secs: f64) -> Tick {
        if !self.is_running() || !(delta_secs > 0.0) {
            return Tick {
                snapshot: self.snapshot(),
                transition: None,
            };
        }

        self.remaining_secs = (self.remaining_secs - delta_secs).max(0.0);
        let transition = if self.remaining_secs > 0.0 {
            None
        } else {
            Some(self.transition())
        };

        Tick {
            snapshot: self.snapshot(),
            transition,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self) -> Transition {
        let transition = match self.phase {
            Phase::Work => {
                self.enter(Phase::Rest);
                Transition::RestStarting {
                    cycle: self.current_cycle,
                }
            }
            Phase::Rest if self.current_cycle < self.config.total_cycles => {
                self.current_cycle += 1;
                self.enter(Phase::Work);
                Transition::WorkStarting {
                    cycle: self.current_cycle,
                }
            }
            Phase::Rest => {
                self.stop();
                Transition::RunComplete {
                    cycles: self.config.total_cycles,
                }
            }
            Phase::Stopped => unreachable!("advance() never transitions while stopped"),
        };
        info!(?transition, "phase transition");
        transition
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.remaining_secs = self.config.phase_duration(phase) as f64;
    }

    fn stop(&mut self) {
        self.phase = Phase::Stopped;
        self.current_cycle = 1;
        self.remaining_secs = 0.0;
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(work: u64, rest: u64, cycles: u32) -> IntervalEngine {
        IntervalEngine::new(Configuration::new(work, rest, cycles).unwrap()).unwrap()
    }

    #[test]
    fn new_engine_is_stopped() {
        let e = engine(10, 5, 2);
        assert_eq!(e.phase(), Phase::Stopped);
        assert_eq!(e.current_cycle(), 1);
        assert_eq!(e.remaining_secs(), 0.0);
        assert!(!e.is_running());
        assert_eq!(e.progress(), 0.0);
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        let bad = Configuration {
            work_secs: 10,
            rest_secs: 0,
            total_cycles: 1,
        };
        assert!(matches!(
            IntervalEngine::new(bad),
            Err(ValidationError::InvalidConfiguration { field: "rest_secs", .. })
        ));
    }

    #[test]
    fn start_pause_resume() {
        let mut e = engine(10, 5, 2);
        let snap = e.start();
        assert_eq!(snap.phase, Phase::Work);
        assert_eq!(snap.remaining_secs, 10);
        assert!(snap.running);

        e.advance(3.0);
        let snap = e.pause();
        assert!(!snap.running);
        assert_eq!(e.remaining_secs(), 7.0);

        let snap = e.start();
        assert!(snap.running);
        assert_eq!(snap.phase, Phase::Work);
        assert_eq!(e.remaining_secs(), 7.0);
    }

    #[test]
    fn start_while_running_is_idempotent() {
        let mut e = engine(10, 5, 2);
        e.start();
        e.advance(4.0);
        let snap = e.start();
        assert_eq!(e.remaining_secs(), 6.0);
        assert_eq!(snap.current_cycle, 1);
    }

    #[test]
    fn pause_when_stopped_is_a_no_op() {
        let mut e = engine(10, 5, 2);
        let snap = e.pause();
        assert_eq!(snap.phase, Phase::Stopped);
        assert!(!snap.running);
    }

    #[test]
    fn toggle_flips_between_start_and_pause() {
        let mut e = engine(10, 5, 2);
        assert!(e.toggle().running);
        assert!(!e.toggle().running);
        assert_eq!(e.phase(), Phase::Work);
        assert!(e.toggle().running);
    }

    #[test]
    fn work_transitions_to_rest() {
        let mut e = engine(2, 1, 2);
        e.start();
        let tick = e.advance(1.0);
        assert!(tick.transition.is_none());
        let tick = e.advance(1.0);
        assert_eq!(tick.transition, Some(Transition::RestStarting { cycle: 1 }));
        assert_eq!(tick.snapshot.phase, Phase::Rest);
        assert_eq!(e.remaining_secs(), 1.0);
        assert!(tick.snapshot.is_rest_phase);
    }

    #[test]
    fn large_delta_makes_one_transition() {
        let mut e = engine(1, 3, 2);
        e.start();
        let tick = e.advance(100.0);
        assert_eq!(tick.transition, Some(Transition::RestStarting { cycle: 1 }));
        assert_eq!(e.phase(), Phase::Rest);
        assert_eq!(e.remaining_secs(), 3.0);
    }

    #[test]
    fn non_positive_delta_is_ignored() {
        let mut e = engine(5, 5, 1);
        e.start();
        for delta in [0.0, -3.0, f64::NAN] {
            let tick = e.advance(delta);
            assert!(tick.transition.is_none());
            assert_eq!(e.remaining_secs(), 5.0);
        }
    }

    #[test]
    fn advance_while_stopped_does_nothing() {
        let mut e = engine(5, 5, 1);
        let tick = e.advance(10.0);
        assert!(tick.transition.is_none());
        assert_eq!(tick.snapshot.phase, Phase::Stopped);
    }

    #[test]
    fn last_rest_completes_the_run() {
        let mut e = engine(1, 1, 1);
        e.start();
        e.advance(1.0);
        let tick = e.advance(1.0);
        assert_eq!(tick.transition, Some(Transition::RunComplete { cycles: 1 }));
        assert_eq!(e.phase(), Phase::Stopped);
        assert_eq!(e.current_cycle(), 1);
        assert!(!e.is_running());
        assert_eq!(tick.snapshot.remaining_secs, 0);
    }

    #[test]
    fn reset_returns_to_stopped() {
        let mut e = engine(10, 5, 3);
        e.start();
        e.advance(10.0);
        e.advance(5.0);
        assert_eq!(e.current_cycle(), 2);
        let snap = e.reset();
        assert_eq!(snap.phase, Phase::Stopped);
        assert_eq!(snap.current_cycle, 1);
        assert_eq!(snap.remaining_secs, 0);
        assert!(!snap.running);
        assert!(!e.is_running());
    }

    #[test]
    fn reconfigure_resets_without_starting() {
        let mut e = engine(10, 5, 3);
        e.start();
        e.advance(4.0);
        let snap = e
            .reconfigure(Configuration::new(20, 10, 2).unwrap())
            .unwrap();
        assert_eq!(snap.phase, Phase::Stopped);
        assert_eq!(snap.total_cycles, 2);
        assert!(!snap.running);
        assert_eq!(e.config().work_secs, 20);
    }

    #[test]
    fn reconfigure_rejects_and_keeps_state() {
        let mut e = engine(10, 5, 3);
        e.start();
        e.advance(4.0);
        let bad = Configuration {
            work_secs: 10,
            rest_secs: 5,
            total_cycles: 0,
        };
        assert!(e.reconfigure(bad).is_err());
        assert_eq!(e.phase(), Phase::Work);
        assert_eq!(e.remaining_secs(), 6.0);
        assert!(e.is_running());
        assert_eq!(e.config().total_cycles, 3);
    }

    #[test]
    fn progress_is_elapsed_share() {
        let mut e = engine(10, 5, 1);
        e.start();
        assert_eq!(e.progress(), 0.0);
        e.advance(2.5);
        assert!((e.snapshot().progress - 0.25).abs() < 1e-9);
    }

    #[test]
    fn snapshot_rounds_remaining() {
        let mut e = engine(10, 5, 1);
        e.start();
        e.advance(0.4);
        assert_eq!(e.snapshot().remaining_secs, 10);
        e.advance(0.2);
        assert_eq!(e.snapshot().remaining_secs, 9);
    }
}
