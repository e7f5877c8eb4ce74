//! # Pomocycle Core Library
//!
//! This library provides the core logic for the Pomocycle work/rest interval
//! timer. Presentation surfaces (countdown label, progress bar, tray menu,
//! overlays) and the tick driver live outside the core and talk to it through
//! commands and snapshots.
//!
//! ## Architecture
//!
//! - **Interval Engine**: A delta-driven state machine that requires the caller
//!   to periodically invoke `advance()` with the elapsed seconds
//! - **Events**: Snapshot and transition envelopes for push-style collaborators
//! - **Storage**: TOML-based configuration with 25/5/4 defaults
//!
//! ## Key Components
//!
//! - [`IntervalEngine`]: Core phase state machine
//! - [`Snapshot`]: Read-only projection for rendering
//! - [`Transition`]: Rest starting / work starting / run complete
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, ValidationError};
pub use events::{Event, Transition};
pub use storage::Config;
pub use timer::{
    Configuration, IntervalEngine, MenuAction, Phase, PlannedPhase, Snapshot, Tick, TickClock,
    DEFAULT_TICK_MS,
};
