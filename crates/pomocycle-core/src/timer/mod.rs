mod clock;
mod engine;
mod schedule;
mod snapshot;

pub use clock::{TickClock, DEFAULT_TICK_MS};
pub use engine::{IntervalEngine, Tick};
pub use schedule::{Configuration, Phase, PlannedPhase};
pub use snapshot::{MenuAction, Snapshot};
