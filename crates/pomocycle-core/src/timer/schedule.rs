use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The engine's current activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Stopped,
    Work,
    Rest,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Stopped => "Stopped",
            Phase::Work => "Work",
            Phase::Rest => "Rest",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Work/rest durations and the number of cycles in a run.
///
/// Every field must be at least 1. Fields are public so collaborators can
/// build a value field by field; the engine validates on every entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Length of a WORK phase in seconds.
    pub work_secs: u64,
    /// Length of a REST phase in seconds.
    pub rest_secs: u64,
    /// Number of WORK+REST pairs before the run completes.
    pub total_cycles: u32,
}

impl Configuration {
    pub const DEFAULT_WORK_MIN: u64 = 25;
    pub const DEFAULT_REST_MIN: u64 = 5;
    pub const DEFAULT_CYCLES: u32 = 4;

    /// Build a validated configuration from seconds.
    pub fn new(work_secs: u64, rest_secs: u64, total_cycles: u32) -> Result<Self, ValidationError> {
        let config = Self {
            work_secs,
            rest_secs,
            total_cycles,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a validated configuration from minutes.
    ///
    /// Uses saturating arithmetic so absurd minute counts cannot overflow.
    pub fn from_minutes(
        work_min: u64,
        rest_min: u64,
        total_cycles: u32,
    ) -> Result<Self, ValidationError> {
        Self::new(
            work_min.saturating_mul(60),
            rest_min.saturating_mul(60),
            total_cycles,
        )
    }

    /// Reject any field below one, reporting the first offender.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            ("work_secs", self.work_secs),
            ("rest_secs", self.rest_secs),
            ("total_cycles", u64::from(self.total_cycles)),
        ];
        for (field, value) in checks {
            if value < 1 {
                return Err(ValidationError::InvalidConfiguration { field, value });
            }
        }
        Ok(())
    }

    /// Configured length of `phase` in seconds; 0 for `Stopped`.
    pub fn phase_duration(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Rest => self.rest_secs,
            Phase::Stopped => 0,
        }
    }

    /// Length of one complete run in seconds.
    pub fn total_duration_secs(&self) -> u64 {
        self.work_secs
            .saturating_add(self.rest_secs)
            .saturating_mul(u64::from(self.total_cycles))
    }

    /// Every phase of a run in order, for previews.
    ///
    /// Lazy, so a valid but huge cycle count never allocates the whole run.
    pub fn plan(&self) -> impl Iterator<Item = PlannedPhase> {
        let Configuration {
            work_secs,
            rest_secs,
            total_cycles,
        } = *self;
        let cycle_secs = work_secs.saturating_add(rest_secs);
        (1..=total_cycles).flat_map(move |cycle| {
            let cycle_start = cycle_secs.saturating_mul(u64::from(cycle - 1));
            [
                PlannedPhase {
                    cycle,
                    phase: Phase::Work,
                    duration_secs: work_secs,
                    starts_at_secs: cycle_start,
                },
                PlannedPhase {
                    cycle,
                    phase: Phase::Rest,
                    duration_secs: rest_secs,
                    starts_at_secs: cycle_start.saturating_add(work_secs),
                },
            ]
        })
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            work_secs: Self::DEFAULT_WORK_MIN * 60,
            rest_secs: Self::DEFAULT_REST_MIN * 60,
            total_cycles: Self::DEFAULT_CYCLES,
        }
    }
}

/// One entry of [`Configuration::plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPhase {
    pub cycle: u32,
    pub phase: Phase,
    pub duration_secs: u64,
    /// Offset from the start of the run.
    pub starts_at_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_25_5_4() {
        let c = Configuration::default();
        assert_eq!(c.work_secs, 25 * 60);
        assert_eq!(c.rest_secs, 5 * 60);
        assert_eq!(c.total_cycles, 4);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_zero_fields() {
        assert_eq!(
            Configuration::new(0, 1, 1),
            Err(ValidationError::InvalidConfiguration {
                field: "work_secs",
                value: 0
            })
        );
        assert!(Configuration::new(1, 0, 1).is_err());
        assert!(Configuration::new(1, 1, 0).is_err());
        assert!(Configuration::new(1, 1, 1).is_ok());
    }

    #[test]
    fn from_minutes_converts() {
        let c = Configuration::from_minutes(50, 10, 2).unwrap();
        assert_eq!(c.work_secs, 3000);
        assert_eq!(c.rest_secs, 600);
        assert!(Configuration::from_minutes(0, 10, 2).is_err());
    }

    #[test]
    fn phase_duration_of_stopped_is_zero() {
        let c = Configuration::default();
        assert_eq!(c.phase_duration(Phase::Stopped), 0);
        assert_eq!(c.phase_duration(Phase::Work), 1500);
        assert_eq!(c.phase_duration(Phase::Rest), 300);
    }

    #[test]
    fn plan_alternates_work_and_rest() {
        let c = Configuration::new(10, 2, 3).unwrap();
        let plan: Vec<_> = c.plan().collect();
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[0].phase, Phase::Work);
        assert_eq!(plan[1].phase, Phase::Rest);
        assert_eq!(plan[5].cycle, 3);
        assert_eq!(plan[5].starts_at_secs, 10 + 2 + 10 + 2 + 10);
        assert_eq!(c.total_duration_secs(), 36);
    }

    #[test]
    fn plan_for_max_cycles_is_lazy() {
        let c = Configuration::new(1, 1, u32::MAX).unwrap();
        let head: Vec<_> = c.plan().take(4).collect();
        assert_eq!(head.len(), 4);
        assert_eq!(head[3].cycle, 2);
        assert_eq!(head[3].starts_at_secs, 3);
        assert_eq!(c.total_duration_secs(), 2 * u64::from(u32::MAX));
    }
}
