pub mod config;
pub mod preview;
pub mod run;

use clap::Args;
use pomocycle_core::{Config, Configuration, ValidationError};

/// Per-invocation overrides of the stored timer settings.
#[derive(Args, Debug, Clone, Default)]
pub struct DurationArgs {
    /// Work duration (minutes, or seconds with --seconds)
    #[arg(long)]
    pub work: Option<u64>,
    /// Rest duration (minutes, or seconds with --seconds)
    #[arg(long)]
    pub rest: Option<u64>,
    /// Number of work/rest cycles
    #[arg(long)]
    pub cycles: Option<u32>,
    /// Treat --work and --rest as seconds
    #[arg(long)]
    pub seconds: bool,
}

impl DurationArgs {
    /// Merge the overrides onto the stored config and validate the result.
    pub fn resolve(&self, config: &Config) -> Result<Configuration, ValidationError> {
        let scale = if self.seconds { 1 } else { 60 };
        let work_secs = match self.work {
            Some(work) => work.saturating_mul(scale),
            None => config.timer.work_minutes.saturating_mul(60),
        };
        let rest_secs = match self.rest {
            Some(rest) => rest.saturating_mul(scale),
            None => config.timer.rest_minutes.saturating_mul(60),
        };
        let total_cycles = self.cycles.unwrap_or(config.timer.cycles);
        Configuration::new(work_secs, rest_secs, total_cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_uses_stored_minutes() {
        let c = DurationArgs::default().resolve(&Config::default()).unwrap();
        assert_eq!(c, Configuration::default());
    }

    #[test]
    fn seconds_flag_scales_only_overrides() {
        let args = DurationArgs {
            work: Some(3),
            seconds: true,
            ..Default::default()
        };
        let c = args.resolve(&Config::default()).unwrap();
        assert_eq!(c.work_secs, 3);
        assert_eq!(c.rest_secs, 300);
    }

    #[test]
    fn zero_override_is_rejected() {
        let args = DurationArgs {
            cycles: Some(0),
            ..Default::default()
        };
        assert!(args.resolve(&Config::default()).is_err());
    }
}
