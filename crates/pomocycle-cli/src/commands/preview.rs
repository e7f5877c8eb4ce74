use std::io::Write;

use clap::Args;
use pomocycle_core::{Config, Configuration};

use super::DurationArgs;

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub durations: DurationArgs,
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let configuration = args.durations.resolve(&config)?;

    let mut out = std::io::stdout().lock();
    if args.json {
        write_plan_json(&configuration, &mut out)?;
    } else {
        write_plan(&configuration, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn hms(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Streams one line per phase, then the run total.
fn write_plan(configuration: &Configuration, out: &mut impl Write) -> std::io::Result<()> {
    for step in configuration.plan() {
        writeln!(
            out,
            "Cycle {}/{}  {:<4}  {:>8}  starts +{}",
            step.cycle,
            configuration.total_cycles,
            step.phase.label(),
            hms(step.duration_secs),
            hms(step.starts_at_secs),
        )?;
    }
    writeln!(out, "Total: {}", hms(configuration.total_duration_secs()))
}

/// Streams the plan as a JSON array, one element per line.
fn write_plan_json(configuration: &Configuration, out: &mut impl Write) -> std::io::Result<()> {
    out.write_all(b"[")?;
    for (i, step) in configuration.plan().enumerate() {
        let separator: &[u8] = if i == 0 { b"\n  " } else { b",\n  " };
        out.write_all(separator)?;
        serde_json::to_writer(&mut *out, &step)?;
    }
    out.write_all(b"\n]\n")
}
