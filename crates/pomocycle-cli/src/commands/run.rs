//! Terminal driver for the interval engine.
//!
//! One task owns the engine. Ticks, stdin commands and Ctrl-C are
//! multiplexed with `tokio::select!`, so every engine call is serialized.

use std::io::Write;
use std::time::Duration;

use clap::Args;
use pomocycle_core::{
    Config, Event, IntervalEngine, Snapshot, Tick, TickClock, Transition,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::DurationArgs;

const BAR_WIDTH: usize = 30;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub durations: DurationArgs,
    /// Tick cadence in milliseconds (defaults to the config value)
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Wait for a start command instead of starting immediately
    #[arg(long)]
    pub paused: bool,
    /// Keep running after the last cycle completes
    #[arg(long)]
    pub stay: bool,
    /// Emit events as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Commands read from stdin, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "s" | "start" => Some(Command::Start),
            "p" | "pause" => Some(Command::Pause),
            "t" | "toggle" | "" => Some(Command::Toggle),
            "r" | "reset" => Some(Command::Reset),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }

    fn apply(self, engine: &mut IntervalEngine) -> Snapshot {
        match self {
            Command::Start => engine.start(),
            Command::Pause => engine.pause(),
            Command::Toggle => engine.toggle(),
            Command::Reset => engine.reset(),
            Command::Quit => engine.snapshot(),
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let configuration = args.durations.resolve(&config)?;
    let engine = IntervalEngine::new(configuration)?;
    let tick_ms = args.tick_ms.unwrap_or(config.tick_interval_ms).max(1);

    let renderer = Renderer {
        out: Box::new(std::io::stdout()),
        json: args.json,
        notifications: config.notifications.enabled,
        overlay: config.notifications.overlay,
        last: None,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(
        engine,
        renderer,
        Duration::from_millis(tick_ms),
        !args.paused,
        args.stay,
    ));
    // The stdin reader may still be parked on a blocking read.
    runtime.shutdown_background();
    result
}

async fn read_commands(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match Command::parse(&line) {
            Some(command) => {
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            None => eprintln!("unknown command: {} (s, p, t, r, q)", line.trim()),
        }
    }
}

async fn drive(
    mut engine: IntervalEngine,
    mut renderer: Renderer,
    cadence: Duration,
    autostart: bool,
    stay: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::channel(16);
    tokio::spawn(read_commands(tx));
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut interval = tokio::time::interval(cadence);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut clock = TickClock::new();

    let snapshot = if autostart {
        engine.start()
    } else {
        engine.snapshot()
    };
    renderer.snapshot(snapshot)?;
    info!(config = ?engine.config(), cadence_ms = cadence.as_millis() as u64, "driver started");

    loop {
        let flow = tokio::select! {
            _ = interval.tick() => {
                step(&mut engine, &mut renderer, clock.elapsed_secs(), None, stay)?
            }
            command = rx.recv(), if stdin_open => {
                let Some(command) = command else {
                    debug!("stdin closed");
                    stdin_open = false;
                    continue;
                };
                // Credit time elapsed since the last tick before the command lands.
                step(&mut engine, &mut renderer, clock.elapsed_secs(), Some(command), stay)?
            }
            _ = &mut ctrl_c => {
                debug!("interrupted");
                Flow::Exit
            }
        };
        if flow == Flow::Exit {
            break;
        }
    }

    info!(snapshot = %engine.snapshot(), "driver stopped");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Feed elapsed time to the engine, then apply `command` if any.
///
/// Exits once the run completes (unless `stay`), even when the completing
/// advance was the one crediting time ahead of a command.
fn step(
    engine: &mut IntervalEngine,
    renderer: &mut Renderer,
    elapsed_secs: f64,
    command: Option<Command>,
    stay: bool,
) -> std::io::Result<Flow> {
    let tick = engine.advance(elapsed_secs);
    renderer.tick(&tick)?;
    if !stay && matches!(tick.transition, Some(Transition::RunComplete { .. })) {
        return Ok(Flow::Exit);
    }

    match command {
        None => Ok(Flow::Continue),
        Some(Command::Quit) => Ok(Flow::Exit),
        Some(command) => {
            renderer.snapshot(command.apply(engine))?;
            Ok(Flow::Continue)
        }
    }
}

/// Text rendering for the countdown, progress bar and notifications.
struct Renderer {
    out: Box<dyn Write>,
    json: bool,
    notifications: bool,
    overlay: bool,
    /// Last snapshot printed, to print only on visible change.
    last: Option<Snapshot>,
}

impl Renderer {
    fn tick(&mut self, tick: &Tick) -> std::io::Result<()> {
        if let Some(transition) = tick.transition {
            self.transition(transition, tick)?;
        }
        self.snapshot(tick.snapshot)
    }

    fn transition(&mut self, transition: Transition, tick: &Tick) -> std::io::Result<()> {
        let out = &mut self.out;
        if self.json {
            // The snapshot event follows from `snapshot()`.
            let event = Event::from_tick(tick).remove(0);
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
            return Ok(());
        }
        if self.notifications {
            writeln!(out, "== {}: {} ==", transition.title(), transition.message())?;
        }
        if self.overlay {
            if let Some(text) = transition.overlay() {
                writeln!(out, "   {text}")?;
            }
        }
        Ok(())
    }

    fn snapshot(&mut self, snapshot: Snapshot) -> std::io::Result<()> {
        if !changed(self.last.as_ref(), &snapshot) {
            return Ok(());
        }
        self.last = Some(snapshot);

        let out = &mut self.out;
        if self.json {
            writeln!(out, "{}", serde_json::to_string(&Event::snapshot(snapshot))?)?;
        } else {
            writeln!(
                out,
                "{}  {}  [{}]",
                snapshot,
                progress_bar(&snapshot, BAR_WIDTH),
                snapshot.primary_action().label()
            )?;
        }
        out.flush()
    }
}

fn changed(last: Option<&Snapshot>, next: &Snapshot) -> bool {
    match last {
        None => true,
        Some(last) => {
            last.phase != next.phase
                || last.current_cycle != next.current_cycle
                || last.remaining_secs != next.remaining_secs
                || last.running != next.running
                || last.total_cycles != next.total_cycles
        }
    }
}

/// Work fills with `#`, rest with `~`.
fn progress_bar(snapshot: &Snapshot, width: usize) -> String {
    let filled = ((snapshot.progress * width as f64).round() as usize).min(width);
    let fill = if snapshot.is_rest_phase { '~' } else { '#' };
    let mut bar = String::with_capacity(width + 2);
    bar.push('|');
    bar.extend(std::iter::repeat(fill).take(filled));
    bar.extend(std::iter::repeat('.').take(width - filled));
    bar.push('|');
    bar
}
