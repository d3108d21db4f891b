//! Pinball Sim headless runner
//!
//! Builds a table, feeds keys from a script or stdin through the input queue
//! and ticks at a fixed interval, logging score and balls as it goes.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use pinball_sim::input::{KeySender, key_queue};
use pinball_sim::sim::Machine;
use pinball_sim::{ConfigError, Display, Frame, Layout, Preset, Session, Tunables};

/// A tick-driven 2D pinball simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in table: classic, frictionless, dropping or lines
    #[arg(short, long, default_value = "classic")]
    preset: String,

    /// Layout JSON file (overrides the preset's table)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Tunables JSON file (overrides the preset's tunables)
    #[arg(long)]
    tunables: Option<PathBuf>,

    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    /// Milliseconds between ticks (0 runs as fast as possible)
    #[arg(long, default_value_t = 0)]
    tick_ms: u64,

    /// Scripted keys, one per tick; '.' means no key
    #[arg(long, default_value = "")]
    keys: String,

    /// Forward characters typed on stdin into the input queue
    #[arg(long)]
    stdin: bool,

    /// Log a status line every N ticks
    #[arg(long, default_value_t = 100)]
    report_every: u64,
}

/// Logs score and ball count instead of drawing
struct LogDisplay {
    every: u64,
    last: Option<Frame>,
}

impl Display for LogDisplay {
    fn present(&mut self, frame: &Frame) {
        if self.every > 0 && frame.tick % self.every == 0 {
            log::info!(
                "tick {:>6}  score {:>6}  balls left {:>2}  on table {}",
                frame.tick,
                frame.score,
                frame.balls_left,
                frame.disks.len()
            );
        }
        self.last = Some(frame.clone());
    }
}

fn spawn_stdin_reader(tx: KeySender) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for byte in stdin.lock().bytes() {
            let Ok(byte) = byte else { break };
            let key = byte as char;
            if key.is_whitespace() {
                continue;
            }
            if !tx.press(key) {
                break;
            }
        }
    });
}

fn run(args: Args) -> Result<(), ConfigError> {
    let preset = Preset::from_str(&args.preset)
        .ok_or_else(|| ConfigError::tunable("preset", &args.preset))?;

    let tunables = match &args.tunables {
        Some(path) => Tunables::load(Some(path.as_path()))?,
        None => preset.tunables(),
    };
    let layout = match &args.layout {
        Some(path) => Layout::load(path)?,
        None => Layout::for_preset(preset, &tunables),
    };

    let (tx, rx) = key_queue(tunables.input_capacity);
    let machine = Machine::new(&layout, tunables, args.seed)?;
    let display = LogDisplay {
        every: args.report_every,
        last: None,
    };
    let mut session = Session::new(machine, rx, display);

    if args.stdin {
        spawn_stdin_reader(tx.clone());
    }
    let script: Vec<char> = args.keys.chars().collect();

    log::info!("Running {} table for {} ticks", preset.as_str(), args.ticks);
    for t in 0..args.ticks {
        if let Some(&key) = script.get(t as usize) {
            if key != '.' {
                tx.press(key);
            }
        }

        if session.step().is_none() {
            break;
        }

        if args.tick_ms > 0 {
            std::thread::sleep(Duration::from_millis(args.tick_ms));
        }
    }

    if let Some(frame) = &session.display().last {
        println!(
            "Final score {} after {} ticks ({} balls left, {} on table)",
            frame.score,
            frame.tick,
            frame.balls_left,
            frame.disks.len()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Pinball Sim starting...");

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
