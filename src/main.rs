mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{debug, info};
use rand::thread_rng;

use geometry_jumper::compute::default_patterns;
use geometry_jumper::config::FRAME;
use geometry_jumper::entities::Difficulty;
use geometry_jumper::input::KeyboardWrapper;
use geometry_jumper::profile::FrameTrace;
use geometry_jumper::session::{frame, new_session};

/// Jump over and duck under scrolling shapes.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Write a per-frame timing trace (CSV: update and draw time) to this file.
    #[arg(long, value_name = "FILE")]
    cpuprofile: Option<PathBuf>,
    /// Skip the logo, draw track lines and log slow frames.
    #[arg(long)]
    debug: bool,
    /// Pattern bucket to play.
    #[arg(long, value_enum, default_value_t = DifficultyArg::Low)]
    difficulty: DifficultyArg,
    /// Send log output to this file (controlled by RUST_LOG, default `info`).
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Low,
    Medium,
    High,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Low => Difficulty::Low,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::High => Difficulty::High,
        }
    }
}

/// The terminal belongs to the game, so logs only go to a file.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn open_trace(path: Option<&Path>) -> Result<Option<FrameTrace<BufWriter<File>>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create profile file {}", path.display()))?;
    let trace = FrameTrace::new(BufWriter::new(file))
        .with_context(|| format!("failed to write profile header to {}", path.display()))?;
    Ok(Some(trace))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Every state change happens synchronously
/// inside `frame`; the reader thread only hands over owned key events.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    difficulty: Difficulty,
    debug_mode: bool,
    trace: &mut Option<FrameTrace<BufWriter<File>>>,
) -> Result<()> {
    let mut rng = thread_rng();
    let clock = Instant::now();
    let mut keys = KeyboardWrapper::new();
    let mut session = new_session(default_patterns(), difficulty, debug_mode, 0);

    loop {
        let frame_start = Instant::now();
        keys.begin_frame();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev {
                if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                    info!("interrupted");
                    return Ok(());
                }
                keys.record(code, kind);
            }
        }

        let now = clock.elapsed().as_millis() as u64;
        session = match frame(&session, &keys, now, &mut rng) {
            Ok(next) => next,
            Err(reason) => {
                info!("{}", reason);
                return Ok(());
            }
        };
        let update_time = frame_start.elapsed();

        display::render(out, &session, terminal::size()?)?;
        let elapsed = frame_start.elapsed();

        if let Some(trace) = trace.as_mut() {
            trace.record(session.frame, update_time, elapsed - update_time)?;
        }

        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        } else if debug_mode {
            debug!("slow frame {}: {:?}", session.frame, elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_file.as_deref())?;
    let mut trace = open_trace(args.cpuprofile.as_deref())?;

    info!("Starting up game. Version {}", env!("CARGO_PKG_VERSION"));

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(
        &mut out,
        &rx,
        args.difficulty.into(),
        args.debug,
        &mut trace,
    );

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Some(trace) = trace {
        let frames = trace.frames();
        trace.finish().context("failed to flush profile")?;
        info!("wrote {} profile samples", frames);
    }

    result
}
