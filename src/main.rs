mod audio;
mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use megapixel::compute::{accepts_reset, init_session, reset, tick};
use megapixel::config::{Variant, TICK_RATE_HZ};
use megapixel::input::KeyTracker;

use display::Viewport;

#[derive(Parser, Debug)]
#[command(name = "megapixel", about = "Terminal platformer: collect coins, stomp enemies")]
struct Cli {
    /// Which of the two games to play.
    #[arg(long, value_enum, default_value_t = Variant::Deluxe)]
    variant: Variant,

    /// Seed for spawn placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filter with MEGAPIXEL_LOG).  The terminal itself is
    /// taken by the game, so nothing is logged without this.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn frame_duration() -> Duration {
    Duration::from_secs(1) / TICK_RATE_HZ
}

fn init_logging(path: &PathBuf) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MEGAPIXEL_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Order per frame: drain input, maybe reset,
/// simulate one tick, play cues, render, sleep out the rest of the frame.
fn game_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, cli: &Cli) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = init_session(cli.variant, &mut rng);

    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let mut view = Viewport { cols, rows };
    let mut keys = KeyTracker::new();
    let mut frame: u64 = 0;
    let frame_time = frame_duration();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Input ─────────────────────────────────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(key) => keys.record(&key, frame),
                Event::Resize(cols, rows) => view = Viewport { cols, rows },
                _ => {}
            }
        }
        let input = keys.snapshot(frame);

        if input.quit {
            tracing::info!(score = session.player.score, "quit");
            return Ok(());
        }
        if input.reset && accepts_reset(&session) {
            session = reset(&session, &mut rng);
        }

        let outcome = tick(&session, &input);
        session = outcome.session;

        audio::play(out, &outcome.events);
        display::render(out, &session, view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events where the terminal speaks the kitty protocol; elsewhere
    // held keys expire through the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread; the loop only polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // game loop gone
            }
        }
    });

    let result = game_loop(&mut out, &rx, &cli);

    // Restore the terminal whatever the loop returned
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!(error = %err, "game loop failed");
    }
    result
}
