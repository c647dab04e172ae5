mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use snowline::assets::AssetRegistry;
use snowline::config::GameConfig;
use snowline::entities::{Action, GameStatus, InputState};
use snowline::levels::{self, LevelGrid};
use snowline::session::GameSession;

#[derive(Debug, Parser)]
#[command(name = "snowline", about = "Tile-based platformer in the terminal")]
struct Args {
    /// Directory holding level1.txt, level2.txt, …  (built-in levels if omitted)
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Level to start (and restart) from, 1-based.
    #[arg(long, default_value_t = 1)]
    start_level: usize,

    /// Seed for sprite-variant selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here; the terminal itself is the game screen.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Do not ring the terminal bell for sound cues.
    #[arg(long)]
    mute: bool,
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms at
/// 60 FPS) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Translate the live key set into the logical actions for this tick.
fn input_for_frame(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    let bindings: [(Action, &[KeyCode]); 5] = [
        (Action::MoveLeft, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
        (Action::MoveRight, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
        (
            Action::Jump,
            &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Char(' ')],
        ),
        (Action::Duck, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
        (Action::Collect, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
    ];

    let mut input = InputState::new();
    for (action, keys) in bindings {
        if any_held(key_frame, keys, frame) {
            input.press(action);
        }
    }
    input
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "*  SNOWLINE  *";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(7),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let legend: &[(&str, Color, &str)] = &[
        ("@", Color::White, "Left and right to move. Up to jump. Down to collect flowers."),
        ("*", Color::Magenta, "Collect flowers."),
        ("w", Color::Red, "Worms and bugs are scary. They try to harm you."),
        ("b", Color::Red, "Bees and flies are scary. They try to harm you."),
        ("~", Color::Blue, "You can swim. Don't go too deep though."),
        ("█", Color::Green, "This is your health bar. If all red, game over."),
        ("▯", Color::DarkMagenta, "Enter the next level through this door."),
    ];

    let left = cx.saturating_sub(32);
    for (i, (sym, color, desc)) in legend.iter().enumerate() {
        let row = cy.saturating_sub(5) + i as u16;
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("  {}", desc)))?;
    }

    let begin = "Press any key to begin...   Q : Quit";
    out.queue(cursor::MoveTo(cx.saturating_sub(begin.chars().count() as u16 / 2), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(begin))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) = rx.recv() {
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => return Ok(MenuResult::Start),
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns when the player quits.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame the keys still "fresh" (within
/// `HOLD_WINDOW` frames) become the held actions for that tick, so jump and a
/// direction can be held together.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut GameSession,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    mute: bool,
) -> std::io::Result<()> {
    let frame_time = Duration::from_secs(1) / session.config().target_fps.max(1);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if session.status() != GameStatus::Playing =>
                        {
                            session.restart(rng);
                            key_frame.clear();
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = input_for_frame(&key_frame, frame);
        let outcome = session.advance(&input, rng);

        for event in &outcome.events {
            if let Some(sound) = session.assets().sound_for(event) {
                debug!(?event, sound = session.assets().sound_name(sound), "sound cue");
                if !mute {
                    out.queue(Print('\x07'))?;
                }
            }
        }

        display::render(out, session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let levels = load_levels(&args)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = GameSession::new(
        GameConfig::default(),
        AssetRegistry::standard(),
        levels,
        args.start_level,
        &mut rng,
    )
    .context("could not start a game session")?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("terminal does not support raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &mut session, &mut rng, args.mute);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exiting");
    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut GameSession,
    rng: &mut StdRng,
    mute: bool,
) -> std::io::Result<()> {
    match show_menu(out, rx)? {
        MenuResult::Quit => Ok(()),
        MenuResult::Start => game_loop(out, session, rx, rng, mute),
    }
}

fn load_levels(args: &Args) -> Result<Vec<LevelGrid>> {
    match &args.levels {
        Some(dir) => levels::load_dir(dir)
            .with_context(|| format!("could not load levels from {}", dir.display())),
        None => levels::builtin().context("built-in levels are malformed"),
    }
}

/// Logs only go anywhere when a file is given; stdout belongs to the game.
fn init_tracing(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}
