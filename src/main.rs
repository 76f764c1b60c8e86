use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use starlane::compute::{init_scene, tick};
use starlane::display::TerminalRenderer;
use starlane::entities::InputState;
use starlane::logging;
use starlane::render::{draw_scene, SceneTextures};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate refreshes the window before it expires.
const HOLD_WINDOW: u64 = 4;

/// Lane shooter: strafe with A/D or the arrows, fire with Space.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the enemy spawn sequence (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Collapse the held-key map into the digital input the scene reads.
fn input_snapshot(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    InputState {
        left: is_held(key_frame, &KeyCode::Left, frame)
            || is_held(key_frame, &KeyCode::Char('a'), frame)
            || is_held(key_frame, &KeyCode::Char('A'), frame),
        right: is_held(key_frame, &KeyCode::Right, frame)
            || is_held(key_frame, &KeyCode::Char('d'), frame)
            || is_held(key_frame, &KeyCode::Char('D'), frame),
        fire: is_held(key_frame, &KeyCode::Char(' '), frame),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Run the scene until the user quits.
///
/// Input model: every press/repeat event stamps the key with the current
/// frame number in `key_frame`; a key counts as held while that stamp is
/// fresh. Terminals with keyboard-enhancement support remove keys on
/// release, classic terminals let the stamps expire after `HOLD_WINDOW`
/// frames of silence. Either way the scene sees one [`InputState`] snapshot
/// per frame.
fn game_loop<W: Write>(
    renderer: &mut TerminalRenderer<W>,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame_budget: Duration,
) -> std::io::Result<()> {
    let textures = SceneTextures::load(renderer);
    let mut state = init_scene();

    // Maps each held key to the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // Drain all pending input events (non-blocking).
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = input_snapshot(&key_frame, frame);
        state = tick(&state, &input, rng);
        draw_scene(renderer, &state, &textures)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut rng = match args.seed {
        Some(seed) => {
            info!("spawn rng seeded with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let fps = args.fps.max(1);
    let frame_budget = Duration::from_millis(u64::from(1000 / fps));

    let mut session = stdout();
    terminal::enable_raw_mode()?;
    session.execute(terminal::EnterAlternateScreen)?;
    session.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = session
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
                    break; // receiver dropped, program exiting
                }
            }
            Err(_) => break,
        }
    });

    let (width, height) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(BufWriter::new(stdout()), width, height);

    let result = game_loop(&mut renderer, &rx, &mut rng, frame_budget);

    // Always restore the terminal.
    if keyboard_enhanced {
        let _ = session.execute(PopKeyboardEnhancementFlags);
    }
    let _ = session.execute(cursor::Show);
    let _ = session.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
