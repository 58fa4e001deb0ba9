use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::process::ExitCode;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use glam::Vec2;
use log::{info, warn, LevelFilter};
use rand::thread_rng;

use santa_sled::audio::Audio;
use santa_sled::clock::Clock;
use santa_sled::compute::{init_game, tick};
use santa_sled::config::Config;
use santa_sled::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, TITLE};
use santa_sled::display::{self, art::Art, fb::FrameBuffer};
use santa_sled::input::{KeyTracker, Signal};
use santa_sled::GameError;

/// Smallest terminal the HUD still fits on.
const MIN_COLS: u16 = 48;
const MIN_ROWS: u16 = 14;

// ── Logging ───────────────────────────────────────────────────────────────────

/// stderr shares the screen with the game, so logs go to a file and only
/// when asked for through `RUST_LOG`.
fn init_logging(config: &Config) -> Result<(), GameError> {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_some() {
        let file = File::create(&config.log_file).map_err(|source| GameError::Log {
            path: config.log_file.clone(),
            source,
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else {
        builder.filter_level(LevelFilter::Off);
    }
    builder.init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the close signal.  Each frame: wait for the frame boundary,
/// drain input, update the tree, redraw and present.
fn run<W: Write>(out: &mut W, config: &Config, cols: u16, rows: u16) -> Result<(), GameError> {
    let mut rng = thread_rng();
    let mut game = init_game(SCREEN_WIDTH, SCREEN_HEIGHT, &mut rng);
    let mut fb = FrameBuffer::new(
        cols,
        rows,
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        Art::load(SCREEN_WIDTH, SCREEN_HEIGHT),
    );
    let mut audio = Audio::new(config.sound);
    let mut tracker = KeyTracker::new();
    let mut clock = Clock::new(config.fps);
    info!("frame budget {:?}", clock.frame_duration());

    audio.start_music();

    'frames: loop {
        let delta = clock.tick();
        tracker.begin_frame();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if tracker.handle(key) == Some(Signal::Close) {
                        break 'frames;
                    }
                }
                Event::Resize(c, r) => {
                    info!("terminal resized to {}x{}", c, r);
                    fb.resize(c, r);
                }
                _ => {}
            }
        }

        let cues = tick(&mut game, tracker.keys(), delta, &mut rng);
        audio.play(out, &cues)?;

        fb.clear();
        display::draw_game(&game, &mut fb);
        fb.present(out)?;
    }

    if audio.is_music_playing() {
        audio.stop_music();
    }
    info!(
        "closed after {} frames, score {}, {} items in the scene",
        tracker.frame(),
        game.score,
        game.root.descendants()
    );
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn start() -> Result<(), GameError> {
    let config = Config::from_env()?;
    init_logging(&config)?;
    info!("starting {} at {} fps, sound {}", TITLE, config.fps, config.sound);

    let (cols, rows) = terminal::size()?;
    if cols < MIN_COLS || rows < MIN_ROWS {
        return Err(GameError::TooSmall {
            cols,
            rows,
            min_cols: MIN_COLS,
            min_rows: MIN_ROWS,
        });
    }

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(terminal::SetTitle(TITLE))?;

    // Key-release events make held keys drop immediately; without them the
    // tracker falls back to its hold window.
    let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    if !keyboard_enhanced {
        warn!("no keyboard enhancement, using key-repeat hold window");
    }

    let result = run(&mut out, &config, cols, rows);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn main() -> ExitCode {
    match start() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("santa_sled: {err}");
            ExitCode::FAILURE
        }
    }
}
