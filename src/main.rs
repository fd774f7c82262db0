use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};
use std::fs::File;
use std::io::{self, stdout};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use hell_jumper::config::AppConfig;
use hell_jumper::game::Game;
use hell_jumper::input::{Command, map_event};
use hell_jumper::render::{PixelBuf, Viewport, draw};
use hell_jumper::sound::Audio;

const WINDOW_TITLE: &str = "Hell Jumper";

fn init_logging(log_path: Option<&Path>) -> Result<()> {
    // stdout and stderr belong to the game screen, so logs only go to a file.
    let Some(path) = log_path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();
    Ok(())
}

fn open_audio(config: &AppConfig) -> Option<Audio> {
    if config.muted {
        tracing::info!("audio muted");
        return None;
    }
    match Audio::open() {
        Ok(mut audio) => {
            audio.start_music();
            Some(audio)
        }
        Err(err) => {
            tracing::warn!("running without sound: {err:#}");
            None
        }
    }
}

fn run(
    out: &mut io::Stdout,
    game: &mut Game,
    audio: Option<&Audio>,
    frame_dur: Duration,
) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let world = game.config().clone();
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let fit = |buf: &PixelBuf| {
        Viewport::fit(buf.width(), buf.height(), world.screen_width, world.screen_height)
    };
    let mut view = fit(&buf);
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            let raw = event::read()?;
            match map_event(&raw, game.state()) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Game(input)) => {
                    if let (Some(cue), Some(audio)) = (game.handle_input(input), audio) {
                        audio.play(cue);
                    }
                }
                Some(Command::Resize(c, r)) => {
                    buf.resize(c as usize, r as usize * 2);
                    view = fit(&buf);
                    tracing::debug!(cols = c, rows = r, scale = view.scale, "resized");
                }
                None => {}
            }
        }

        // Update
        let dt = last_frame.elapsed().as_secs_f64();
        last_frame = Instant::now();
        if let (Some(cue), Some(audio)) = (game.tick(dt), audio) {
            audio.play(cue);
        }

        // Render
        draw(&mut buf, &game.snapshot(), &view);
        buf.render(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn main() -> Result<()> {
    // The subscriber goes up first so config parsing warnings reach the log.
    init_logging(AppConfig::log_path_from_env().as_deref())?;
    let config = AppConfig::from_env();

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, fps = config.fps, "starting {WINDOW_TITLE}");

    let audio = open_audio(&config);
    let mut game = Game::new(config.game.clone(), seed);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let mut out = stdout();
    if let Err(err) = execute!(
        out,
        terminal::EnterAlternateScreen,
        terminal::SetTitle(WINDOW_TITLE),
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    ) {
        let _ = terminal::disable_raw_mode();
        return Err(err).context("failed to set up terminal");
    }

    let result = run(&mut out, &mut game, audio.as_ref(), config.frame_duration());

    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )
    .context("failed to restore terminal")?;
    terminal::disable_raw_mode().context("failed to disable raw mode")?;

    result.context("game loop failed")?;
    tracing::info!(best = game.best(), "exiting");
    Ok(())
}
