//! Tuning constants for the simulation and runtime settings for the terminal app.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FPS: u32 = 60;
pub const MIN_FPS: u32 = 10;
pub const MAX_FPS: u32 = 240;

/// Every constant the simulation reads. World units are pixels with y pointing up,
/// origin at the bottom-left corner of the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub screen_width: f64,
    pub screen_height: f64,

    pub gravity: f64,
    /// Upward velocity set by a jump. Overrides, never adds.
    pub jump_strength: f64,
    pub player_start_x: f64,
    pub player_start_y: f64,
    pub player_width: f64,
    pub player_height: f64,

    pub barrier_width: f64,
    pub barrier_height: f64,
    /// Vertical distance between the bottom barrier's top edge and the top barrier's bottom edge.
    pub barrier_gap: f64,
    /// A new pair spawns once the newest barrier is this far left of the right edge.
    pub barrier_interval: f64,
    pub base_speed: f64,
    /// Added to the scroll speed for each pair passed.
    pub speed_increment: f64,

    pub offset_min: i32,
    pub offset_max: i32,
    pub offset_step: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 600.0,
            screen_height: 650.0,

            gravity: 0.5,
            jump_strength: 7.5,
            player_start_x: 100.0,
            player_start_y: 325.0,
            player_width: 32.0,
            player_height: 32.0,

            barrier_width: 80.0,
            barrier_height: 500.0,
            barrier_gap: 150.0,
            barrier_interval: 300.0,
            base_speed: 3.0,
            speed_increment: 0.25,

            offset_min: -200,
            offset_max: 200,
            offset_step: 10,
        }
    }
}

/// Runtime settings for the binary. None of these affect the rules of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub game: GameConfig,
    /// Seed for the barrier stream; drawn from entropy when absent.
    pub seed: Option<u64>,
    pub log_path: Option<PathBuf>,
    pub muted: bool,
    pub fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            seed: None,
            log_path: None,
            muted: false,
            fps: DEFAULT_FPS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Just the log destination. It never warns, so it can be read before a
    /// subscriber exists.
    pub fn log_path_from_env() -> Option<PathBuf> {
        Self::log_path_from_lookup(env_lookup)
    }

    pub fn log_path_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        lookup("HELLJUMPER_LOG")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Builds the config from an arbitrary variable source. Bad values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("HELLJUMPER_SEED").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(err) => {
                tracing::warn!("HELLJUMPER_SEED={raw:?} is not a u64 ({err}); using a random seed");
                None
            }
        });

        let log_path = Self::log_path_from_lookup(&lookup);

        let muted = lookup("HELLJUMPER_MUTE").is_some_and(|raw| parse_flag(&raw));

        let fps = match lookup("HELLJUMPER_FPS") {
            None => DEFAULT_FPS,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(fps) if (MIN_FPS..=MAX_FPS).contains(&fps) => fps,
                Ok(fps) => {
                    let clamped = fps.clamp(MIN_FPS, MAX_FPS);
                    tracing::warn!(
                        "HELLJUMPER_FPS={fps} outside {MIN_FPS}..={MAX_FPS}; clamping to {clamped}"
                    );
                    clamped
                }
                Err(err) => {
                    tracing::warn!(
                        "HELLJUMPER_FPS={raw:?} is not a number ({err}); using {DEFAULT_FPS}"
                    );
                    DEFAULT_FPS
                }
            },
        };

        Self {
            game: GameConfig::default(),
            seed,
            log_path,
            muted,
            fps,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
