//! Hell Jumper: a side-scrolling reflex game for the terminal.
//!
//! The simulation core (`kinematics`, `barrier`, `collision`, `game`) is pure and
//! frame-stepped. `input`, `render` and `sound` adapt it to crossterm, the terminal
//! and rodio.

pub mod barrier;
pub mod collision;
pub mod config;
pub mod game;
pub mod geometry;
pub mod input;
pub mod kinematics;
pub mod render;
pub mod sound;

pub use config::{AppConfig, GameConfig};
pub use game::{Cue, Game, GameState, InputEvent, Snapshot};
