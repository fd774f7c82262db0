//! The run state machine: Start -> Playing -> GameOver -> Playing.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::barrier::{Barrier, BarrierSet};
use crate::collision::{check_collision, check_out_of_bounds, update_score};
use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::kinematics::{Kinematics, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    GameOver,
}

/// Semantic input, already decoupled from keys and mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Jump,
    StartOrRestart,
}

/// Sound trigger points raised by the simulation. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Crash,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: GameState,
    pub player: Rect,
    pub player_vy: f64,
    pub barriers: Vec<Rect>,
    /// Pairs passed in the current (or last) run.
    pub score: u32,
    pub best: u32,
    pub frame: u64,
}

/// Scroll speed for a raw score. Raw score counts halves, so `score / 2` is pairs passed.
pub fn barrier_speed(config: &GameConfig, score: u32) -> f64 {
    config.base_speed + (score / 2) as f64 * config.speed_increment
}

pub struct Game {
    config: GameConfig,
    kinematics: Kinematics,
    rng: StdRng,
    state: GameState,
    pub(crate) player: Player,
    pub(crate) barriers: BarrierSet,
    /// Raw score: 2 per pair passed.
    score: u32,
    best: u32,
    frame: u64,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let kinematics = Kinematics::new(&config);
        let player = Player::spawn(&config);
        Self {
            config,
            kinematics,
            rng: StdRng::seed_from_u64(seed),
            state: GameState::Start,
            player,
            barriers: BarrierSet::new(),
            score: 0,
            best: 0,
            frame: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn raw_score(&self) -> u32 {
        self.score
    }

    /// Pairs passed.
    pub fn display_score(&self) -> u32 {
        self.score / 2
    }

    /// Best `display_score` across runs.
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Current scroll speed, derived from the score.
    pub fn speed(&self) -> f64 {
        barrier_speed(&self.config, self.score)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn barriers(&self) -> &BarrierSet {
        &self.barriers
    }

    /// Direct access to the entities, for setting up scenarios in tests.
    #[doc(hidden)]
    pub fn entities_mut(&mut self) -> (&mut Player, &mut BarrierSet) {
        (&mut self.player, &mut self.barriers)
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Option<Cue> {
        match self.state {
            GameState::Start | GameState::GameOver => {
                self.start_run();
                None
            }
            GameState::Playing => {
                self.kinematics.jump(&mut self.player);
                tracing::trace!(y = self.player.y, ?event, "jump");
                Some(Cue::Jump)
            }
        }
    }

    /// Full reset: fresh player, empty barrier set, one new pair, score zero.
    fn start_run(&mut self) {
        let from = self.state;
        self.score = 0;
        self.player = Player::spawn(&self.config);
        self.barriers.clear();
        self.spawn_pair();
        self.state = GameState::Playing;
        tracing::info!(?from, "run started");
    }

    fn spawn_pair(&mut self) {
        let offset = self
            .barriers
            .spawn_pair(&mut self.rng, self.config.screen_width, &self.config);
        tracing::debug!(offset, live = self.barriers.len(), "spawned barrier pair");
    }

    /// Advances one frame. No-op outside `Playing`.
    pub fn tick(&mut self, dt: f64) -> Option<Cue> {
        self.frame = self.frame.wrapping_add(1);
        if self.state != GameState::Playing {
            return None;
        }

        let speed = barrier_speed(&self.config, self.score);
        self.kinematics.advance(&mut self.player, dt);
        self.barriers.advance_all(speed);
        if self.barriers.needs_spawn(&self.config) {
            self.spawn_pair();
        }
        self.score = update_score(self.score, &self.player, &mut self.barriers);

        if check_collision(&self.player, &self.barriers)
            || check_out_of_bounds(&self.player, self.config.screen_height)
        {
            self.game_over();
            return Some(Cue::Crash);
        }
        None
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        self.best = self.best.max(self.display_score());
        tracing::info!(
            score = self.display_score(),
            best = self.best,
            y = self.player.y,
            "game over"
        );
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            player: self.player.rect(),
            player_vy: self.player.vy,
            barriers: self.barriers.iter().map(Barrier::rect).collect(),
            score: self.display_score(),
            best: self.best,
            frame: self.frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_game() -> Game {
        let mut game = Game::new(GameConfig::default(), 7);
        game.handle_input(InputEvent::StartOrRestart);
        game
    }

    #[test]
    fn test_initial_state() {
        let game = Game::new(GameConfig::default(), 1);
        assert_eq!(game.state(), GameState::Start);
        assert_eq!(game.raw_score(), 0);
        assert!(game.barriers.is_empty());
    }

    #[test]
    fn test_tick_is_noop_outside_playing() {
        let mut game = Game::new(GameConfig::default(), 1);
        let before = game.player.clone();
        assert_eq!(game.tick(1.0 / 60.0), None);
        assert_eq!(game.player, before);
        assert!(game.barriers.is_empty());
    }

    #[test]
    fn test_jump_while_playing_emits_cue() {
        let mut game = playing_game();
        game.player.vy = -12.0;
        assert_eq!(game.handle_input(InputEvent::Jump), Some(Cue::Jump));
        assert_eq!(game.player.vy, 7.5);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_jump_event_also_starts_run() {
        let mut game = Game::new(GameConfig::default(), 3);
        assert_eq!(game.handle_input(InputEvent::Jump), None);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.barriers.len(), 2);
    }

    #[test]
    fn test_speed_ramp() {
        let config = GameConfig::default();
        assert_eq!(barrier_speed(&config, 0), 3.0);
        assert_eq!(barrier_speed(&config, 1), 3.0);
        assert_eq!(barrier_speed(&config, 2), 3.25);
        assert_eq!(barrier_speed(&config, 9), 4.0);
        let mut last = 0.0;
        for score in 0..200 {
            let speed = barrier_speed(&config, score);
            assert!(speed >= last);
            last = speed;
        }
    }

    #[test]
    fn test_tick_uses_score_speed() {
        let mut game = playing_game();
        game.score = 6;
        let x0 = game.barriers.as_slice()[0].x;
        game.player.vy = 0.5; // hover
        game.tick(1.0 / 60.0);
        assert_eq!(game.speed(), 3.75);
        assert_eq!(game.barriers.as_slice()[0].x, x0 - 3.75);
    }

    #[test]
    fn test_speed_follows_score_and_resets_on_restart() {
        let mut game = playing_game();
        game.score = 10;
        assert_eq!(game.speed(), 4.25);

        game.player.y = -100.0;
        game.tick(1.0 / 60.0);
        game.handle_input(InputEvent::StartOrRestart);
        assert_eq!(game.speed(), game.config().base_speed);
    }

    #[test]
    fn test_accessors_reflect_owned_entities() {
        let mut game = playing_game();
        {
            let (player, barriers) = game.entities_mut();
            player.vy = 3.0;
            barriers.clear();
        }
        assert_eq!(game.player().vy, 3.0);
        assert!(game.barriers().is_empty());
        assert_eq!(game.player(), &game.player);
    }

    #[test]
    fn test_new_pair_spawns_after_interval() {
        let mut game = playing_game();
        let config = game.config().clone();
        // Newest barrier starts at 680; it must fall below 300.
        let frames_needed = ((680.0 - 300.0) / config.base_speed) as usize + 1;
        for _ in 0..frames_needed {
            game.kinematics.jump(&mut game.player);
            game.player.y = 325.0;
            game.tick(1.0 / 60.0);
        }
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.barriers.len(), 4);
        let newest = game.barriers.as_slice().last().map(|b| b.x);
        assert_eq!(newest, Some(config.screen_width + config.barrier_width));
    }

    #[test]
    fn test_crash_emits_cue_and_updates_best() {
        let mut game = playing_game();
        game.score = 7;
        game.player.y = -100.0;
        assert_eq!(game.tick(1.0 / 60.0), Some(Cue::Crash));
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.best(), 3);

        // Ticks after game over change nothing.
        let y = game.player.y;
        assert_eq!(game.tick(1.0 / 60.0), None);
        assert_eq!(game.player.y, y);
    }

    #[test]
    fn test_best_survives_restart() {
        let mut game = playing_game();
        game.score = 10;
        game.player.y = 10_000.0;
        game.tick(1.0 / 60.0);
        game.handle_input(InputEvent::StartOrRestart);
        assert_eq!(game.display_score(), 0);
        assert_eq!(game.best(), 5);

        game.score = 4;
        game.player.y = -500.0;
        game.tick(1.0 / 60.0);
        assert_eq!(game.best(), 5);
    }

    #[test]
    fn test_same_seed_same_barriers() {
        let mut a = Game::new(GameConfig::default(), 99);
        let mut b = Game::new(GameConfig::default(), 99);
        for _ in 0..5 {
            a.handle_input(InputEvent::StartOrRestart);
            b.handle_input(InputEvent::StartOrRestart);
            assert_eq!(a.barriers, b.barriers);
            a.player.y = -100.0;
            b.player.y = -100.0;
            a.tick(0.0);
            b.tick(0.0);
        }
    }

    #[test]
    fn test_snapshot_halves_score() {
        let mut game = playing_game();
        game.score = 5;
        let snap = game.snapshot();
        assert_eq!(snap.state, GameState::Playing);
        assert_eq!(snap.score, 2);
        assert_eq!(snap.barriers.len(), 2);
        assert_eq!(snap.player, game.player.rect());
    }
}
