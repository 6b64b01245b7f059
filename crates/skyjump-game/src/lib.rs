pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod level_gen;
pub mod physics;
pub mod platform;
pub mod powerups;
pub mod scoring;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use skyjump_core::events::GameEvent;
use skyjump_core::game_trait::{GameConfig, GameMetadata, SkyJumpGame, Viewport};
use skyjump_core::input::KeyEvent;
use skyjump_core::skyjump_game_boilerplate;
use skyjump_core::time::unix_seconds;

use config::{LevelConfig, LevelPreset};
use controls::{DebugFlags, KeyOutcome};
use error::LevelError;
use level_gen::{Level, generate_level};
use physics::{FRAME_DT, PlayerState};
use scoring::LevelResult;

/// Seed used before the host calls `init`.
pub const DEFAULT_SEED: u64 = 42;
/// Frames simulated per `update` call at most; a longer stall drops the backlog.
pub const MAX_FRAMES_PER_UPDATE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Playing,
    GameOver,
    LevelComplete,
}

/// Serializable session state: the level, the player and everything the
/// frame step mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    pub seed: u64,
    /// Seed for the next restart, drawn from this level's generator.
    pub next_seed: u64,
    pub level: Level,
    pub player: PlayerState,
    pub status: SessionStatus,
    pub score: u32,
    pub camera_x: f32,
    pub frame: u64,
    /// Clock reading (seconds) when the level started.
    pub clock_origin: f64,
    /// Simulated seconds since the level started.
    pub elapsed: f64,
    pub grace_frames_left: u32,
    pub debug: DebugFlags,
}

impl LevelState {
    /// Generate a level and place the player on the start platform.
    pub fn generate(
        config: &LevelConfig,
        viewport: Viewport,
        seed: u64,
        clock_origin: f64,
    ) -> Result<Self, LevelError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let level = generate_level(config, viewport, &mut rng)?;
        let mut player = PlayerState::new(level.spawn_x, level.spawn_y);
        player.on_platform = Some(0);
        Ok(Self {
            seed,
            next_seed: rng.random(),
            level,
            player,
            status: SessionStatus::Playing,
            score: 0,
            camera_x: 0.0,
            frame: 0,
            clock_origin,
            elapsed: 0.0,
            grace_frames_left: config.physics.spawn_grace_frames,
            debug: DebugFlags::default(),
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status != SessionStatus::Playing
    }

    /// Current reading of the clock that drives moving platforms.
    pub fn clock(&self) -> f64 {
        self.clock_origin + self.elapsed
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            frame: self.frame,
            x: self.player.x,
            y: self.player.y,
            vx: self.player.vx,
            vy: self.player.vy,
            on_platform: self.player.on_platform,
            jumping: self.player.jumping,
            super_jump_left: self.player.super_jump.as_ref().map(|pu| pu.remaining),
            platforms: self.level.platforms.len(),
        }
    }
}

/// Per-frame diagnostics, logged at trace level while debug mode is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugSnapshot {
    pub frame: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub on_platform: Option<usize>,
    pub jumping: bool,
    pub super_jump_left: Option<f32>,
    pub platforms: usize,
}

/// SkyJump City: one level session.
pub struct SkyJumpCity {
    config: LevelConfig,
    viewport: Viewport,
    state: LevelState,
    paused: bool,
    /// Unsimulated time carried between `update` calls.
    accumulator: f32,
}

impl SkyJumpCity {
    /// Validate `config` and build a first level with [`DEFAULT_SEED`].
    pub fn try_new(config: LevelConfig) -> Result<Self, LevelError> {
        config.validate()?;
        let viewport = Viewport::default();
        let state = LevelState::generate(&config, viewport, DEFAULT_SEED, unix_seconds())?;
        Ok(Self {
            config,
            viewport,
            state,
            paused: false,
            accumulator: 0.0,
        })
    }

    pub fn from_preset(preset: LevelPreset) -> Result<Self, LevelError> {
        Self::try_new(preset.config())
    }

    pub fn state(&self) -> &LevelState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LevelState {
        &mut self.state
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn result(&self) -> LevelResult {
        scoring::summarize(&self.state)
    }

    /// Banner text for a finished session.
    pub fn message(&self) -> Option<&str> {
        match self.state.status {
            SessionStatus::Playing => None,
            SessionStatus::GameOver => Some(&self.config.game_over_message),
            SessionStatus::LevelComplete => Some(&self.config.complete_message),
        }
    }

    /// Apply a typed key event.
    pub fn handle_key(&mut self, event: KeyEvent) -> Vec<GameEvent> {
        let events = match controls::handle_key(&mut self.state, &self.config.physics, event) {
            KeyOutcome::Restart => self.restart(),
            KeyOutcome::Applied(Some(event)) => vec![event],
            KeyOutcome::Applied(None) | KeyOutcome::Ignored => Vec::new(),
        };
        self.log_events(&events);
        events
    }

    /// Rebuild the level with a fresh layout, keeping the clock running.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        let seed = self.state.next_seed;
        let clock = self.state.clock();
        self.start_level(seed, clock)
    }

    fn start_level(&mut self, seed: u64, clock_origin: f64) -> Vec<GameEvent> {
        match LevelState::generate(&self.config, self.viewport, seed, clock_origin) {
            Ok(state) => {
                let debug = self.state.debug;
                self.state = state;
                self.state.debug = debug;
                self.accumulator = 0.0;
                tracing::info!(
                    "Generated {} with seed {seed}: {} platforms, {} coins",
                    self.config.name,
                    self.state.level.platforms.len(),
                    self.state.level.coins.len()
                );
                vec![GameEvent::LevelGenerated {
                    seed,
                    platforms: self.state.level.platforms.len(),
                }]
            },
            Err(e) => {
                tracing::error!("Level generation failed for seed {seed}: {e}");
                Vec::new()
            },
        }
    }

    fn log_events(&self, events: &[GameEvent]) {
        for event in events {
            if let Some(cue) = event.sound_cue() {
                tracing::debug!("Sound cue: {}", cue.name());
            }
            if self.state.debug.debug_log {
                tracing::debug!("{event:?}");
            }
        }
    }
}

impl SkyJumpGame for SkyJumpCity {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: self.config.name.clone(),
            description: "Run and jump across the rooftops to reach the flag!".to_string(),
        }
    }

    fn init(&mut self, config: &GameConfig) -> Vec<GameEvent> {
        self.viewport = config.viewport;
        self.paused = false;
        let seed = config.seed.unwrap_or_else(rand::random);
        let clock_origin = config.clock_origin.unwrap_or_else(unix_seconds);
        let events = self.start_level(seed, clock_origin);
        self.log_events(&events);
        events
    }

    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        if self.paused || self.state.is_terminal() || !dt.is_finite() || dt <= 0.0 {
            return Vec::new();
        }

        self.accumulator += dt;
        let mut events = Vec::new();
        let mut frames = 0;
        while self.accumulator >= FRAME_DT && frames < MAX_FRAMES_PER_UPDATE {
            self.accumulator -= FRAME_DT;
            frames += 1;
            events.extend(physics::step_frame(
                &mut self.state,
                &self.config,
                self.viewport.width,
            ));
            if self.state.debug.debug_mode {
                tracing::trace!(snapshot = ?self.state.debug_snapshot(), "frame");
            }
            if self.state.is_terminal() {
                self.accumulator = 0.0;
                break;
            }
        }
        if frames == MAX_FRAMES_PER_UPDATE {
            self.accumulator = self.accumulator.min(FRAME_DT);
        }

        self.log_events(&events);
        events
    }

    skyjump_game_boilerplate!(state_type: LevelState);

    fn apply_input(&mut self, input: &[u8]) -> Vec<GameEvent> {
        match rmp_serde::from_slice::<KeyEvent>(input) {
            Ok(event) => self.handle_key(event),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A base-level session on seed 42 with the clock at zero.
    pub fn playing_state() -> LevelState {
        LevelState::generate(&LevelConfig::base(), Viewport::default(), 42, 0.0).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyjump_core::input::Key;
    use skyjump_core::test_helpers::{
        assert_game_state_changed, default_config, encode_key, run_game_ticks,
    };

    const DT: f32 = 1.0 / 60.0;

    fn started(preset: LevelPreset, seed: u64) -> SkyJumpCity {
        let mut game = SkyJumpCity::from_preset(preset).unwrap();
        game.init(&default_config(seed));
        game
    }

    #[test]
    fn init_generates_level() {
        let mut game = SkyJumpCity::from_preset(LevelPreset::Base).unwrap();
        let events = game.init(&default_config(7));
        assert_eq!(
            events,
            vec![GameEvent::LevelGenerated {
                seed: 7,
                platforms: 9
            }]
        );
        assert_eq!(game.state.status, SessionStatus::Playing);
        assert_eq!(game.state.player.on_platform, Some(0));
        assert_eq!((game.state.player.x, game.state.player.y), (50.0, 50.0));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = LevelConfig::base();
        cfg.physics.gravity = 0.0;
        assert!(matches!(
            SkyJumpCity::try_new(cfg),
            Err(LevelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn idle_player_stays_on_start_platform() {
        for preset in [LevelPreset::Base, LevelPreset::Extended] {
            let mut game = started(preset, 3);
            let spawn_y = game.state.player.y;
            let events = run_game_ticks(&mut game, 300, DT);
            assert!(events.is_empty(), "{preset:?}: unexpected {events:?}");
            assert_eq!(game.state.player.y, spawn_y);
            assert_eq!(game.state.player.on_platform, Some(0));
            assert_eq!(game.state.frame, 300);
        }
    }

    #[test]
    fn extended_grace_window_counts_down() {
        let mut game = started(LevelPreset::Extended, 3);
        assert_eq!(game.state.grace_frames_left, 10);
        run_game_ticks(&mut game, 4, DT);
        assert_eq!(game.state.grace_frames_left, 6);
        run_game_ticks(&mut game, 20, DT);
        assert_eq!(game.state.grace_frames_left, 0);
    }

    #[test]
    fn jump_leaves_and_lands_on_start_platform() {
        let mut game = started(LevelPreset::Base, 3);
        let events = game.handle_key(KeyEvent::down(Key::Space));
        assert_eq!(events, vec![GameEvent::Jumped { velocity: 15.0 }]);

        let events = run_game_ticks(&mut game, 120, DT);
        assert_eq!(events.first(), Some(&GameEvent::Landed { platform: 0 }));
        assert_eq!(game.state.player.y, 50.0);
        assert!(!game.state.player.jumping);
    }

    #[test]
    fn walking_moves_player_and_camera_clamps() {
        let mut game = started(LevelPreset::Base, 3);
        game.handle_key(KeyEvent::down(Key::ArrowRight));
        run_game_ticks(&mut game, 10, DT);
        assert_eq!(game.state.player.x, 100.0);
        assert_eq!(game.state.camera_x, 0.0, "camera stays clamped near the start");

        game.handle_key(KeyEvent::up(Key::ArrowRight));
        run_game_ticks(&mut game, 5, DT);
        assert_eq!(game.state.player.x, 100.0);
    }

    #[test]
    fn base_game_over_once_below_threshold() {
        let mut game = started(LevelPreset::Base, 3);
        game.state.player.on_platform = None;
        game.state.player.x = 400.0;
        game.state.player.y = -100.0;
        let events = game.update(DT);
        assert_eq!(events, vec![GameEvent::GameOver]);
        assert!(game.is_round_complete());
        assert_eq!(game.message(), Some("Game Over! Try Again"));
        assert!(run_game_ticks(&mut game, 30, DT).is_empty());
    }

    #[test]
    fn extended_threshold_is_deeper() {
        let mut game = started(LevelPreset::Extended, 3);
        run_game_ticks(&mut game, 10, DT);
        game.state.player.on_platform = None;
        game.state.player.x = 2000.0;
        game.state.player.y = -150.0;
        game.state.player.vy = 0.0;
        let events = game.update(DT);
        assert!(!events.contains(&GameEvent::GameOver));

        game.state.player.y = -200.0;
        assert_eq!(game.update(DT), vec![GameEvent::GameOver]);
    }

    #[test]
    fn no_game_over_during_grace_window() {
        let mut game = started(LevelPreset::Extended, 3);
        game.state.player.y = -500.0;
        game.state.player.on_platform = None;
        let events = run_game_ticks(&mut game, 5, DT);
        assert!(events.is_empty());
        assert_eq!(game.state.status, SessionStatus::Playing);
    }

    #[test]
    fn reaching_goal_completes_level_once() {
        let mut game = started(LevelPreset::Extended, 5);
        let goal = game.state.level.goal.unwrap();
        game.state.grace_frames_left = 0;
        game.state.player.on_platform = None;
        game.state.player.x = goal.x;
        game.state.player.y = goal.y + 10.0;
        let events = game.update(DT);
        assert!(events.contains(&GameEvent::LevelComplete));
        assert_eq!(game.state.status, SessionStatus::LevelComplete);
        assert_eq!(game.message(), Some("Level 2 Complete!"));

        let frozen = game.serialize_state();
        assert!(run_game_ticks(&mut game, 60, DT).is_empty());
        assert_eq!(frozen, game.serialize_state());
    }

    #[test]
    fn missing_goal_is_skipped() {
        let mut game = started(LevelPreset::Base, 5);
        game.state.level.goal = None;
        run_game_ticks(&mut game, 10, DT);
        assert_eq!(game.state.status, SessionStatus::Playing);
    }

    #[test]
    fn coin_pickup_scores_configured_points() {
        let mut game = started(LevelPreset::Extended, 5);
        let (x, y) = (game.state.player.x, game.state.player.y);
        let coin = &mut game.state.level.coins[0];
        coin.x = x;
        coin.y = y + 10.0;
        let before = game.serialize_state();
        let events = game.update(DT);
        assert_game_state_changed(&game, &before);
        assert!(events.contains(&GameEvent::CoinCollected { coin: 0, score: 2 }));
        assert_eq!(game.result().coins_collected, 1);
        assert_eq!(game.result().score, 2);
    }

    #[test]
    fn terminal_space_restarts_with_new_layout() {
        let mut game = started(LevelPreset::Base, 11);
        let before = game.state.level.platforms.clone();
        let next_seed = game.state.next_seed;
        game.state.status = SessionStatus::GameOver;

        let events = game.handle_key(KeyEvent::down(Key::Space));
        assert_eq!(
            events,
            vec![GameEvent::LevelGenerated {
                seed: next_seed,
                platforms: 9
            }]
        );
        assert_eq!(game.state.status, SessionStatus::Playing);
        assert_eq!(game.state.score, 0);
        assert_ne!(game.state.level.platforms, before);
    }

    #[test]
    fn restart_keeps_debug_flags() {
        let mut game = started(LevelPreset::Base, 11);
        game.handle_key(KeyEvent::down(Key::ToggleDebug));
        game.handle_key(KeyEvent::down(Key::Reset));
        assert!(game.state.debug.debug_mode);
    }

    #[test]
    fn same_seed_same_session() {
        let a = started(LevelPreset::Extended, 99);
        let b = started(LevelPreset::Extended, 99);
        assert_eq!(a.serialize_state(), b.serialize_state());
    }

    #[test]
    fn accumulator_runs_whole_frames() {
        let mut game = started(LevelPreset::Base, 1);
        game.update(DT / 2.0);
        assert_eq!(game.state.frame, 0);
        game.update(DT / 2.0);
        assert_eq!(game.state.frame, 1);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut game = started(LevelPreset::Base, 1);
        game.update(10.0);
        assert_eq!(game.state.frame, u64::from(MAX_FRAMES_PER_UPDATE));
        game.update(DT);
        assert!(game.state.frame <= u64::from(MAX_FRAMES_PER_UPDATE) + 2);
    }

    #[test]
    fn bad_dt_ignored() {
        let mut game = started(LevelPreset::Base, 1);
        let before = game.serialize_state();
        game.update(f32::NAN);
        game.update(-1.0);
        game.update(0.0);
        assert_eq!(before, game.serialize_state());
    }

    #[test]
    fn garbage_input_ignored() {
        let mut game = started(LevelPreset::Base, 1);
        let before = game.serialize_state();
        let events = game.apply_input(&[0xFF, 0xFE, 0x00, 0x01]);
        assert!(events.is_empty());
        assert_eq!(before, game.serialize_state());
    }

    #[test]
    fn encoded_jump_input() {
        let mut game = started(LevelPreset::Base, 1);
        let events = game.apply_input(&encode_key(KeyEvent::down(Key::Space)));
        assert_eq!(events, vec![GameEvent::Jumped { velocity: 15.0 }]);
    }

    #[test]
    fn truncated_state_ignored() {
        let mut game = started(LevelPreset::Base, 1);
        let state = game.serialize_state();
        game.apply_state(&state[..state.len() / 2]);
        assert_eq!(state, game.serialize_state());
    }

    #[test]
    fn double_pause_single_resume_works() {
        let mut game = started(LevelPreset::Base, 1);
        game.pause();
        game.pause();
        game.resume();
        game.update(DT);
        assert_eq!(game.state.frame, 1);
    }

    #[test]
    fn debug_snapshot_reflects_player() {
        let mut game = started(LevelPreset::Extended, 1);
        skyjump_core::test_helpers::run_game_ticks(&mut game, 3, DT);
        let snap = game.state.debug_snapshot();
        assert_eq!(snap.frame, 3);
        assert_eq!(snap.on_platform, Some(0));
        assert_eq!(snap.platforms, game.state.level.platforms.len());
        assert_eq!(snap.super_jump_left, None);
    }

    #[test]
    fn metadata_uses_level_name() {
        let game = SkyJumpCity::from_preset(LevelPreset::Extended).unwrap();
        assert_eq!(game.metadata().name, "SkyJump City: Night");
    }

    #[test]
    fn frame_rate_matches_fixed_step() {
        let game = SkyJumpCity::from_preset(LevelPreset::Base).unwrap();
        assert_eq!(1.0 / game.frame_rate(), FRAME_DT);
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================

    #[test]
    fn contract_init_creates_state() {
        let mut game = SkyJumpCity::from_preset(LevelPreset::Base).unwrap();
        skyjump_core::test_helpers::contract_init_creates_state(&mut game, 5);
    }

    #[test]
    fn contract_apply_input_changes_state() {
        let mut game = started(LevelPreset::Base, 5);
        let data = encode_key(KeyEvent::down(Key::ArrowRight));
        skyjump_core::test_helpers::contract_apply_input_changes_state(&mut game, &data);
    }

    #[test]
    fn contract_update_advances_time() {
        let mut game = started(LevelPreset::Extended, 5);
        skyjump_core::test_helpers::contract_update_advances_time(&mut game);
    }

    #[test]
    fn contract_state_roundtrip_preserves() {
        let mut game = started(LevelPreset::Extended, 5);
        run_game_ticks(&mut game, 30, DT);
        skyjump_core::test_helpers::contract_state_roundtrip_preserves(&mut game);
    }

    #[test]
    fn contract_pause_stops_updates() {
        let mut game = started(LevelPreset::Base, 5);
        skyjump_core::test_helpers::contract_pause_stops_updates(&mut game);
    }

    #[test]
    fn contract_terminal_state_is_frozen() {
        let mut game = started(LevelPreset::Base, 5);
        game.state.status = SessionStatus::GameOver;
        skyjump_core::test_helpers::contract_terminal_state_is_frozen(&mut game);
    }
}
