use serde::{Deserialize, Serialize};

use crate::events::GameEvent;

/// Core trait implemented by a SkyJump level simulation.
///
/// The host (a renderer, the headless runner, or a test) owns the frame
/// clock and the keyboard; the game only handles simulation state.
pub trait SkyJumpGame {
    /// Game metadata for the level selection screen.
    fn metadata(&self) -> GameMetadata;

    /// Build a fresh level and reset the session. Called again on restart.
    fn init(&mut self, config: &GameConfig) -> Vec<GameEvent>;

    /// Advance the simulation by `dt` seconds. Returns the events emitted.
    fn update(&mut self, dt: f32) -> Vec<GameEvent>;

    /// Serialize the full session state (level, player, status).
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the session state with a previously serialized snapshot.
    /// Undecodable bytes leave the state untouched.
    fn apply_state(&mut self, state: &[u8]);

    /// Apply an encoded keyboard event.
    fn apply_input(&mut self, input: &[u8]) -> Vec<GameEvent>;

    /// Simulation frame rate in Hz.
    fn frame_rate(&self) -> f32 {
        60.0
    }

    /// Freeze the simulation (e.g. the page lost focus).
    fn pause(&mut self);

    /// Resume after `pause`.
    fn resume(&mut self);

    /// Whether the session reached a terminal state (game over or level complete).
    fn is_round_complete(&self) -> bool;
}

/// Game metadata for the level selection screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// Size of the visible window in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Configuration for a game session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for level generation. `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
    pub viewport: Viewport,
    /// Clock origin in seconds for time-driven platform movement.
    /// `None` captures the wall clock at init.
    pub clock_origin: Option<f64>,
}

/// Generates the 5 boilerplate `SkyJumpGame` methods shared by every game:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_round_complete`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool` fields,
/// and `$StateType` to provide `fn is_terminal(&self) -> bool`.
#[macro_export]
macro_rules! skyjump_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::warn!("Ignoring undecodable state snapshot: {e}"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_round_complete(&self) -> bool {
            self.state.is_terminal()
        }
    };
}
