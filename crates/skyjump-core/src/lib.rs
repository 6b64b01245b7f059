pub mod events;
pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod powerup;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::GameEvent;
    use crate::game_trait::{GameConfig, SkyJumpGame, Viewport};
    use crate::input::KeyEvent;

    /// Create a seeded GameConfig with a fixed clock origin and a 1280x720 viewport.
    pub fn default_config(seed: u64) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            viewport: Viewport::default(),
            clock_origin: Some(0.0),
        }
    }

    /// Encode a key event the way a host forwards it to `apply_input`.
    pub fn encode_key(event: KeyEvent) -> Vec<u8> {
        rmp_serde::to_vec(&event).expect("key event serialization must succeed")
    }

    /// Run N frames of `dt` seconds, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn SkyJumpGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt));
        }
        all_events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn SkyJumpGame, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every SkyJumpGame implementation must pass. Game
    // crates call them from their own #[cfg(test)] modules.

    /// After init(), serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_state(game: &mut dyn SkyJumpGame, seed: u64) {
        game.init(&default_config(seed));
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// apply_input() with valid data followed by update() must change state.
    pub fn contract_apply_input_changes_state(game: &mut dyn SkyJumpGame, valid_input: &[u8]) {
        let before = game.serialize_state();
        game.apply_input(valid_input);
        game.update(0.1);
        let after = game.serialize_state();
        assert_ne!(
            before, after,
            "State must change after apply_input + update"
        );
    }

    /// update() with dt>0 must advance the frame counter.
    pub fn contract_update_advances_time(game: &mut dyn SkyJumpGame) {
        let before = game.serialize_state();
        game.update(0.5);
        let after = game.serialize_state();
        assert_ne!(before, after, "update(dt>0) must advance game state");
    }

    /// serialize_state → apply_state roundtrip must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn SkyJumpGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be unchanged after serialize→apply→serialize"
        );
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn SkyJumpGame) {
        game.pause();
        let before = game.serialize_state();
        game.update(0.5);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(0.5);
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// Once terminal, further updates must not change state.
    pub fn contract_terminal_state_is_frozen(game: &mut dyn SkyJumpGame) {
        assert!(
            game.is_round_complete(),
            "contract requires a game already in a terminal state"
        );
        let before = game.serialize_state();
        let events = run_game_ticks(game, 10, 1.0 / 60.0);
        assert!(events.is_empty(), "No events after the session ended");
        assert_eq!(
            before,
            game.serialize_state(),
            "Terminal state must not change on update"
        );
    }
}
