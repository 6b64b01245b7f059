use serde::{Deserialize, Serialize};
use skyjump_core::events::GameEvent;
use skyjump_core::input::{Key, KeyEvent};

use crate::LevelState;
use crate::config::PhysicsConfig;
use crate::physics::Facing;

/// Diagnostic toggles. They only affect logging; there is no panel UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugFlags {
    pub debug_mode: bool,
    pub debug_log: bool,
    pub test_panel: bool,
}

/// What a key press asks of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Ignored,
    Applied(Option<GameEvent>),
    /// Rebuild the level from scratch.
    Restart,
}

/// Apply one keyboard event to the session.
pub fn handle_key(state: &mut LevelState, physics: &PhysicsConfig, event: KeyEvent) -> KeyOutcome {
    if event.pressed {
        key_down(state, physics, event.key)
    } else {
        key_up(state, event.key)
    }
}

fn key_down(state: &mut LevelState, physics: &PhysicsConfig, key: Key) -> KeyOutcome {
    let terminal = state.is_terminal();
    if terminal && matches!(key, Key::Space | Key::Enter) {
        return KeyOutcome::Restart;
    }

    let player = &mut state.player;
    match key {
        Key::ArrowLeft | Key::ArrowRight | Key::Space | Key::Enter if terminal => KeyOutcome::Ignored,
        Key::ArrowLeft => {
            player.vx = -physics.move_speed;
            player.facing = Facing::Left;
            KeyOutcome::Applied(None)
        },
        Key::ArrowRight => {
            player.vx = physics.move_speed;
            player.facing = Facing::Right;
            KeyOutcome::Applied(None)
        },
        Key::Space if player.is_grounded() && !player.jumping => {
            let velocity = player.jump_velocity(physics);
            player.vy = velocity;
            player.jumping = true;
            player.on_platform = None;
            if player.super_jump.is_some() {
                tracing::debug!("Super jump: vy={velocity}");
            }
            KeyOutcome::Applied(Some(GameEvent::Jumped { velocity }))
        },
        Key::Space | Key::Enter => KeyOutcome::Ignored,
        Key::ToggleDebug => {
            let flags = &mut state.debug;
            flags.debug_mode = !flags.debug_mode;
            if !flags.debug_mode {
                flags.debug_log = false;
            }
            tracing::info!(
                "Debug mode {}",
                if flags.debug_mode { "enabled" } else { "disabled" }
            );
            KeyOutcome::Applied(None)
        },
        Key::ToggleDebugLog => {
            state.debug.debug_log = !state.debug.debug_log;
            KeyOutcome::Applied(None)
        },
        Key::ToggleTestPanel => {
            state.debug.test_panel = !state.debug.test_panel;
            KeyOutcome::Applied(None)
        },
        Key::Reset => {
            tracing::info!("Level reset manually");
            KeyOutcome::Restart
        },
    }
}

fn key_up(state: &mut LevelState, key: Key) -> KeyOutcome {
    if state.is_terminal() {
        return KeyOutcome::Ignored;
    }
    let player = &mut state.player;
    match key {
        Key::ArrowLeft if player.vx < 0.0 => {
            player.vx = 0.0;
            KeyOutcome::Applied(None)
        },
        Key::ArrowRight if player.vx > 0.0 => {
            player.vx = 0.0;
            KeyOutcome::Applied(None)
        },
        _ => KeyOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionStatus;
    use crate::test_support::playing_state;

    #[test]
    fn arrows_set_and_clear_velocity() {
        let mut state = playing_state();
        let physics = PhysicsConfig::default();
        handle_key(&mut state, &physics, KeyEvent::down(Key::ArrowLeft));
        assert_eq!(state.player.vx, -5.0);
        assert_eq!(state.player.facing, Facing::Left);

        // Releasing the other arrow keeps the current direction.
        handle_key(&mut state, &physics, KeyEvent::up(Key::ArrowRight));
        assert_eq!(state.player.vx, -5.0);

        handle_key(&mut state, &physics, KeyEvent::up(Key::ArrowLeft));
        assert_eq!(state.player.vx, 0.0);
    }

    #[test]
    fn jump_only_when_grounded() {
        let mut state = playing_state();
        let physics = PhysicsConfig::default();
        let outcome = handle_key(&mut state, &physics, KeyEvent::down(Key::Space));
        assert_eq!(
            outcome,
            KeyOutcome::Applied(Some(GameEvent::Jumped { velocity: 15.0 }))
        );
        assert!(state.player.jumping);
        assert_eq!(state.player.on_platform, None);

        let again = handle_key(&mut state, &physics, KeyEvent::down(Key::Space));
        assert_eq!(again, KeyOutcome::Ignored);
        assert_eq!(state.player.vy, 15.0);
    }

    #[test]
    fn enter_does_not_jump_while_playing() {
        let mut state = playing_state();
        let physics = PhysicsConfig::default();
        assert_eq!(
            handle_key(&mut state, &physics, KeyEvent::down(Key::Enter)),
            KeyOutcome::Ignored
        );
        assert_eq!(state.player.vy, 0.0);
    }

    #[test]
    fn restart_keys_when_terminal() {
        let physics = PhysicsConfig::default();
        for status in [SessionStatus::GameOver, SessionStatus::LevelComplete] {
            let mut state = playing_state();
            state.status = status;
            assert_eq!(
                handle_key(&mut state, &physics, KeyEvent::down(Key::Space)),
                KeyOutcome::Restart
            );
            assert_eq!(
                handle_key(&mut state, &physics, KeyEvent::down(Key::Enter)),
                KeyOutcome::Restart
            );
            assert_eq!(
                handle_key(&mut state, &physics, KeyEvent::down(Key::ArrowRight)),
                KeyOutcome::Ignored
            );
            assert_eq!(state.player.vx, 0.0);
        }
    }

    #[test]
    fn debug_toggles() {
        let mut state = playing_state();
        let physics = PhysicsConfig::default();
        handle_key(&mut state, &physics, KeyEvent::down(Key::ToggleDebug));
        handle_key(&mut state, &physics, KeyEvent::down(Key::ToggleDebugLog));
        assert!(state.debug.debug_mode && state.debug.debug_log);

        // Turning debug mode off hides the log as well.
        handle_key(&mut state, &physics, KeyEvent::down(Key::ToggleDebug));
        assert_eq!(state.debug, DebugFlags::default());

        handle_key(&mut state, &physics, KeyEvent::down(Key::ToggleTestPanel));
        assert!(state.debug.test_panel);
    }

    #[test]
    fn reset_key_requests_restart() {
        let mut state = playing_state();
        assert_eq!(
            handle_key(&mut state, &PhysicsConfig::default(), KeyEvent::down(Key::Reset)),
            KeyOutcome::Restart
        );
    }
}
