use serde::{Deserialize, Serialize};

use skyjump_core::powerup;

/// Seconds a super jump lasts after pickup.
pub const SUPER_JUMP_DURATION: f32 = 10.0;

/// SkyJump power-up types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Boosts the jump impulse until it runs out.
    SuperJump,
}

impl powerup::PowerUpKind for PowerUpKind {
    fn duration(&self) -> f32 {
        match self {
            PowerUpKind::SuperJump => SUPER_JUMP_DURATION,
        }
    }
}

/// Active power-up effect on the player.
pub type ActivePowerUp = powerup::ActivePowerUp<PowerUpKind>;

/// Start a super jump, or restart the countdown if one is already running.
pub fn grant_super_jump(active: &mut Option<ActivePowerUp>) {
    match active {
        Some(pu) => pu.refresh(),
        None => *active = Some(ActivePowerUp::new(PowerUpKind::SuperJump)),
    }
}

/// Count the active power-up down by `dt`. Returns true if it expired.
pub fn tick_power_up(active: &mut Option<ActivePowerUp>, dt: f32) -> bool {
    let Some(pu) = active else {
        return false;
    };
    pu.tick(dt);
    if pu.is_expired() {
        *active = None;
        true
    } else {
        false
    }
}
