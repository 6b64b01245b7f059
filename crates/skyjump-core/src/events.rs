use serde::{Deserialize, Serialize};

/// Events emitted by the simulation during init, input handling and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelGenerated { seed: u64, platforms: usize },
    Jumped { velocity: f32 },
    Landed { platform: usize },
    LeftPlatform { platform: usize },
    CoinCollected { coin: usize, score: u32 },
    ObstacleHit { obstacle: usize },
    PowerUpCollected { power_up: usize },
    PowerUpExpired,
    GameOver,
    LevelComplete,
}

/// Named sound effects. Audio playback is up to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Coin,
    Hit,
    PowerUp,
    Fail,
    Success,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Coin => "coin",
            SoundCue::Hit => "hit",
            SoundCue::PowerUp => "powerup",
            SoundCue::Fail => "fail",
            SoundCue::Success => "success",
        }
    }
}

impl GameEvent {
    /// The sound effect that accompanies this event, if any.
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Jumped { .. } => Some(SoundCue::Jump),
            GameEvent::CoinCollected { .. } => Some(SoundCue::Coin),
            GameEvent::ObstacleHit { .. } => Some(SoundCue::Hit),
            GameEvent::PowerUpCollected { .. } => Some(SoundCue::PowerUp),
            GameEvent::GameOver => Some(SoundCue::Fail),
            GameEvent::LevelComplete => Some(SoundCue::Success),
            GameEvent::LevelGenerated { .. }
            | GameEvent::Landed { .. }
            | GameEvent::LeftPlatform { .. }
            | GameEvent::PowerUpExpired => None,
        }
    }

    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameOver | GameEvent::LevelComplete)
    }
}
