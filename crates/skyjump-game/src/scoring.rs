use serde::{Deserialize, Serialize};

use crate::{LevelState, SessionStatus};

/// Outcome of a level session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub status: SessionStatus,
    pub score: u32,
    pub coins_collected: usize,
    pub coins_total: usize,
    pub power_ups_collected: usize,
    pub frames: u64,
    pub seed: u64,
}

impl LevelResult {
    /// Fraction of the level's coins collected, 0 when there were none.
    pub fn coin_ratio(&self) -> f32 {
        if self.coins_total == 0 {
            0.0
        } else {
            self.coins_collected as f32 / self.coins_total as f32
        }
    }
}

/// Summarize a session, finished or not.
pub fn summarize(state: &LevelState) -> LevelResult {
    LevelResult {
        status: state.status,
        score: state.score,
        coins_collected: state.level.coins_collected(),
        coins_total: state.level.coins.len(),
        power_ups_collected: state.level.power_ups_collected(),
        frames: state.frame,
        seed: state.seed,
    }
}
