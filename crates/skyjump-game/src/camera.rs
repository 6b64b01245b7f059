use crate::physics::PLAYER_WIDTH;

/// Ease the horizontal scroll offset toward centering the player, clamped
/// so the view never leaves the world.
pub fn follow(
    offset: f32,
    player_x: f32,
    viewport_width: f32,
    world_width: f32,
    smoothing: f32,
) -> f32 {
    let target = player_x - viewport_width / 2.0 + PLAYER_WIDTH / 2.0;
    let eased = offset + (target - offset) * smoothing;
    let max_offset = (world_width - viewport_width).max(0.0);
    eased.clamp(0.0, max_offset)
}
