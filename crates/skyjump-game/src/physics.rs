use serde::{Deserialize, Serialize};
use skyjump_core::events::GameEvent;
use skyjump_core::geometry::Aabb;

use crate::camera;
use crate::config::{LevelConfig, PhysicsConfig};
use crate::level_gen::{Coin, Goal, Obstacle, PowerUp};
use crate::platform::Platform;
use crate::powerups::{self, ActivePowerUp};
use crate::{LevelState, SessionStatus};

/// Player width for AABB collision.
pub const PLAYER_WIDTH: f32 = 50.0;
/// Player height for AABB collision.
pub const PLAYER_HEIGHT: f32 = 60.0;
/// Length of one simulation frame in seconds.
pub const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// State of the player. `(x, y)` is the bottom-left corner; velocities are
/// pixels per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
    /// Index of the platform the player stands on. `Some` means grounded.
    pub on_platform: Option<usize>,
    pub jumping: bool,
    pub super_jump: Option<ActivePowerUp>,
}

impl PlayerState {
    pub fn new(spawn_x: f32, spawn_y: f32) -> Self {
        Self {
            x: spawn_x,
            y: spawn_y,
            vx: 0.0,
            vy: 0.0,
            facing: Facing::Right,
            on_platform: None,
            jumping: false,
            super_jump: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn is_grounded(&self) -> bool {
        self.on_platform.is_some()
    }

    /// Jump impulse, boosted while a super jump is active.
    pub fn jump_velocity(&self, physics: &PhysicsConfig) -> f32 {
        if self.super_jump.is_some() {
            physics.jump_power * physics.super_jump_multiplier
        } else {
            physics.jump_power
        }
    }

    fn stand_on(&mut self, platform_y: f32, index: usize) {
        self.y = platform_y;
        self.vy = 0.0;
        self.jumping = false;
        self.on_platform = Some(index);
    }
}

/// Advance the session by one frame. Does nothing once the session ended.
pub fn step_frame(
    state: &mut LevelState,
    config: &LevelConfig,
    viewport_width: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.status != SessionStatus::Playing {
        return events;
    }
    let physics = &config.physics;
    state.frame += 1;
    state.elapsed += f64::from(FRAME_DT);

    if state.grace_frames_left == 0 && state.player.y <= physics.fall_threshold {
        state.status = SessionStatus::GameOver;
        state.player.vx = 0.0;
        state.player.vy = 0.0;
        tracing::info!(
            "Game over at frame {}: fell to y={}",
            state.frame,
            state.player.y
        );
        events.push(GameEvent::GameOver);
        return events;
    }

    if integrate(
        &mut state.player,
        state.level.width,
        physics,
        &mut state.grace_frames_left,
    ) {
        events.push(GameEvent::PowerUpExpired);
    }

    let clock = state.clock_origin + state.elapsed;
    move_platforms(
        &mut state.level.platforms,
        &mut state.player,
        clock,
        physics.land_below,
    );

    events.extend(resolve_platform_contact(
        &mut state.player,
        &state.level.platforms,
        physics,
    ));

    events.extend(collect_coins(
        &state.player,
        &mut state.level.coins,
        config.coin_points,
        &mut state.score,
    ));
    events.extend(bounce_off_obstacles(
        &mut state.player,
        &mut state.level.obstacles,
        physics,
    ));
    events.extend(collect_power_ups(
        &mut state.player,
        &mut state.level.power_ups,
    ));

    match state.level.goal.as_ref() {
        Some(goal) => {
            if reached_goal(&state.player, goal) {
                state.status = SessionStatus::LevelComplete;
                tracing::info!(
                    "{} at frame {} with score {}",
                    config.complete_message,
                    state.frame,
                    state.score
                );
                events.push(GameEvent::LevelComplete);
            }
        },
        None => tracing::error!("Level has no goal, skipping goal check"),
    }

    state.camera_x = camera::follow(
        state.camera_x,
        state.player.x,
        viewport_width,
        state.level.width,
        physics.camera_smoothing,
    );

    events
}

/// Apply gravity (or hold still during the spawn grace window), tick the
/// power-up timer and move by the current velocity. Returns true if a super
/// jump ran out this frame.
pub fn integrate(
    player: &mut PlayerState,
    world_width: f32,
    physics: &PhysicsConfig,
    grace_frames_left: &mut u32,
) -> bool {
    if *grace_frames_left > 0 {
        *grace_frames_left -= 1;
        player.vy = 0.0;
    } else {
        player.vy -= physics.gravity;
    }

    let expired = powerups::tick_power_up(&mut player.super_jump, FRAME_DT);
    if expired {
        tracing::debug!("Super jump expired");
    }

    player.x += player.vx;
    player.y += player.vy;
    player.x = player.x.clamp(0.0, (world_width - PLAYER_WIDTH).max(0.0));
    expired
}

/// Move every platform to its position for `clock` and carry the player
/// along with the one it stands on.
pub fn move_platforms(
    platforms: &mut [Platform],
    player: &mut PlayerState,
    clock: f64,
    carry_tolerance: f32,
) {
    for (i, platform) in platforms.iter_mut().enumerate() {
        if !platform.is_moving() {
            continue;
        }
        let before = platform.bounds();
        let (dx, dy) = platform.update_position(clock);
        let riding = player.on_platform == Some(i)
            && player.bounds().overlaps_x(&before)
            && (player.y - before.y).abs() <= carry_tolerance;
        if riding {
            player.x += dx;
            player.y += dy;
        }
    }
}

/// Decide which platform, if any, the player stands on this frame.
///
/// A player already resting within `stand_tolerance` of a platform top stays
/// there. Otherwise a falling player inside the landing window lands on the
/// highest qualifying platform. Either way the player is pinned to the top
/// with zero vertical velocity.
pub fn resolve_platform_contact(
    player: &mut PlayerState,
    platforms: &[Platform],
    physics: &PhysicsConfig,
) -> Option<GameEvent> {
    let previous = player.on_platform;
    let body = player.bounds();

    let standing = platforms.iter().position(|p| {
        body.overlaps_x(&p.bounds()) && (player.y - p.y).abs() <= physics.stand_tolerance
    });

    let contact = standing.or_else(|| {
        if player.vy > 0.0 {
            return None;
        }
        platforms
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                body.overlaps_x(&p.bounds())
                    && player.y > p.y - physics.land_below
                    && player.y < p.y + physics.land_above
            })
            .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
                Some((_, top)) if top >= p.y => best,
                _ => Some((i, p.y)),
            })
            .map(|(i, _)| i)
    });

    match contact {
        Some(index) => {
            player.stand_on(platforms[index].y, index);
            if previous != Some(index) {
                Some(GameEvent::Landed { platform: index })
            } else {
                None
            }
        },
        None => {
            player.on_platform = None;
            if player.vy < 0.0 {
                player.jumping = true;
            }
            previous.map(|platform| GameEvent::LeftPlatform { platform })
        },
    }
}

/// Collect every uncollected coin the player touches.
pub fn collect_coins(
    player: &PlayerState,
    coins: &mut [Coin],
    points: u32,
    score: &mut u32,
) -> Vec<GameEvent> {
    let body = player.bounds();
    let mut events = Vec::new();
    for (i, coin) in coins.iter_mut().enumerate() {
        if !coin.collected && body.overlaps(&coin.bounds()) {
            coin.collected = true;
            *score += points;
            events.push(GameEvent::CoinCollected {
                coin: i,
                score: *score,
            });
        }
    }
    events
}

/// Bounce the player off obstacles, at most once per approach.
pub fn bounce_off_obstacles(
    player: &mut PlayerState,
    obstacles: &mut [Obstacle],
    physics: &PhysicsConfig,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for (i, obstacle) in obstacles.iter_mut().enumerate() {
        let body = player.bounds();
        let hazard = obstacle.bounds();
        if obstacle.recently_hit {
            let dx = (body.center_x() - hazard.center_x()).abs();
            let dy = (body.center_y() - hazard.center_y()).abs();
            if dx > physics.obstacle_rearm_distance || dy > physics.obstacle_rearm_distance {
                obstacle.recently_hit = false;
            }
        }
        if !obstacle.recently_hit && body.overlaps(&hazard) {
            obstacle.recently_hit = true;
            player.vy = player.vy.max(physics.obstacle_bounce_vy);
            player.vx = if body.center_x() < hazard.center_x() {
                -physics.obstacle_bounce_vx
            } else {
                physics.obstacle_bounce_vx
            };
            events.push(GameEvent::ObstacleHit { obstacle: i });
        }
    }
    events
}

/// Collect touched power-ups, (re)starting the super jump timer.
pub fn collect_power_ups(player: &mut PlayerState, power_ups: &mut [PowerUp]) -> Vec<GameEvent> {
    let body = player.bounds();
    let mut events = Vec::new();
    for (i, power_up) in power_ups.iter_mut().enumerate() {
        if !power_up.collected && body.overlaps(&power_up.bounds()) {
            power_up.collected = true;
            powerups::grant_super_jump(&mut player.super_jump);
            events.push(GameEvent::PowerUpCollected { power_up: i });
        }
    }
    events
}

pub fn reached_goal(player: &PlayerState, goal: &Goal) -> bool {
    player.bounds().overlaps(&goal.bounds())
}
