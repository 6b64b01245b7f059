use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use skyjump_core::game_trait::Viewport;
use skyjump_core::geometry::Aabb;

use crate::config::{GoalPlacement, LevelConfig, SkyBody};
use crate::error::LevelError;
use crate::platform::{HORIZONTAL_AMPLITUDE, Movement, Platform};

pub const COIN_SIZE: f32 = 30.0;
pub const POWER_UP_SIZE: f32 = 30.0;
pub const OBSTACLE_SIZE: f32 = 40.0;
pub const GOAL_WIDTH: f32 = 50.0;
pub const GOAL_HEIGHT: f32 = 80.0;

/// Obstacles sit on the platform surface, offset by its thickness.
const OBSTACLE_LIFT: f32 = 20.0;
/// Open space kept past the rightmost platform or goal.
const WORLD_END_MARGIN: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

impl Coin {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, COIN_SIZE, COIN_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

impl PowerUp {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, POWER_UP_SIZE, POWER_UP_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    /// Set on a bounce, cleared once the player moves away.
    pub recently_hit: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, OBSTACLE_SIZE, OBSTACLE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub x: f32,
    pub y: f32,
}

impl Goal {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, GOAL_WIDTH, GOAL_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// A bird or a star. `delay` offsets its animation in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub x: f32,
    pub y: f32,
    pub delay: f32,
}

/// Background decoration. Scenery y values are measured down from the top
/// of the world, unlike gameplay objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    pub sky: SkyBody,
    pub clouds: Vec<Cloud>,
    pub birds: Vec<Decoration>,
    pub stars: Vec<Decoration>,
}

/// A generated level. Index 0 of `platforms` is always the start platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub goal: Option<Goal>,
    pub scenery: Scenery,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl Level {
    pub fn coins_collected(&self) -> usize {
        self.coins.iter().filter(|c| c.collected).count()
    }

    pub fn power_ups_collected(&self) -> usize {
        self.power_ups.iter().filter(|p| p.collected).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Up,
    Down,
    Flat,
}

/// Build a level for `config` sized to `viewport`.
pub fn generate_level(
    config: &LevelConfig,
    viewport: Viewport,
    rng: &mut StdRng,
) -> Result<Level, LevelError> {
    let g = &config.generation;
    let height = viewport.height;

    let start = Platform::new(g.start_platform.x, g.start_platform.y, g.start_platform.width);
    let mut platforms = vec![start];
    generate_platforms(config, height, rng, &mut platforms);

    let coins = (0..g.coin_count)
        .filter_map(|_| {
            let p = pick_platform(rng, &platforms, 1, platforms.len())?;
            Some(Coin {
                x: p.x + rng.random::<f32>() * (p.width - COIN_SIZE),
                y: p.y + g.coin_height.sample(rng),
                collected: false,
            })
        })
        .collect::<Vec<_>>();

    // Obstacles and power-ups avoid both the start and the last platform.
    let inner_end = platforms.len().saturating_sub(1);
    let obstacles = (0..g.obstacle_count)
        .filter_map(|_| {
            let p = pick_platform(rng, &platforms, 1, inner_end)?;
            Some(Obstacle {
                x: p.x + rng.random::<f32>() * (p.width - OBSTACLE_SIZE),
                y: p.y + OBSTACLE_LIFT,
                recently_hit: false,
            })
        })
        .collect::<Vec<_>>();
    let power_ups = (0..g.power_up_count)
        .filter_map(|_| {
            let p = pick_platform(rng, &platforms, 1, inner_end)?;
            Some(PowerUp {
                x: p.x + rng.random::<f32>() * (p.width - POWER_UP_SIZE),
                y: p.y + g.power_up_height.sample(rng),
                collected: false,
            })
        })
        .collect::<Vec<_>>();
    if coins.len() < g.coin_count
        || obstacles.len() < g.obstacle_count
        || power_ups.len() < g.power_up_count
    {
        tracing::debug!(
            "Too few platforms for every pickup: placed {} coins, {} obstacles, {} power-ups",
            coins.len(),
            obstacles.len(),
            power_ups.len()
        );
    }

    let goal = place_goal(g.goal, &mut platforms)?;
    // Long courses widen the world so the goal stays reachable.
    let width = config
        .world
        .min_width
        .max(viewport.width * config.world.viewport_factor)
        .max(content_right(&platforms, &goal) + WORLD_END_MARGIN);
    let scenery = generate_scenery(config, width, height, rng);

    Ok(Level {
        width,
        height,
        spawn_x: g.player_spawn_x,
        spawn_y: g.start_platform.y,
        platforms,
        coins,
        obstacles,
        power_ups,
        goal: Some(goal),
        scenery,
    })
}

fn generate_platforms(
    config: &LevelConfig,
    world_height: f32,
    rng: &mut StdRng,
    platforms: &mut Vec<Platform>,
) {
    let g = &config.generation;
    let ceiling = world_height - g.top_margin;
    let mut last_x = g.start_platform.x + g.start_platform.width;
    let mut last_y = g.start_platform.y;

    for _ in 0..g.platform_count {
        let roll = rng.random::<f32>();
        let step = if roll < 0.4 {
            Step::Up
        } else if roll < 0.8 {
            Step::Down
        } else {
            Step::Flat
        };

        let change = match step {
            Step::Up => g.up_step.sample(rng),
            Step::Down => -g.down_step.sample(rng),
            Step::Flat => 0.0,
        };
        // Climbs get shorter gaps so they stay reachable.
        let gap_scale = match step {
            Step::Up => 0.7,
            Step::Flat => 0.85,
            Step::Down => 1.0,
        };
        let gap = g.horizontal_gap.min + rng.random::<f32>() * g.horizontal_gap.len() * gap_scale;

        // On short worlds the floor wins over the ceiling.
        let y = (last_y + change).min(ceiling).max(g.min_platform_y);
        let x = last_x + gap;
        let width = g.platform_width.sample(rng);

        let movement =
            if g.moving_platform_chance > 0.0 && rng.random::<f32>() < g.moving_platform_chance {
                if rng.random_bool(0.5) {
                    Movement::Horizontal
                } else {
                    Movement::Vertical
                }
            } else {
                Movement::Static
            };

        platforms.push(Platform::with_movement(x, y, width, movement));
        last_x = x + width;
        last_y = y;
    }
}

/// Rightmost x any platform (at full swing) or the goal reaches.
fn content_right(platforms: &[Platform], goal: &Goal) -> f32 {
    platforms
        .iter()
        .map(|p| match p.movement {
            Movement::Horizontal => p.base_x + p.width + HORIZONTAL_AMPLITUDE,
            Movement::Static | Movement::Vertical => p.base_x + p.width,
        })
        .fold(goal.x + GOAL_WIDTH, f32::max)
}

fn pick_platform<'a>(
    rng: &mut StdRng,
    platforms: &'a [Platform],
    start: usize,
    end: usize,
) -> Option<&'a Platform> {
    if start >= end || end > platforms.len() {
        return None;
    }
    platforms.get(rng.random_range(start..end))
}

fn place_goal(placement: GoalPlacement, platforms: &mut Vec<Platform>) -> Result<Goal, LevelError> {
    match placement {
        GoalPlacement::AboveLastPlatform { height } => {
            let last = platforms.last().ok_or(LevelError::NoPlatforms)?;
            Ok(Goal {
                x: last.base_x + last.width / 2.0 - GOAL_WIDTH / 2.0,
                y: last.base_y + height,
            })
        },
        GoalPlacement::FlagPlatform { gap, width, height } => {
            let end = platforms
                .iter()
                .max_by(|a, b| (a.base_x + a.width).total_cmp(&(b.base_x + b.width)))
                .ok_or(LevelError::NoPlatforms)?;
            let flag_x = end.base_x + end.width + gap;
            let flag_y = end.base_y;
            platforms.push(Platform::new(flag_x, flag_y, width));
            tracing::debug!("Flag platform at x={flag_x}, y={flag_y}, width={width}");
            Ok(Goal {
                x: flag_x + width / 2.0 - GOAL_WIDTH / 2.0,
                y: flag_y + height,
            })
        },
    }
}

fn generate_scenery(config: &LevelConfig, width: f32, height: f32, rng: &mut StdRng) -> Scenery {
    let g = &config.generation;
    let stars = (0..g.star_count)
        .map(|_| Decoration {
            x: rng.random::<f32>() * width,
            y: g.star_height.sample(rng),
            delay: rng.random::<f32>() * 3.0,
        })
        .collect();
    let clouds = (0..g.cloud_count)
        .map(|_| Cloud {
            x: rng.random::<f32>() * width,
            y: rng.random::<f32>() * (height - 100.0).max(0.0) + 300.0,
            scale: rng.random::<f32>() * 0.5 + 0.5,
        })
        .collect();
    let birds = (0..g.bird_count)
        .map(|_| Decoration {
            x: rng.random::<f32>() * width,
            y: rng.random::<f32>() * 300.0 + 200.0,
            delay: rng.random::<f32>() * 5.0,
        })
        .collect();
    Scenery {
        sky: config.world.sky,
        clouds,
        birds,
        stars,
    }
}
