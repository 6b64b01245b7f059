use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Environment variable naming an override TOML file.
pub const CONFIG_ENV_VAR: &str = "SKYJUMP_LEVEL_CONFIG";
/// Override file used when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/level.toml";

/// Inclusive-exclusive float range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        self.min + rng.random::<f32>() * (self.max - self.min)
    }

    pub fn len(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }
}

/// Which of the built-in levels to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelPreset {
    /// Level 1: daytime, platforms and coins only.
    Base,
    /// Level 2: night, adds obstacles, power-ups and moving platforms.
    Extended,
}

impl LevelPreset {
    pub fn config(self) -> LevelConfig {
        match self {
            LevelPreset::Base => LevelConfig::base(),
            LevelPreset::Extended => LevelConfig::extended(),
        }
    }

    /// Parse a preset from a CLI-style name (`1`, `2`, `base`, `extended`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "1" | "base" | "level1" => Some(LevelPreset::Base),
            "2" | "extended" | "level2" => Some(LevelPreset::Extended),
            _ => None,
        }
    }
}

/// Decorative body drawn in the sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyBody {
    Sun,
    Moon,
}

/// Where the goal flag goes once the platforms are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalPlacement {
    /// Centered over the last generated platform, `height` above it.
    AboveLastPlatform { height: f32 },
    /// On a dedicated platform `gap` past the rightmost platform's right edge.
    FlagPlatform { gap: f32, width: f32, height: f32 },
}

/// Per-frame physics tuning. Velocities are pixels per frame at 60 Hz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub jump_power: f32,
    pub move_speed: f32,
    /// Jump impulse multiplier while a super jump is active.
    pub super_jump_multiplier: f32,
    /// Maximum distance between feet and platform top that counts as standing.
    pub stand_tolerance: f32,
    /// Landing window below a platform top.
    pub land_below: f32,
    /// Landing window above a platform top.
    pub land_above: f32,
    /// Feet at or below this height end the game.
    pub fall_threshold: f32,
    /// Frames after spawn with gravity disabled.
    pub spawn_grace_frames: u32,
    pub obstacle_bounce_vy: f32,
    pub obstacle_bounce_vx: f32,
    /// Center distance beyond which a hit obstacle can be hit again.
    pub obstacle_rearm_distance: f32,
    /// Fraction of the remaining distance the camera covers per frame.
    pub camera_smoothing: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_power: 15.0,
            move_speed: 5.0,
            super_jump_multiplier: 1.15,
            stand_tolerance: 2.0,
            land_below: 5.0,
            land_above: 15.0,
            fall_threshold: -100.0,
            spawn_grace_frames: 0,
            obstacle_bounce_vy: 8.0,
            obstacle_bounce_vx: 5.0,
            obstacle_rearm_distance: 100.0,
            camera_smoothing: 0.1,
        }
    }
}

/// Starting platform the player spawns on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPlatform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// Procedural layout tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub platform_count: usize,
    pub platform_width: Span,
    pub horizontal_gap: Span,
    pub up_step: Span,
    pub down_step: Span,
    /// Lowest allowed platform y.
    pub min_platform_y: f32,
    /// Platforms stay this far below the top of the world.
    pub top_margin: f32,
    pub start_platform: StartPlatform,
    pub player_spawn_x: f32,
    pub moving_platform_chance: f32,
    pub goal: GoalPlacement,
    pub coin_count: usize,
    pub coin_height: Span,
    pub obstacle_count: usize,
    pub power_up_count: usize,
    pub power_up_height: Span,
    pub cloud_count: usize,
    pub bird_count: usize,
    pub star_count: usize,
    /// Star heights, measured down from the top of the world.
    pub star_height: Span,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            platform_count: 8,
            platform_width: Span::new(80.0, 180.0),
            horizontal_gap: Span::new(80.0, 180.0),
            up_step: Span::new(20.0, 100.0),
            down_step: Span::new(20.0, 120.0),
            min_platform_y: 50.0,
            top_margin: 200.0,
            start_platform: StartPlatform {
                x: 0.0,
                y: 50.0,
                width: 150.0,
            },
            player_spawn_x: 50.0,
            moving_platform_chance: 0.0,
            goal: GoalPlacement::AboveLastPlatform { height: 80.0 },
            coin_count: 5,
            coin_height: Span::new(40.0, 100.0),
            obstacle_count: 0,
            power_up_count: 0,
            power_up_height: Span::new(60.0, 140.0),
            cloud_count: 5,
            bird_count: 3,
            star_count: 8,
            star_height: Span::new(50.0, 250.0),
        }
    }
}

/// World sizing relative to the viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub min_width: f32,
    pub viewport_factor: f32,
    pub sky: SkyBody,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            min_width: 2000.0,
            viewport_factor: 2.0,
            sky: SkyBody::Sun,
        }
    }
}

/// Complete tuning for one level, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    pub complete_message: String,
    pub game_over_message: String,
    pub coin_points: u32,
    pub physics: PhysicsConfig,
    pub generation: GenerationConfig,
    pub world: WorldConfig,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::base()
    }
}

impl LevelConfig {
    /// Level 1 tuning.
    pub fn base() -> Self {
        Self {
            name: "SkyJump City".to_string(),
            complete_message: "Level Complete!".to_string(),
            game_over_message: "Game Over! Try Again".to_string(),
            coin_points: 1,
            physics: PhysicsConfig::default(),
            generation: GenerationConfig::default(),
            world: WorldConfig::default(),
        }
    }

    /// Level 2 tuning: lighter gravity, more platforms, hazards and helpers.
    pub fn extended() -> Self {
        Self {
            name: "SkyJump City: Night".to_string(),
            complete_message: "Level 2 Complete!".to_string(),
            game_over_message: "Game Over! Try Again".to_string(),
            coin_points: 2,
            physics: PhysicsConfig {
                gravity: 0.5,
                jump_power: 15.75,
                move_speed: 6.0,
                fall_threshold: -200.0,
                spawn_grace_frames: 10,
                ..PhysicsConfig::default()
            },
            generation: GenerationConfig {
                platform_count: 15,
                platform_width: Span::new(100.0, 200.0),
                horizontal_gap: Span::new(60.0, 140.0),
                up_step: Span::new(30.0, 120.0),
                down_step: Span::new(30.0, 150.0),
                start_platform: StartPlatform {
                    x: 0.0,
                    y: 100.0,
                    width: 300.0,
                },
                moving_platform_chance: 0.25,
                goal: GoalPlacement::FlagPlatform {
                    gap: 200.0,
                    width: 150.0,
                    height: 80.0,
                },
                coin_count: 10,
                coin_height: Span::new(40.0, 120.0),
                obstacle_count: 3,
                power_up_count: 5,
                star_count: 15,
                star_height: Span::new(50.0, 450.0),
                ..GenerationConfig::default()
            },
            world: WorldConfig {
                min_width: 2500.0,
                viewport_factor: 2.5,
                sky: SkyBody::Moon,
            },
        }
    }

    /// Load overrides for `preset` from the file named by `SKYJUMP_LEVEL_CONFIG`
    /// (default `config/level.toml`). Falls back to the preset if the file is
    /// missing or unparseable.
    pub fn load(preset: LevelPreset) -> Self {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(preset, &content) {
                Ok(cfg) => {
                    tracing::info!("Loaded level overrides from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, using defaults");
                    preset.config()
                },
            },
            Err(_) => preset.config(),
        }
    }

    /// Apply TOML overrides on top of `preset`. Keys absent from the text keep
    /// the preset's values, nested tables merge field by field.
    pub fn from_toml_str(preset: LevelPreset, text: &str) -> Result<Self, LevelError> {
        let overrides: toml::Table =
            toml::from_str(text).map_err(|e| LevelError::ConfigParse(e.to_string()))?;
        let base = toml::Value::try_from(preset.config())
            .map_err(|e| LevelError::ConfigParse(e.to_string()))?;
        let toml::Value::Table(mut merged) = base else {
            return Err(LevelError::ConfigParse(
                "preset did not serialize to a table".to_string(),
            ));
        };
        merge_tables(&mut merged, overrides);
        let cfg: LevelConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| LevelError::ConfigParse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the generator or physics step cannot work with.
    pub fn validate(&self) -> Result<(), LevelError> {
        let g = &self.generation;
        let p = &self.physics;
        if g.platform_width.min <= 0.0 || g.platform_width.is_empty() {
            return Err(LevelError::InvalidConfig(format!(
                "platform_width must be a positive range, got {}..{}",
                g.platform_width.min, g.platform_width.max
            )));
        }
        if g.horizontal_gap.min < 0.0 || g.horizontal_gap.max < g.horizontal_gap.min {
            return Err(LevelError::InvalidConfig(format!(
                "horizontal_gap must be non-negative and ordered, got {}..{}",
                g.horizontal_gap.min, g.horizontal_gap.max
            )));
        }
        if !(0.0..=1.0).contains(&g.moving_platform_chance) {
            return Err(LevelError::InvalidConfig(format!(
                "moving_platform_chance must be within 0..=1, got {}",
                g.moving_platform_chance
            )));
        }
        if !p.gravity.is_finite() || p.gravity <= 0.0 {
            return Err(LevelError::InvalidConfig(format!(
                "gravity must be positive, got {}",
                p.gravity
            )));
        }
        if !(0.0..=1.0).contains(&p.camera_smoothing) {
            return Err(LevelError::InvalidConfig(format!(
                "camera_smoothing must be within 0..=1, got {}",
                p.camera_smoothing
            )));
        }
        if g.start_platform.width <= 0.0 {
            return Err(LevelError::InvalidConfig(
                "start platform must have a positive width".to_string(),
            ));
        }
        Ok(())
    }
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}
