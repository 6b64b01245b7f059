mod script;

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use skyjump_core::game_trait::{GameConfig, SkyJumpGame, Viewport};
use skyjump_game::SkyJumpCity;
use skyjump_game::config::{LevelConfig, LevelPreset};

use script::InputScript;

/// Two minutes of play at 60 frames per second.
const DEFAULT_FRAMES: u64 = 7200;

#[derive(Debug, Clone, PartialEq)]
struct RunOptions {
    preset: LevelPreset,
    seed: Option<u64>,
    frames: u64,
    script: Option<PathBuf>,
    viewport: Viewport,
    clock_origin: Option<f64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            preset: LevelPreset::Base,
            seed: None,
            frames: DEFAULT_FRAMES,
            script: None,
            viewport: Viewport::default(),
            clock_origin: None,
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> RunOptions {
    let mut options = RunOptions::default();
    for arg in args {
        if let Some(v) = arg.strip_prefix("--level=") {
            match LevelPreset::from_name(v) {
                Some(preset) => options.preset = preset,
                None => tracing::warn!("Unknown level {v:?}, using {:?}", options.preset),
            }
        } else if let Some(v) = arg.strip_prefix("--seed=") {
            options.seed = v.parse().ok();
        } else if let Some(v) = arg.strip_prefix("--frames=") {
            options.frames = v.parse().unwrap_or(DEFAULT_FRAMES);
        } else if let Some(v) = arg.strip_prefix("--script=") {
            options.script = Some(PathBuf::from(v));
        } else if let Some(v) = arg.strip_prefix("--viewport=") {
            match parse_viewport(v) {
                Some(viewport) => options.viewport = viewport,
                None => tracing::warn!("Ignoring viewport {v:?}, expected WIDTHxHEIGHT"),
            }
        } else if let Some(v) = arg.strip_prefix("--clock=") {
            options.clock_origin = v.parse().ok();
        } else {
            tracing::warn!("Ignoring unknown argument {arg:?}");
        }
    }
    options
}

fn parse_viewport(s: &str) -> Option<Viewport> {
    let (w, h) = s.split_once('x')?;
    let width: f32 = w.parse().ok()?;
    let height: f32 = h.parse().ok()?;
    (width > 0.0 && height > 0.0).then_some(Viewport { width, height })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args(std::env::args().skip(1));

    let config = LevelConfig::load(options.preset);
    let mut game = match SkyJumpCity::try_new(config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("Cannot start level: {e}");
            std::process::exit(1);
        },
    };

    let script = match &options.script {
        Some(path) => match InputScript::load(path) {
            Ok(script) => script,
            Err(e) => {
                tracing::error!("{e}");
                std::process::exit(1);
            },
        },
        None => InputScript::run_and_jump(options.frames),
    };

    game.init(&GameConfig {
        seed: options.seed,
        viewport: options.viewport,
        clock_origin: options.clock_origin,
    });
    tracing::info!(
        "Running {} for up to {} frames ({} scripted keys)",
        game.metadata().name,
        options.frames,
        script.len()
    );

    let dt = 1.0 / game.frame_rate();
    for frame in 0..options.frames {
        for event in script.at(frame) {
            game.handle_key(event);
        }
        game.update(dt);
        if game.is_round_complete() {
            break;
        }
    }

    if let Some(message) = game.message() {
        tracing::info!("{message}");
    }
    match serde_json::to_string_pretty(&game.result()) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Cannot encode result: {e}"),
    }
}
