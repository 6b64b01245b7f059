use serde::{Deserialize, Serialize};
use skyjump_core::geometry::Aabb;

/// Platform thickness in pixels.
pub const PLATFORM_HEIGHT: f32 = 20.0;

/// Horizontal platforms sweep this far right and back.
pub const HORIZONTAL_AMPLITUDE: f32 = 100.0;
/// Seconds for one full horizontal sweep (out and back).
pub const HORIZONTAL_PERIOD: f64 = 8.0;
/// Vertical platforms rise this far and back.
pub const VERTICAL_AMPLITUDE: f32 = 50.0;
/// Seconds for one full vertical sweep.
pub const VERTICAL_PERIOD: f64 = 6.0;

/// How a platform moves over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    Static,
    Horizontal,
    Vertical,
}

/// A platform. The player stands with its feet at `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Rest position; moving platforms oscillate from here.
    pub base_x: f32,
    pub base_y: f32,
    pub width: f32,
    pub movement: Movement,
    /// Current position.
    pub x: f32,
    pub y: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self::with_movement(x, y, width, Movement::Static)
    }

    pub fn with_movement(x: f32, y: f32, width: f32, movement: Movement) -> Self {
        Self {
            base_x: x,
            base_y: y,
            width,
            movement,
            x,
            y,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.movement != Movement::Static
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, PLATFORM_HEIGHT)
    }

    /// Move to the offset for `clock` seconds. Returns how far the platform
    /// moved since the last call, for carrying a rider.
    pub fn update_position(&mut self, clock: f64) -> (f32, f32) {
        let (prev_x, prev_y) = (self.x, self.y);
        match self.movement {
            Movement::Static => {},
            Movement::Horizontal => {
                self.x = self.base_x + triangle_wave(clock, HORIZONTAL_PERIOD) * HORIZONTAL_AMPLITUDE;
            },
            Movement::Vertical => {
                self.y = self.base_y + triangle_wave(clock, VERTICAL_PERIOD) * VERTICAL_AMPLITUDE;
            },
        }
        (self.x - prev_x, self.y - prev_y)
    }
}

/// 0 → 1 → 0 over `period` seconds, linear in both halves.
pub fn triangle_wave(t: f64, period: f64) -> f32 {
    let half = period / 2.0;
    let phase = t.rem_euclid(period);
    let n = if phase < half {
        phase / half
    } else {
        2.0 - phase / half
    };
    n as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_wave_shape() {
        assert_eq!(triangle_wave(0.0, 8.0), 0.0);
        assert!((triangle_wave(2.0, 8.0) - 0.5).abs() < 1e-6);
        assert!((triangle_wave(4.0, 8.0) - 1.0).abs() < 1e-6);
        assert!((triangle_wave(6.0, 8.0) - 0.5).abs() < 1e-6);
        assert!(triangle_wave(8.0, 8.0).abs() < 1e-6);
    }

    #[test]
    fn triangle_wave_handles_large_clock() {
        // Wall-clock origins are ~1.7e9 seconds.
        let t = 1_700_000_000.0 + 3.0;
        let v = triangle_wave(t, 6.0);
        assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn static_platform_never_moves() {
        let mut p = Platform::new(100.0, 50.0, 150.0);
        for i in 0..100 {
            let delta = p.update_position(i as f64 * 0.37);
            assert_eq!(delta, (0.0, 0.0));
        }
        assert_eq!((p.x, p.y), (100.0, 50.0));
    }

    #[test]
    fn horizontal_platform_sweeps_x() {
        let mut p = Platform::with_movement(100.0, 50.0, 150.0, Movement::Horizontal);
        let (dx, dy) = p.update_position(4.0);
        assert!((p.x - 200.0).abs() < 1e-4);
        assert!((dx - 100.0).abs() < 1e-4);
        assert_eq!(dy, 0.0);
        assert_eq!(p.y, 50.0);
    }

    #[test]
    fn vertical_platform_sweeps_y() {
        let mut p = Platform::with_movement(100.0, 50.0, 150.0, Movement::Vertical);
        p.update_position(1.5);
        assert!((p.y - 75.0).abs() < 1e-4);
        let (dx, dy) = p.update_position(3.0);
        assert!((p.y - 100.0).abs() < 1e-4);
        assert!((dy - 25.0).abs() < 1e-4);
        assert_eq!(dx, 0.0);
    }

    #[test]
    fn bounds_use_fixed_height() {
        let p = Platform::new(10.0, 20.0, 30.0);
        assert_eq!(p.bounds(), Aabb::new(10.0, 20.0, 30.0, PLATFORM_HEIGHT));
        assert_eq!(p.right(), 40.0);
    }
}
