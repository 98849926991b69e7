//! Math utilities and types
//!
//! Provides the 2D math types used by collision and movement code.
//!
//! Screen space is y-down: `x` grows to the right and `y` grows towards the
//! bottom of the drawing surface. Angles are expressed in degrees with zero
//! pointing right and positive angles turning counter-clockwise *as seen on
//! screen*, so converting an angle to a screen vector negates the sine.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Width/height pair used by boxes and drawing surfaces
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a square size
    pub const fn square(side: f32) -> Self {
        Self { width: side, height: side }
    }

    /// Grow both dimensions by `padding` on every side
    pub fn padded(self, padding: f32) -> Self {
        Self::new(self.width + 2.0 * padding, self.height + 2.0 * padding)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Point2, Vec2};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Wrap an angle in degrees into `[0, 360)`
    pub fn wrap_degrees(degrees: f32) -> f32 {
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= 360.0 {
            0.0
        } else {
            wrapped
        }
    }

    /// Unit vector in screen space for an angle in degrees
    pub fn screen_direction(degrees: f32) -> Vec2 {
        let radians = deg_to_rad(degrees);
        Vec2::new(radians.cos(), -radians.sin())
    }

    /// Screen-space angle in degrees of the vector `from -> to`
    ///
    /// Returns `0.0` when both points coincide.
    pub fn screen_angle_between(from: Point2, to: Point2) -> f32 {
        let delta = to - from;
        if delta.x == 0.0 && delta.y == 0.0 {
            return 0.0;
        }
        rad_to_deg((-delta.y).atan2(delta.x))
    }

    /// Normalize a vector, returning `None` for zero-length input
    pub fn try_normalize(vector: Vec2) -> Option<Vec2> {
        vector.try_normalize(f32::EPSILON)
    }
}
