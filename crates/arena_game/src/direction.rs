//! Eight-way facing and movement directions

use arena_engine::foundation::math::{utils, Vec2};

/// Eight compass directions plus "not moving"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Towards the top of the screen
    Up,
    /// Up and to the right
    UpRight,
    /// Towards the right of the screen
    Right,
    /// Down and to the right
    DownRight,
    /// Towards the bottom of the screen
    Down,
    /// Down and to the left
    DownLeft,
    /// Towards the left of the screen
    Left,
    /// Up and to the left
    UpLeft,
    /// No direction
    #[default]
    None,
}

impl Direction {
    /// Derive a direction from the four directional keys
    ///
    /// An axis contributes only when exactly one of its keys is held, so
    /// opposite keys cancel each other and all four held yields `None`.
    pub fn from_pressed(up: bool, down: bool, left: bool, right: bool) -> Self {
        let vertical = match (up, down) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        let horizontal = match (left, right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };

        match (horizontal, vertical) {
            (0, -1) => Self::Up,
            (1, -1) => Self::UpRight,
            (1, 0) => Self::Right,
            (1, 1) => Self::DownRight,
            (0, 1) => Self::Down,
            (-1, 1) => Self::DownLeft,
            (-1, 0) => Self::Left,
            (-1, -1) => Self::UpLeft,
            _ => Self::None,
        }
    }

    /// Quantize an angle into one of eight 45° sectors
    ///
    /// Sector boundaries sit at odd multiples of 22.5°; an angle exactly on
    /// a boundary belongs to the sector counter-clockwise of it.
    pub fn from_angle(degrees: f32) -> Self {
        const SECTORS: [Direction; 8] = [
            Direction::Right,
            Direction::UpRight,
            Direction::Up,
            Direction::UpLeft,
            Direction::Left,
            Direction::DownLeft,
            Direction::Down,
            Direction::DownRight,
        ];
        if !degrees.is_finite() {
            return Self::None;
        }
        let shifted = utils::wrap_degrees(degrees + 22.5);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let sector = (shifted / 45.0).floor() as usize % 8;
        SECTORS[sector]
    }

    /// Screen angle of the direction in degrees (Right = 0, Up = 90)
    pub fn angle_degrees(self) -> Option<f32> {
        match self {
            Self::Right => Some(0.0),
            Self::UpRight => Some(45.0),
            Self::Up => Some(90.0),
            Self::UpLeft => Some(135.0),
            Self::Left => Some(180.0),
            Self::DownLeft => Some(225.0),
            Self::Down => Some(270.0),
            Self::DownRight => Some(315.0),
            Self::None => None,
        }
    }

    /// Screen-space unit vector, zero for `None`
    pub fn unit_vector(self) -> Vec2 {
        self.angle_degrees()
            .map_or_else(Vec2::zeros, utils::screen_direction)
    }

    /// True for every direction except `None`
    pub fn is_moving(self) -> bool {
        self != Self::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_key_gives_cardinal() {
        assert_eq!(Direction::from_pressed(true, false, false, false), Direction::Up);
        assert_eq!(Direction::from_pressed(false, true, false, false), Direction::Down);
        assert_eq!(Direction::from_pressed(false, false, true, false), Direction::Left);
        assert_eq!(Direction::from_pressed(false, false, false, true), Direction::Right);
    }

    #[test]
    fn test_adjacent_keys_give_diagonal() {
        assert_eq!(Direction::from_pressed(true, false, false, true), Direction::UpRight);
        assert_eq!(Direction::from_pressed(true, false, true, false), Direction::UpLeft);
        assert_eq!(Direction::from_pressed(false, true, false, true), Direction::DownRight);
        assert_eq!(Direction::from_pressed(false, true, true, false), Direction::DownLeft);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        assert_eq!(Direction::from_pressed(true, true, false, false), Direction::None);
        assert_eq!(Direction::from_pressed(false, false, true, true), Direction::None);
        assert_eq!(Direction::from_pressed(true, true, true, false), Direction::Left);
        assert_eq!(Direction::from_pressed(true, false, true, true), Direction::Up);
        assert_eq!(Direction::from_pressed(true, true, true, true), Direction::None);
        assert_eq!(Direction::from_pressed(false, false, false, false), Direction::None);
    }

    #[test]
    fn test_angle_quantization() {
        assert_eq!(Direction::from_angle(0.0), Direction::Right);
        assert_eq!(Direction::from_angle(22.4), Direction::Right);
        assert_eq!(Direction::from_angle(22.6), Direction::UpRight);
        assert_eq!(Direction::from_angle(90.0), Direction::Up);
        assert_eq!(Direction::from_angle(-22.4), Direction::Right);
        assert_eq!(Direction::from_angle(-22.6), Direction::DownRight);
        assert_eq!(Direction::from_angle(-90.0), Direction::Down);
        assert_eq!(Direction::from_angle(180.0), Direction::Left);
        assert_eq!(Direction::from_angle(-180.0), Direction::Left);
        assert_eq!(Direction::from_angle(200.0), Direction::Left);
        assert_eq!(Direction::from_angle(-135.0), Direction::DownLeft);
        assert_eq!(Direction::from_angle(f32::NAN), Direction::None);
    }

    #[test]
    fn test_angle_round_trip_for_every_direction() {
        for direction in [
            Direction::Up,
            Direction::UpRight,
            Direction::Right,
            Direction::DownRight,
            Direction::Down,
            Direction::DownLeft,
            Direction::Left,
            Direction::UpLeft,
        ] {
            let angle = direction.angle_degrees().unwrap();
            assert_eq!(Direction::from_angle(angle), direction);
        }
    }

    #[test]
    fn test_unit_vectors() {
        assert_relative_eq!(Direction::Up.unit_vector(), Vec2::new(0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(Direction::Right.unit_vector(), Vec2::new(1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(Direction::DownLeft.unit_vector().norm(), 1.0, epsilon = 1e-6);
        assert_eq!(Direction::None.unit_vector(), Vec2::zeros());
    }
}
