//! Damage bookkeeping and the angle math shared by combat code

use arena_engine::foundation::math::{utils, Point2, Vec2};

/// Hit points of a damageable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Full health
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Remaining hit points
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Starting hit points
    pub fn max(&self) -> u32 {
        self.max
    }

    /// True once health reached zero
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Apply damage; returns true only for the hit that depletes the pool
    pub fn damage(&mut self, amount: u32) -> bool {
        if self.is_depleted() {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        self.is_depleted()
    }
}

/// Direction an attacker's hit pushes its victim, in screen degrees
///
/// Base angle is `atan(-Δy / Δx)` for the attacker→victim delta, corrected
/// by +180° when both deltas are negative and by −180° when Δx < 0 < Δy.
/// A victim straight left of the attacker gets 180° and coincident
/// positions get 0°, so the result is never NaN.
pub fn knockback_angle(attacker: Point2, victim: Point2) -> f32 {
    let dx = victim.x - attacker.x;
    let dy = victim.y - attacker.y;

    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    if dx < 0.0 && dy == 0.0 {
        return 180.0;
    }

    let base = utils::rad_to_deg((-dy / dx).atan());
    if dx < 0.0 && dy < 0.0 {
        base + 180.0
    } else if dx < 0.0 && dy > 0.0 {
        base - 180.0
    } else {
        base
    }
}

/// Unit vector pushing `me` away from every position in `others`
///
/// `None` when the pushes cancel out (or there is nothing to push from).
pub fn repulsion_direction(me: Point2, others: &[Point2]) -> Option<Vec2> {
    let sum = others
        .iter()
        .fold(Vec2::zeros(), |acc, other| acc + (me - other));
    utils::try_normalize(sum)
}
