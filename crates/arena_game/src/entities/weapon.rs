//! Melee weapons and their swing state machine
//!
//! A weapon rests until asked to attack, sweeps out to its arc at the swing
//! rate, sweeps back at the return rate and rests again. Its hitboxes follow
//! the blade and exist only while it is moving.

use arena_engine::debug::{Color, DrawSurface};
use arena_engine::foundation::math::{utils, Point2};
use arena_engine::physics::{Circle, Collidable, CollisionShape, CollisionState};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::WeaponProfile;
use crate::direction::Direction;
use crate::entities::{EntityId, FrameContext, Shape};

/// Weapon kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// The player's sword: long chain of small hitboxes
    Sword,
    /// A single wide hitbox close to the wielder
    Claw,
    /// Shorter sword carried by armed enemies
    EnemySword,
}

impl WeaponKind {
    /// True for weapons that damage enemies
    pub fn is_player_weapon(self) -> bool {
        matches!(self, Self::Sword)
    }
}

/// Swing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponState {
    /// Idle, no hitboxes
    #[default]
    Resting,
    /// Sweeping out towards the full arc
    Swinging,
    /// Sweeping back towards rest
    ReturnSwinging,
}

impl WeaponState {
    /// True while the blade is moving and can hit
    pub fn is_swinging(self) -> bool {
        !matches!(self, Self::Resting)
    }
}

/// A melee weapon, optionally held by a wielder
#[derive(Debug, Clone)]
pub struct Weapon {
    id: EntityId,
    kind: WeaponKind,
    profile: WeaponProfile,
    state: WeaponState,
    angle: f32,
    wielder: Option<EntityId>,
    hitboxes: Vec<Shape>,
    collisions: CollisionState<EntityId>,
}

impl Weapon {
    /// Create an unwielded, resting weapon
    pub fn new(id: EntityId, kind: WeaponKind, profile: WeaponProfile) -> Self {
        Self {
            id,
            kind,
            profile,
            state: WeaponState::Resting,
            angle: 0.0,
            wielder: None,
            hitboxes: Vec::new(),
            collisions: CollisionState::new(),
        }
    }

    /// Weapon id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Weapon kind
    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Current swing phase
    pub fn state(&self) -> WeaponState {
        self.state
    }

    /// Degrees swept so far, between 0 and the profile's arc
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Entity holding the weapon
    pub fn wielder(&self) -> Option<EntityId> {
        self.wielder
    }

    /// Swing profile
    pub fn profile(&self) -> &WeaponProfile {
        &self.profile
    }

    /// Hand the weapon to `wielder`, creating its hitboxes
    pub fn attach(&mut self, wielder: EntityId) {
        let id = self.id;
        let radius = self.profile.hitbox_radius;
        self.wielder = Some(wielder);
        self.hitboxes = (0..self.profile.hitbox_count)
            .map(|_| CollisionShape::new_circle(id, Circle::new(Point2::origin(), radius)))
            .collect();
    }

    /// Drop the weapon: no wielder, no hitboxes, back to rest
    pub fn detach(&mut self) {
        self.wielder = None;
        self.hitboxes.clear();
        self.collisions.clear();
        self.state = WeaponState::Resting;
        self.angle = 0.0;
    }

    /// Start a swing; only accepted while resting and wielded
    pub fn attack(&mut self) -> bool {
        if self.state != WeaponState::Resting || self.wielder.is_none() {
            return false;
        }
        self.state = WeaponState::Swinging;
        self.angle = 0.0;
        debug!("{:?} {:?} starts swinging", self.kind, self.id);
        true
    }

    /// Advance the swing by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        match self.state {
            WeaponState::Resting => {}
            WeaponState::Swinging => {
                self.angle += self.profile.swing_rate * dt;
                if self.angle >= self.profile.arc_degrees {
                    self.angle = self.profile.arc_degrees;
                    self.state = WeaponState::ReturnSwinging;
                }
            }
            WeaponState::ReturnSwinging => {
                self.angle -= self.profile.return_rate * dt;
                if self.angle <= 0.0 {
                    self.angle = 0.0;
                    self.state = WeaponState::Resting;
                    trace!("{:?} {:?} back at rest", self.kind, self.id);
                }
            }
        }
    }

    /// Screen angle of the blade for a wielder facing `facing`
    ///
    /// Sweeps from `facing + arc/2` towards `facing - arc/2`.
    pub fn blade_angle(&self, facing: Direction) -> f32 {
        let facing = facing.angle_degrees().unwrap_or(270.0);
        facing + self.profile.arc_degrees / 2.0 - self.angle
    }

    /// Move the hitboxes along the blade of a wielder at `center`
    pub fn place_hitboxes(&mut self, center: Point2, facing: Direction, wielder_radius: f32) {
        let direction = utils::screen_direction(self.blade_angle(facing));
        let base = wielder_radius + self.profile.reach_offset;
        let spacing = self.profile.hitbox_spacing;
        for (index, hitbox) in self.hitboxes.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let distance = base + index as f32 * spacing;
            hitbox.set_location(center + direction * distance);
        }
    }

    /// All hitboxes, including while resting
    pub fn hitboxes(&self) -> &[Shape] {
        &self.hitboxes
    }

    /// Advance the swing and follow the wielder
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, surface: &mut dyn DrawSurface) {
        let Some(wielder) = self.wielder else {
            return;
        };
        let Some(snapshot) = ctx.snapshot(wielder).copied() else {
            debug!("{:?} lost its wielder {:?}", self.id, wielder);
            self.detach();
            return;
        };

        self.advance(ctx.dt);
        self.place_hitboxes(snapshot.position, snapshot.facing, snapshot.radius);

        if self.state.is_swinging() {
            self.draw(snapshot.position, surface, ctx.config.debug_draw);
        }
    }

    fn draw(&self, center: Point2, surface: &mut dyn DrawSurface, debug_draw: bool) {
        if let Some(tip) = self.hitboxes.last() {
            surface.draw_straight_line(center, tip.location(), Color::WHITE);
        }
        if debug_draw {
            let color = if self.collisions.is_colliding() { Color::RED } else { Color::YELLOW };
            for hitbox in &self.hitboxes {
                surface.draw_arc(hitbox.location(), self.profile.hitbox_radius, 0.0, 360.0, color, None);
            }
        }
    }
}

impl Collidable<EntityId> for Weapon {
    fn collision_owner(&self) -> EntityId {
        self.id
    }

    fn collision_shapes(&self) -> &[Shape] {
        if self.state.is_swinging() {
            &self.hitboxes
        } else {
            &[]
        }
    }

    fn collision_state_mut(&mut self) -> &mut CollisionState<EntityId> {
        &mut self.collisions
    }

    fn collision_state(&self) -> &CollisionState<EntityId> {
        &self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeaponsConfig;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn ids() -> (EntityId, EntityId) {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        (arena.insert(()), arena.insert(()))
    }

    fn sword() -> Weapon {
        let (id, wielder) = ids();
        let mut weapon = Weapon::new(id, WeaponKind::Sword, WeaponsConfig::default().sword);
        weapon.attach(wielder);
        weapon
    }

    #[test]
    fn test_attack_accepted_only_while_resting() {
        let mut weapon = sword();
        assert!(weapon.attack());
        assert_eq!(weapon.state(), WeaponState::Swinging);
        assert!(!weapon.attack());

        weapon.advance(1.0);
        assert_eq!(weapon.state(), WeaponState::ReturnSwinging);
        assert!(!weapon.attack());
    }

    #[test]
    fn test_unwielded_weapon_ignores_attack() {
        let (id, _) = ids();
        let mut weapon = Weapon::new(id, WeaponKind::Claw, WeaponsConfig::default().claw);
        assert!(!weapon.attack());
        assert_eq!(weapon.state(), WeaponState::Resting);
    }

    #[test]
    fn test_swing_is_strictly_monotone_and_returns_to_rest() {
        let mut weapon = sword();
        let arc = weapon.profile().arc_degrees;
        weapon.attack();

        let dt = 1.0 / 60.0;
        let mut last = weapon.angle();
        let mut frames = 0;
        while weapon.state() == WeaponState::Swinging {
            weapon.advance(dt);
            assert!(weapon.angle() > last);
            assert!(weapon.angle() <= arc);
            last = weapon.angle();
            frames += 1;
            assert!(frames < 1000);
        }
        assert_relative_eq!(weapon.angle(), arc);

        while weapon.state() == WeaponState::ReturnSwinging {
            weapon.advance(dt);
            assert!(weapon.angle() < last);
            assert!(weapon.angle() >= 0.0);
            last = weapon.angle();
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(weapon.state(), WeaponState::Resting);
        assert_relative_eq!(weapon.angle(), 0.0);
        assert!(weapon.attack());
    }

    #[test]
    fn test_hitboxes_only_collide_while_swinging() {
        let mut weapon = sword();
        assert_eq!(weapon.hitboxes().len(), 4);
        assert!(weapon.collision_shapes().is_empty());
        weapon.attack();
        assert_eq!(weapon.collision_shapes().len(), 4);
    }

    #[test]
    fn test_hitboxes_follow_blade_from_leading_edge() {
        let mut weapon = sword();
        weapon.attack();
        let center = Point2::new(100.0, 100.0);

        // Facing right, angle 0: blade points at +67.5°, up and to the right
        weapon.place_hitboxes(center, Direction::Right, 28.0);
        assert_relative_eq!(weapon.blade_angle(Direction::Right), 67.5);
        let first = weapon.hitboxes()[0].location();
        let last = weapon.hitboxes()[3].location();
        assert!(first.x > center.x && first.y < center.y);
        assert_relative_eq!((first - center).norm(), 36.0, epsilon = 1e-4);
        assert_relative_eq!((last - center).norm(), 66.0, epsilon = 1e-4);

        // Fully swung: -67.5°, down and to the right
        weapon.advance(1.0);
        weapon.place_hitboxes(center, Direction::Right, 28.0);
        let first = weapon.hitboxes()[0].location();
        assert!(first.x > center.x && first.y > center.y);
    }

    #[test]
    fn test_detach_clears_hitboxes_and_wielder() {
        let mut weapon = sword();
        weapon.attack();
        weapon.detach();
        assert!(weapon.wielder().is_none());
        assert!(weapon.hitboxes().is_empty());
        assert_eq!(weapon.state(), WeaponState::Resting);
        assert!(!weapon.attack());
    }

    #[test]
    fn test_only_sword_hurts_enemies() {
        assert!(WeaponKind::Sword.is_player_weapon());
        assert!(!WeaponKind::Claw.is_player_weapon());
        assert!(!WeaponKind::EnemySword.is_player_weapon());
    }
}
