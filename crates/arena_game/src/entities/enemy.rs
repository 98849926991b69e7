//! Enemies and their combat state machine
//!
//! Per frame an enemy first consumes its collision results, then advances
//! its damage timers, then runs its chase logic, and only then integrates
//! movement. Getting hit knocks it back for a short window and leaves it
//! invincible for a while longer before it resumes what it was doing.

use arena_engine::debug::{Color, DrawSurface};
use arena_engine::foundation::math::{utils, Point2, Vec2};
use arena_engine::foundation::time::Cooldown;
use arena_engine::physics::{
    Activatable, Circle, Collidable, CollisionShape, CollisionState, ShapeKind,
};
use log::{debug, info, trace};

use crate::combat::{knockback_angle, repulsion_direction, Health};
use crate::config::{CombatConfig, GameConfig};
use crate::direction::Direction;
use crate::entities::{Command, EntityId, EntityKind, EntitySnapshot, FrameContext, Shape};
use crate::events::GameEvent;

/// Combat states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    /// Never moves, can still be hit
    TargetDummy,
    /// Chasing the player
    Moving,
    /// Touching the player
    CollidingWithPlayer,
    /// Being pushed away after a hit
    KnockbackFromDamage,
    /// Ignoring hits until the damage window closes
    InvincibleDueToDamage,
}

impl EnemyState {
    /// True for states in which a weapon hit lands
    pub fn is_damageable(self) -> bool {
        matches!(self, Self::TargetDummy | Self::Moving | Self::CollidingWithPlayer)
    }
}

/// How an enemy behaves when not reacting to damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyBehavior {
    /// Chases the player and attacks on contact
    #[default]
    Chaser,
    /// Stands still and takes hits
    TargetDummy,
}

impl EnemyBehavior {
    fn initial_state(self) -> EnemyState {
        match self {
            Self::Chaser => EnemyState::Moving,
            Self::TargetDummy => EnemyState::TargetDummy,
        }
    }
}

/// A circular enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    id: EntityId,
    room: EntityId,
    behavior: EnemyBehavior,
    position: Point2,
    previous_position: Point2,
    radius: f32,
    speed: f32,
    knockback_speed: f32,
    health: Health,
    state: EnemyState,
    resume_state: EnemyState,
    facing: Direction,
    knockback_angle: f32,
    damage_timer: Cooldown,
    body: Vec<Shape>,
    aggro: Vec<Shape>,
    collisions: CollisionState<EntityId>,
    activations: CollisionState<EntityId>,
    weapon: Option<EntityId>,
    dead: bool,
}

impl Enemy {
    /// Create an enemy of `room` centered on `center`
    pub fn new(
        id: EntityId,
        room: EntityId,
        center: Point2,
        behavior: EnemyBehavior,
        config: &GameConfig,
    ) -> Self {
        let radius = config.enemy.radius;
        let state = behavior.initial_state();
        let aggro = config
            .enemy
            .aggro
            .radius()
            .map(|aggro| CollisionShape::new_circle(id, Circle::new(center, aggro)))
            .into_iter()
            .collect();

        Self {
            id,
            room,
            behavior,
            position: center,
            previous_position: center,
            radius,
            speed: config.enemy.speed,
            knockback_speed: config.enemy.knockback_speed,
            health: Health::new(config.enemy.max_health),
            state,
            resume_state: state,
            facing: Direction::Down,
            knockback_angle: 0.0,
            damage_timer: Cooldown::new(config.combat.invincibility_duration),
            body: vec![CollisionShape::new_circle(id, Circle::new(center, radius))],
            aggro,
            collisions: CollisionState::new(),
            activations: CollisionState::new(),
            weapon: None,
            dead: false,
        }
    }

    /// Enemy id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Room the enemy lives in
    pub fn room(&self) -> EntityId {
        self.room
    }

    /// Configured behavior
    pub fn behavior(&self) -> EnemyBehavior {
        self.behavior
    }

    /// Center of the body
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Center before the last movement
    pub fn previous_position(&self) -> Point2 {
        self.previous_position
    }

    /// Body radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Current combat state
    pub fn state(&self) -> EnemyState {
        self.state
    }

    /// Direction towards the player at the last AI tick
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Remaining health
    pub fn health(&self) -> Health {
        self.health
    }

    /// Angle of the running knockback in degrees
    pub fn knockback_angle(&self) -> f32 {
        self.knockback_angle
    }

    /// Held weapon
    pub fn weapon(&self) -> Option<EntityId> {
        self.weapon
    }

    /// Set the held weapon
    pub fn set_weapon(&mut self, weapon: Option<EntityId>) {
        self.weapon = weapon;
    }

    /// True once health reached zero
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// True for living enemies that fight back
    pub fn is_hostile(&self) -> bool {
        !self.dead && self.behavior == EnemyBehavior::Chaser
    }

    /// Place the body at `center` without travelling
    pub fn teleport(&mut self, center: Point2) {
        self.position = center;
        self.previous_position = center;
        self.sync_shapes();
    }

    /// Read-only view for other entities
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            kind: EntityKind::Enemy,
            position: self.position,
            radius: self.radius,
            facing: self.facing,
            weapon_state: None,
            wielder: None,
        }
    }

    /// Run one frame of the state machine, move and draw
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, surface: &mut dyn DrawSurface) {
        if self.dead {
            return;
        }
        if ctx.transition_in_progress {
            self.draw(ctx, surface);
            return;
        }

        self.resolve_collisions(ctx);
        if self.dead {
            return;
        }
        self.tick_damage_timers(ctx.now, &ctx.config.combat);
        self.think(ctx);
        self.integrate(ctx);
        self.draw(ctx, surface);
    }

    fn resolve_collisions(&mut self, ctx: &mut FrameContext<'_>) {
        let mut blocked = false;
        let mut others: Vec<Point2> = Vec::new();
        let mut attacker: Option<Point2> = None;

        for &other in self.collisions.entities() {
            let Some(snapshot) = ctx.snapshot(other) else {
                continue;
            };
            match snapshot.kind {
                kind if kind.is_obstacle() => blocked = true,
                EntityKind::Player => blocked = true,
                EntityKind::Enemy => others.push(snapshot.position),
                EntityKind::Weapon(_) if snapshot.is_swinging_weapon(true) && attacker.is_none() => {
                    let wielder = snapshot.wielder.and_then(|wielder| ctx.snapshot(wielder));
                    attacker = Some(wielder.map_or(snapshot.position, |wielder| wielder.position));
                }
                _ => {}
            }
        }

        if let Some(attacker) = attacker {
            if self.state.is_damageable() {
                self.take_hit(ctx, attacker);
            }
        }

        if blocked {
            self.position = self.previous_position;
            self.sync_shapes();
        } else if let Some(push) = repulsion_direction(self.position, &others) {
            let travelled = (self.position - self.previous_position).norm();
            self.position += push * travelled;
            self.sync_shapes();
        }
    }

    fn take_hit(&mut self, ctx: &mut FrameContext<'_>, attacker: Point2) {
        self.resume_state = self.state;
        self.knockback_angle = knockback_angle(attacker, self.position);
        self.state = EnemyState::KnockbackFromDamage;
        self.damage_timer.start(ctx.now);

        let amount = ctx.config.combat.weapon_damage;
        if self.health.damage(amount) {
            self.dead = true;
            info!("Enemy {:?} died", self.id);
            ctx.emit(GameEvent::EntityDied { id: self.id, kind: EntityKind::Enemy });
        } else {
            debug!(
                "Enemy {:?} hit for {amount}, knocked back at {:.1}°",
                self.id, self.knockback_angle
            );
        }
    }

    fn tick_damage_timers(&mut self, now: f64, combat: &CombatConfig) {
        let Some(elapsed) = self.damage_timer.elapsed(now) else {
            return;
        };
        if self.state == EnemyState::KnockbackFromDamage && elapsed >= combat.knockback_duration {
            self.state = EnemyState::InvincibleDueToDamage;
            trace!("Enemy {:?} knockback over", self.id);
        }
        if self.state == EnemyState::InvincibleDueToDamage && elapsed >= combat.invincibility_duration {
            self.state = self.resume_state;
            self.damage_timer.reset();
            trace!("Enemy {:?} back to {:?}", self.id, self.state);
        }
    }

    fn think(&mut self, ctx: &mut FrameContext<'_>) {
        if !matches!(self.state, EnemyState::Moving | EnemyState::CollidingWithPlayer) {
            return;
        }
        let Some(player) = ctx.player_snapshot().copied() else {
            return;
        };

        self.facing = Direction::from_angle(utils::screen_angle_between(self.position, player.position));

        let reach = self.radius + player.radius;
        let touching = (player.position - self.position).norm_squared() < reach * reach;
        self.state = if touching {
            EnemyState::CollidingWithPlayer
        } else {
            EnemyState::Moving
        };

        if touching {
            if let Some(weapon) = self.weapon {
                ctx.request(Command::Attack(weapon));
            }
        }
    }

    fn player_in_aggro(&self, ctx: &FrameContext<'_>) -> bool {
        if self.aggro.is_empty() {
            return true;
        }
        ctx.player.is_some_and(|player| self.activations.is_colliding_with(player))
    }

    fn integrate(&mut self, ctx: &FrameContext<'_>) {
        let velocity = match self.state {
            EnemyState::Moving if self.player_in_aggro(ctx) => self.facing.unit_vector() * self.speed,
            EnemyState::KnockbackFromDamage => {
                utils::screen_direction(self.knockback_angle) * self.knockback_speed
            }
            _ => Vec2::zeros(),
        };
        self.previous_position = self.position;
        self.position += velocity * ctx.dt;
        self.sync_shapes();
    }

    fn sync_shapes(&mut self) {
        let position = self.position;
        for shape in self.body.iter_mut().chain(self.aggro.iter_mut()) {
            shape.set_location(position);
        }
    }

    fn draw(&self, ctx: &FrameContext<'_>, surface: &mut dyn DrawSurface) {
        let color = match self.state {
            EnemyState::TargetDummy => Color::GRAY,
            EnemyState::Moving => Color::GREEN,
            EnemyState::CollidingWithPlayer => Color::YELLOW,
            EnemyState::KnockbackFromDamage | EnemyState::InvincibleDueToDamage => Color::RED,
        };
        surface.draw_arc(self.position, self.radius, 0.0, 360.0, color, Some(color));

        if ctx.config.debug_draw {
            for aggro in &self.aggro {
                if let ShapeKind::Circle(circle) = aggro.kind() {
                    surface.draw_arc(circle.location, circle.radius, 0.0, 360.0, Color::TRIGGER, None);
                }
            }
        }
    }
}

impl Collidable<EntityId> for Enemy {
    fn collision_owner(&self) -> EntityId {
        self.id
    }

    fn collision_shapes(&self) -> &[Shape] {
        &self.body
    }

    fn collision_state_mut(&mut self) -> &mut CollisionState<EntityId> {
        &mut self.collisions
    }

    fn collision_state(&self) -> &CollisionState<EntityId> {
        &self.collisions
    }
}

impl Activatable<EntityId> for Enemy {
    fn activation_owner(&self) -> EntityId {
        self.id
    }

    fn activation_shapes(&self) -> &[Shape] {
        &self.aggro
    }

    fn activation_state_mut(&mut self) -> &mut CollisionState<EntityId> {
        &mut self.activations
    }

    fn activation_state(&self) -> &CollisionState<EntityId> {
        &self.activations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Aggro;
    use crate::entities::{FrameOutput, WeaponKind, WeaponState};
    use approx::assert_relative_eq;
    use arena_engine::debug::RecordingSurface;
    use arena_engine::foundation::math::Size;
    use arena_engine::physics::Aabb;
    use slotmap::{SecondaryMap, SlotMap};

    struct Fixture {
        config: GameConfig,
        snapshots: SecondaryMap<EntityId, EntitySnapshot>,
        output: FrameOutput,
        room: EntityId,
        player: EntityId,
        enemy_id: EntityId,
        weapon: EntityId,
        other: EntityId,
    }

    impl Fixture {
        fn new(player_at: Point2) -> Self {
            let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
            let room = arena.insert(());
            let player = arena.insert(());
            let enemy_id = arena.insert(());
            let weapon = arena.insert(());
            let other = arena.insert(());
            let mut snapshots = SecondaryMap::new();
            let mut player_snapshot = EntitySnapshot::fixed(EntityKind::Player, player_at);
            player_snapshot.radius = 28.0;
            snapshots.insert(player, player_snapshot);
            Self {
                config: GameConfig::default(),
                snapshots,
                output: FrameOutput::default(),
                room,
                player,
                enemy_id,
                weapon,
                other,
            }
        }

        /// Register a swinging player sword and overlap it with `enemy`
        fn sword_touches(&mut self, enemy: &mut Enemy) {
            let mut sword = EntitySnapshot::fixed(EntityKind::Weapon(WeaponKind::Sword), enemy.position());
            sword.weapon_state = Some(WeaponState::Swinging);
            sword.wielder = Some(self.player);
            self.snapshots.insert(self.weapon, sword);
            let hitbox = CollisionShape::new_circle(self.weapon, Circle::new(enemy.position(), 6.0));
            enemy.check_for_collisions_with(&[hitbox]);
        }

        fn deaths(&self) -> usize {
            self.output
                .events
                .iter()
                .filter(|event| matches!(event, GameEvent::EntityDied { .. }))
                .count()
        }

        fn enemy(&self, center: Point2, behavior: EnemyBehavior) -> Enemy {
            Enemy::new(self.enemy_id, self.room, center, behavior, &self.config)
        }

        fn step(&mut self, enemy: &mut Enemy, now: f64, dt: f32) {
            let mut surface = RecordingSurface::new(Size::new(800.0, 600.0));
            let mut ctx = FrameContext {
                now,
                dt,
                config: &self.config,
                snapshots: &self.snapshots,
                player: Some(self.player),
                transition_in_progress: false,
                output: &mut self.output,
            };
            enemy.update(&mut ctx, &mut surface);
        }
    }

    #[test]
    fn test_chaser_turns_towards_player() {
        let mut fixture = Fixture::new(Point2::new(300.0, 100.0));
        let mut enemy = fixture.enemy(Point2::new(100.0, 100.0), EnemyBehavior::Chaser);
        fixture.step(&mut enemy, 0.0, 0.0);
        assert_eq!(enemy.facing(), Direction::Right);
        assert_eq!(enemy.state(), EnemyState::Moving);
    }

    #[test]
    fn test_proximity_switches_state_and_requests_attack() {
        let mut fixture = Fixture::new(Point2::new(140.0, 100.0));
        let mut enemy = fixture.enemy(Point2::new(100.0, 100.0), EnemyBehavior::Chaser);
        let weapon = fixture.room;
        enemy.set_weapon(Some(weapon));

        fixture.step(&mut enemy, 0.0, 0.0);
        assert_eq!(enemy.state(), EnemyState::CollidingWithPlayer);
        assert_eq!(fixture.output.commands, vec![Command::Attack(weapon)]);

        enemy.teleport(Point2::new(0.0, 100.0));
        fixture.step(&mut enemy, 0.1, 0.0);
        assert_eq!(enemy.state(), EnemyState::Moving);
    }

    #[test]
    fn test_dummy_ignores_proximity() {
        let mut fixture = Fixture::new(Point2::new(110.0, 100.0));
        let mut enemy = fixture.enemy(Point2::new(100.0, 100.0), EnemyBehavior::TargetDummy);
        fixture.step(&mut enemy, 0.0, 0.1);
        assert_eq!(enemy.state(), EnemyState::TargetDummy);
        assert_eq!(enemy.position(), Point2::new(100.0, 100.0));
    }

    #[test]
    fn test_damage_states_are_not_damageable() {
        assert!(EnemyState::TargetDummy.is_damageable());
        assert!(EnemyState::Moving.is_damageable());
        assert!(EnemyState::CollidingWithPlayer.is_damageable());
        assert!(!EnemyState::KnockbackFromDamage.is_damageable());
        assert!(!EnemyState::InvincibleDueToDamage.is_damageable());
    }

    #[test]
    fn test_hit_opens_invincibility_window() {
        const DT: f32 = 1.0 / 60.0;
        let mut fixture = Fixture::new(Point2::new(600.0, 100.0));
        let mut enemy = fixture.enemy(Point2::new(100.0, 100.0), EnemyBehavior::TargetDummy);

        // The sword keeps overlapping for the whole window
        let expected = [
            (0.0, 20, EnemyState::KnockbackFromDamage),
            (0.125, 20, EnemyState::KnockbackFromDamage),
            (0.375, 20, EnemyState::InvincibleDueToDamage),
            (0.4375, 20, EnemyState::InvincibleDueToDamage),
            (0.5, 20, EnemyState::TargetDummy),
            (0.625, 10, EnemyState::KnockbackFromDamage),
        ];
        for (now, health, state) in expected {
            fixture.sword_touches(&mut enemy);
            fixture.step(&mut enemy, now, DT);
            assert_eq!(enemy.health().current(), health, "health at {now}");
            assert_eq!(enemy.state(), state, "state at {now}");
        }
        assert_eq!(fixture.deaths(), 0);
    }

    #[test]
    fn test_knockback_pushes_away_from_wielder() {
        let mut fixture = Fixture::new(Point2::new(60.0, 100.0));
        let mut enemy = fixture.enemy(Point2::new(100.0, 100.0), EnemyBehavior::TargetDummy);
        fixture.sword_touches(&mut enemy);
        fixture.step(&mut enemy, 0.0, 0.1);
        assert_relative_eq!(enemy.knockback_angle(), 0.0);
        assert_relative_eq!(enemy.position().x, 140.0, epsilon = 1e-3);
        assert_relative_eq!(enemy.position().y, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_death_is_reported_once() {
        let mut fixture = Fixture::new(Point2::new(600.0, 100.0));
        let mut enemy = fixture.enemy(Point2::new(100.0, 100.0), EnemyBehavior::TargetDummy);
        for now in [0.0, 0.5, 1.0, 1.25, 1.5, 2.0] {
            fixture.sword_touches(&mut enemy);
            fixture.step(&mut enemy, now, 0.0);
        }
        assert!(enemy.is_dead());
        assert_eq!(enemy.health().current(), 0);
        assert_eq!(fixture.deaths(), 1);
    }

    #[test]
    fn test_touching_player_reverts_move() {
        let mut fixture = Fixture::new(Point2::new(200.0, 100.0));
        fixture.config.enemy.aggro = Aggro::Everywhere;
        let mut enemy = fixture.enemy(Point2::new(100.0, 100.0), EnemyBehavior::Chaser);

        fixture.step(&mut enemy, 0.0, 0.1);
        assert_relative_eq!(enemy.position().x, 112.0, epsilon = 1e-3);

        let player_body = CollisionShape::new_box(
            fixture.player,
            Aabb::centered(Point2::new(200.0, 100.0), Size::square(56.0)),
        );
        enemy.check_for_collisions_with(&[player_body]);
        fixture.step(&mut enemy, 0.1, 0.0);
        assert_relative_eq!(enemy.position().x, 100.0, epsilon = 1e-3);
        assert_eq!(enemy.previous_position(), enemy.position());
    }

    #[test]
    fn test_overlapping_enemies_nudge_apart() {
        let mut fixture = Fixture::new(Point2::new(600.0, 100.0));
        fixture.config.enemy.aggro = Aggro::Everywhere;
        let mut enemy = fixture.enemy(Point2::new(100.0, 100.0), EnemyBehavior::Chaser);

        fixture.step(&mut enemy, 0.0, 0.1);
        assert_relative_eq!(enemy.position().x, 112.0, epsilon = 1e-3);

        let neighbour = Point2::new(100.0, 100.0);
        fixture
            .snapshots
            .insert(fixture.other, EntitySnapshot::fixed(EntityKind::Enemy, neighbour));
        enemy.check_for_collisions_with(&[CollisionShape::new_circle(
            fixture.other,
            Circle::new(neighbour, 20.0),
        )]);
        fixture.step(&mut enemy, 0.1, 0.1);

        // Pushed by the 12 units it travelled, then a regular step
        assert_relative_eq!(enemy.position().x, 136.0, epsilon = 1e-3);
        assert_relative_eq!(enemy.position().y, 100.0, epsilon = 1e-3);
    }
}
