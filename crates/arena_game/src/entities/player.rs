//! The player character

use arena_engine::debug::{Color, DrawSurface};
use arena_engine::foundation::math::{Point2, Size};
use arena_engine::foundation::time::Cooldown;
use arena_engine::input::{KeyCode, KeyboardState};
use arena_engine::physics::{Aabb, Collidable, CollisionShape, CollisionState};
use log::{debug, info};

use crate::combat::Health;
use crate::config::{ControlsConfig, GameConfig};
use crate::direction::Direction;
use crate::entities::{EntityId, EntityKind, EntitySnapshot, FrameContext, Shape};
use crate::events::GameEvent;

/// Non-movement actions a key press can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Swing the held weapon
    Attack,
    /// Use a door within reach
    Interact,
}

/// The player: a square body steered by the four directional keys
#[derive(Debug, Clone)]
pub struct Player {
    id: EntityId,
    position: Point2,
    previous_position: Point2,
    size: f32,
    speed: f32,
    health: Health,
    keys: KeyboardState,
    direction: Direction,
    facing: Direction,
    damage_cooldown: Cooldown,
    body: Vec<Shape>,
    collisions: CollisionState<EntityId>,
    weapon: Option<EntityId>,
    dead: bool,
}

impl Player {
    /// Create a player centered on `center`
    pub fn new(id: EntityId, center: Point2, config: &GameConfig) -> Self {
        let size = config.player.size;
        let body = vec![CollisionShape::new_box(id, Aabb::centered(center, Size::square(size)))];
        Self {
            id,
            position: center,
            previous_position: center,
            size,
            speed: config.player.speed,
            health: Health::new(config.player.max_health),
            keys: KeyboardState::new(),
            direction: Direction::None,
            facing: Direction::Down,
            damage_cooldown: Cooldown::new(config.combat.player_damage_cooldown),
            body,
            collisions: CollisionState::new(),
            weapon: None,
            dead: false,
        }
    }

    /// Player id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Center of the body
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Center before the last movement
    pub fn previous_position(&self) -> Point2 {
        self.previous_position
    }

    /// Body box
    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.position, Size::square(self.size))
    }

    /// Remaining health
    pub fn health(&self) -> Health {
        self.health
    }

    /// Direction derived from the held keys
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Last non-`None` direction
    pub fn facing(&self) -> Direction {
        self.facing
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

    /// True while hits are ignored after taking damage
    pub fn is_invincible(&self, now: f64) -> bool {
        self.damage_cooldown.is_running(now)
    }

    /// Place the body at `center` without travelling
    pub fn teleport(&mut self, center: Point2) {
        self.position = center;
        self.previous_position = center;
        self.sync_body();
    }

    /// Track a key press; returns the action it maps to, if any
    pub fn key_pressed(&mut self, code: KeyCode, controls: &ControlsConfig) -> Option<PlayerAction> {
        if code == controls.attack {
            return Some(PlayerAction::Attack);
        }
        if code == controls.interact {
            return Some(PlayerAction::Interact);
        }
        if self.keys.press(code) {
            self.refresh_direction(controls);
        }
        None
    }

    /// Track a key release
    pub fn key_released(&mut self, code: KeyCode, controls: &ControlsConfig) {
        if self.keys.release(code) {
            self.refresh_direction(controls);
        }
    }

    /// Forget held keys, e.g. when the window loses focus
    pub fn release_all_keys(&mut self) {
        self.keys.release_all();
        self.direction = Direction::None;
    }

    fn refresh_direction(&mut self, controls: &ControlsConfig) {
        self.direction = Direction::from_pressed(
            self.keys.is_pressed(controls.up),
            self.keys.is_pressed(controls.down),
            self.keys.is_pressed(controls.left),
            self.keys.is_pressed(controls.right),
        );
        if self.direction.is_moving() {
            self.facing = self.direction;
        }
    }

    /// Read-only view for other entities
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            kind: EntityKind::Player,
            position: self.position,
            radius: self.size / 2.0,
            facing: self.facing,
            weapon_state: None,
            wielder: None,
        }
    }

    /// Resolve collisions, move and draw
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, surface: &mut dyn DrawSurface) {
        self.resolve_collisions(ctx);

        if !self.dead {
            self.previous_position = self.position;
            self.position += self.direction.unit_vector() * self.speed * ctx.dt;
            self.sync_body();
        }

        self.draw(ctx, surface);
    }

    fn resolve_collisions(&mut self, ctx: &mut FrameContext<'_>) {
        let mut blocked = false;
        let mut hurt = false;
        for &other in self.collisions.entities() {
            let Some(snapshot) = ctx.snapshot(other) else {
                continue;
            };
            match snapshot.kind {
                kind if kind.is_obstacle() => blocked = true,
                EntityKind::Enemy => hurt = true,
                EntityKind::Weapon(_) if snapshot.is_swinging_weapon(false) => hurt = true,
                _ => {}
            }
        }

        if blocked {
            self.position = self.previous_position;
            self.sync_body();
        }

        if hurt && !self.dead && self.damage_cooldown.is_ready(ctx.now) {
            self.damage_cooldown.start(ctx.now);
            let amount = ctx.config.combat.contact_damage;
            if self.health.damage(amount) {
                self.dead = true;
                info!("Player {:?} died", self.id);
                ctx.emit(GameEvent::EntityDied { id: self.id, kind: EntityKind::Player });
                ctx.emit(GameEvent::GameOver);
            } else {
                debug!("Player took {amount} damage, {} left", self.health.current());
            }
        }
    }

    fn sync_body(&mut self) {
        let location = self.bounds().location;
        for shape in &mut self.body {
            shape.set_location(location);
        }
    }

    fn draw(&self, ctx: &FrameContext<'_>, surface: &mut dyn DrawSurface) {
        let bounds = self.bounds();
        let color = if self.is_invincible(ctx.now) { Color::YELLOW } else { Color::BLUE };
        surface.draw_rect(bounds.location, bounds.size, color, Some(color));

        if ctx.config.debug_draw && self.collisions.is_colliding() {
            surface.draw_rect(bounds.location, bounds.size, Color::RED, None);
        }
    }
}

impl Collidable<EntityId> for Player {
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
