//! Game entities
//!
//! Every entity lives in the world's arena under an [`EntityId`] that is
//! handed to its constructor and never changes. Entities never hold
//! references to each other: they look at last frame's [`EntitySnapshot`]s
//! and talk back through the [`FrameOutput`] of the current frame.

pub mod door;
pub mod enemy;
pub mod player;
pub mod room;
pub mod room_transition;
pub mod wall;
pub mod weapon;

use arena_engine::debug::DrawSurface;
use arena_engine::foundation::math::Point2;
use arena_engine::physics::{Activatable, Collidable, CollisionLayers, CollisionShape};
use slotmap::SecondaryMap;

use crate::config::GameConfig;
use crate::direction::Direction;
use crate::events::GameEvent;

pub use door::Door;
pub use enemy::{Enemy, EnemyBehavior, EnemyState};
pub use player::{Player, PlayerAction};
pub use room::{Room, Side};
pub use room_transition::RoomTransition;
pub use wall::Wall;
pub use weapon::{Weapon, WeaponKind, WeaponState};

slotmap::new_key_type! {
    /// Stable handle of an entity in the world arena
    pub struct EntityId;
}

/// Collision shape owned by an entity
pub type Shape = CollisionShape<EntityId>;

/// What an entity is, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The player
    Player,
    /// An enemy
    Enemy,
    /// A door in a room boundary
    Door,
    /// A free-standing wall
    Wall,
    /// A room and its boundary walls
    Room,
    /// Trigger volume beyond a doorway
    RoomTransition,
    /// A weapon
    Weapon(WeaponKind),
}

impl EntityKind {
    /// Layer the entity's collision shapes are published on
    pub fn layer(self) -> CollisionLayers {
        match self {
            Self::Player => CollisionLayers::PLAYER,
            Self::Enemy => CollisionLayers::ENEMY,
            Self::Door => CollisionLayers::DOOR,
            Self::Wall => CollisionLayers::WALL,
            Self::Room => CollisionLayers::ROOM,
            Self::RoomTransition => CollisionLayers::TRIGGER,
            Self::Weapon(kind) if kind.is_player_weapon() => CollisionLayers::PLAYER_WEAPON,
            Self::Weapon(_) => CollisionLayers::ENEMY_WEAPON,
        }
    }

    /// Layers the entity checks its collision shapes against
    pub fn collision_mask(self) -> CollisionLayers {
        match self {
            Self::Player => {
                CollisionLayers::OBSTACLES | CollisionLayers::ENEMY | CollisionLayers::ENEMY_WEAPON
            }
            Self::Enemy => {
                CollisionLayers::OBSTACLES
                    | CollisionLayers::PLAYER
                    | CollisionLayers::PLAYER_WEAPON
                    | CollisionLayers::ENEMY
            }
            // Doors track everyone standing in the doorway so they never close on a body
            Self::Door | Self::Wall | Self::Room => CollisionLayers::PLAYER | CollisionLayers::ENEMY,
            Self::RoomTransition => CollisionLayers::PLAYER,
            Self::Weapon(kind) if kind.is_player_weapon() => CollisionLayers::ENEMY,
            Self::Weapon(_) => CollisionLayers::PLAYER,
        }
    }

    /// Layers the entity checks its activation shapes against
    pub fn activation_mask(self) -> CollisionLayers {
        match self {
            Self::Door | Self::Enemy => CollisionLayers::PLAYER,
            _ => CollisionLayers::empty(),
        }
    }

    /// True for room geometry the player and enemies cannot pass
    pub fn is_obstacle(self) -> bool {
        matches!(self, Self::Room | Self::Wall | Self::Door)
    }
}

/// Read-only view of an entity as it was before the current update pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    /// Entity kind
    pub kind: EntityKind,
    /// Center of the entity
    pub position: Point2,
    /// Body radius (half the side for boxes)
    pub radius: f32,
    /// Facing, `None` for static entities
    pub facing: Direction,
    /// Swing phase, for weapons
    pub weapon_state: Option<WeaponState>,
    /// Wielder, for weapons
    pub wielder: Option<EntityId>,
}

impl EntitySnapshot {
    /// Snapshot of something that does not move or face anywhere
    pub fn fixed(kind: EntityKind, position: Point2) -> Self {
        Self {
            kind,
            position,
            radius: 0.0,
            facing: Direction::None,
            weapon_state: None,
            wielder: None,
        }
    }

    /// True for a weapon of the given side in the middle of a swing
    pub fn is_swinging_weapon(&self, player_side: bool) -> bool {
        match self.kind {
            EntityKind::Weapon(kind) => {
                kind.is_player_weapon() == player_side
                    && self.weapon_state.is_some_and(WeaponState::is_swinging)
            }
            _ => false,
        }
    }
}

/// Cross-entity requests applied by the world between update passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask a weapon to start a swing
    Attack(EntityId),
}

/// Everything entities emit during one frame
#[derive(Debug, Default)]
pub struct FrameOutput {
    /// Events published to the bus at the end of the frame
    pub events: Vec<GameEvent>,
    /// Requests applied before the weapon pass
    pub commands: Vec<Command>,
}

/// Per-frame inputs shared by every entity update
pub struct FrameContext<'a> {
    /// Clock timestamp of the frame in seconds
    pub now: f64,
    /// Seconds since the previous frame
    pub dt: f32,
    /// Game configuration
    pub config: &'a GameConfig,
    /// Snapshots of every participating entity
    pub snapshots: &'a SecondaryMap<EntityId, EntitySnapshot>,
    /// The player, if spawned
    pub player: Option<EntityId>,
    /// A room transition is running; enemies only draw
    pub transition_in_progress: bool,
    /// Outbox for events and commands
    pub output: &'a mut FrameOutput,
}

impl FrameContext<'_> {
    /// Snapshot of an entity
    pub fn snapshot(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots.get(id)
    }

    /// Snapshot of the player
    pub fn player_snapshot(&self) -> Option<&EntitySnapshot> {
        self.player.and_then(|id| self.snapshots.get(id))
    }

    /// Queue an event
    pub fn emit(&mut self, event: GameEvent) {
        self.output.events.push(event);
    }

    /// Queue a command
    pub fn request(&mut self, command: Command) {
        self.output.commands.push(command);
    }
}

/// Any entity in the world
#[derive(Debug, Clone)]
pub enum Entity {
    /// The player
    Player(Player),
    /// An enemy
    Enemy(Enemy),
    /// A door
    Door(Door),
    /// A free-standing wall
    Wall(Wall),
    /// A room
    Room(Room),
    /// A room transition trigger
    RoomTransition(RoomTransition),
    /// A weapon
    Weapon(Weapon),
}

macro_rules! each_entity {
    ($entity:expr, $inner:ident => $body:expr) => {
        match $entity {
            Entity::Player($inner) => $body,
            Entity::Enemy($inner) => $body,
            Entity::Door($inner) => $body,
            Entity::Wall($inner) => $body,
            Entity::Room($inner) => $body,
            Entity::RoomTransition($inner) => $body,
            Entity::Weapon($inner) => $body,
        }
    };
}

impl Entity {
    /// Entity id
    pub fn id(&self) -> EntityId {
        each_entity!(self, inner => inner.collision_owner())
    }

    /// Entity kind
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Enemy(_) => EntityKind::Enemy,
            Self::Door(_) => EntityKind::Door,
            Self::Wall(_) => EntityKind::Wall,
            Self::Room(_) => EntityKind::Room,
            Self::RoomTransition(_) => EntityKind::RoomTransition,
            Self::Weapon(weapon) => EntityKind::Weapon(weapon.kind()),
        }
    }

    /// Room the entity belongs to; `None` for entities that follow the player
    pub fn room(&self) -> Option<EntityId> {
        match self {
            Self::Player(_) | Self::Weapon(_) => None,
            Self::Enemy(enemy) => Some(enemy.room()),
            Self::Door(door) => Some(door.room()),
            Self::Wall(wall) => Some(wall.room()),
            Self::Room(room) => Some(room.id()),
            Self::RoomTransition(transition) => Some(transition.from()),
        }
    }

    /// Shapes other entities collide with
    pub fn collision_shapes(&self) -> &[Shape] {
        each_entity!(self, inner => inner.collision_shapes())
    }

    /// Store who collides with this entity
    pub fn check_for_collisions_with(&mut self, candidates: &[Shape]) {
        each_entity!(self, inner => inner.check_for_collisions_with(candidates));
    }

    /// Who collided with this entity at the last check
    pub fn entities_colliding_with_me(&self) -> &[EntityId] {
        each_entity!(self, inner => inner.entities_colliding_with_me())
    }

    /// Store who is inside this entity's activation area
    pub fn check_for_activations_with(&mut self, candidates: &[Shape]) {
        match self {
            Self::Door(door) => door.check_for_activations_with(candidates),
            Self::Enemy(enemy) => enemy.check_for_activations_with(candidates),
            _ => {}
        }
    }

    /// Who was inside the activation area at the last check
    pub fn entities_activating_me(&self) -> &[EntityId] {
        match self {
            Self::Door(door) => door.entities_activating_me(),
            Self::Enemy(enemy) => enemy.entities_activating_me(),
            _ => &[],
        }
    }

    /// Read-only view for other entities' updates
    pub fn snapshot(&self) -> EntitySnapshot {
        match self {
            Self::Player(player) => player.snapshot(),
            Self::Enemy(enemy) => enemy.snapshot(),
            Self::Door(door) => EntitySnapshot::fixed(EntityKind::Door, door.leaf().center()),
            Self::Wall(wall) => EntitySnapshot::fixed(EntityKind::Wall, wall.bounds().center()),
            Self::Room(room) => EntitySnapshot::fixed(EntityKind::Room, room.bounds().center()),
            Self::RoomTransition(transition) => {
                EntitySnapshot::fixed(EntityKind::RoomTransition, transition.bounds().center())
            }
            Self::Weapon(weapon) => EntitySnapshot {
                kind: EntityKind::Weapon(weapon.kind()),
                position: weapon
                    .hitboxes()
                    .first()
                    .map_or_else(Point2::origin, Shape::location),
                radius: weapon.profile().hitbox_radius,
                facing: Direction::None,
                weapon_state: Some(weapon.state()),
                wielder: weapon.wielder(),
            },
        }
    }

    /// Consume this frame's collision results, move and draw
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, surface: &mut dyn DrawSurface) {
        each_entity!(self, inner => inner.update(ctx, surface));
    }

    /// The player, if this is one
    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Mutable player, if this is one
    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    /// The enemy, if this is one
    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Mutable enemy, if this is one
    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// The door, if this is one
    pub fn as_door(&self) -> Option<&Door> {
        match self {
            Self::Door(door) => Some(door),
            _ => None,
        }
    }

    /// Mutable door, if this is one
    pub fn as_door_mut(&mut self) -> Option<&mut Door> {
        match self {
            Self::Door(door) => Some(door),
            _ => None,
        }
    }

    /// The room, if this is one
    pub fn as_room(&self) -> Option<&Room> {
        match self {
            Self::Room(room) => Some(room),
            _ => None,
        }
    }

    /// Mutable room, if this is one
    pub fn as_room_mut(&mut self) -> Option<&mut Room> {
        match self {
            Self::Room(room) => Some(room),
            _ => None,
        }
    }

    /// The weapon, if this is one
    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Self::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    /// Mutable weapon, if this is one
    pub fn as_weapon_mut(&mut self) -> Option<&mut Weapon> {
        match self {
            Self::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_scope_candidates() {
        let sword = EntityKind::Weapon(WeaponKind::Sword);
        let claw = EntityKind::Weapon(WeaponKind::Claw);

        assert!(EntityKind::Enemy.collision_mask().accepts(sword.layer()));
        assert!(!EntityKind::Enemy.collision_mask().accepts(claw.layer()));
        assert!(EntityKind::Player.collision_mask().accepts(claw.layer()));
        assert!(!EntityKind::Player.collision_mask().accepts(sword.layer()));
        assert!(!EntityKind::Player.collision_mask().accepts(EntityKind::RoomTransition.layer()));
        assert!(sword.collision_mask().accepts(EntityKind::Enemy.layer()));
        assert!(!sword.collision_mask().accepts(EntityKind::Wall.layer()));
        assert!(EntityKind::Door.activation_mask().accepts(EntityKind::Player.layer()));
        assert!(!EntityKind::Door.activation_mask().accepts(EntityKind::Enemy.layer()));
        assert!(EntityKind::Door.collision_mask().accepts(EntityKind::Enemy.layer()));
        assert!(!EntityKind::RoomTransition.collision_mask().accepts(EntityKind::Enemy.layer()));
        assert!(EntityKind::Wall.activation_mask().is_empty());
    }

    #[test]
    fn test_swinging_weapon_snapshot() {
        let mut snapshot = EntitySnapshot::fixed(EntityKind::Weapon(WeaponKind::Claw), Point2::origin());
        snapshot.weapon_state = Some(WeaponState::ReturnSwinging);
        assert!(snapshot.is_swinging_weapon(false));
        assert!(!snapshot.is_swinging_weapon(true));

        snapshot.weapon_state = Some(WeaponState::Resting);
        assert!(!snapshot.is_swinging_weapon(false));
    }
}
