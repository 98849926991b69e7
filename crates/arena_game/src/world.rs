//! World: entity arena and frame driver
//!
//! The world owns every entity and runs frames in a fixed order:
//! 1. Apply removals queued last frame, refresh door locks
//! 2. Read the clock, finish a room transition that ran out
//! 3. Gather the shapes of every participating entity, tagged by layer
//! 4. Resolve collisions and activations for every participant
//! 5. Update non-weapons, refresh snapshots, apply commands, update weapons
//! 6. Publish the frame's events and react to what was delivered
//!
//! Only the active room's entities take part in a frame, together with the
//! player and the weapons held by participants.

use arena_engine::debug::DrawSurface;
use arena_engine::events::{EventBus, EventHandler, SubscriptionId};
use arena_engine::foundation::math::Point2;
use arena_engine::foundation::time::{Clock, FrameTimer, SystemClock};
use arena_engine::input::KeyCode;
use arena_engine::physics::{Aabb, CollisionLayers};
use log::{debug, info, warn};
use slotmap::{SecondaryMap, SlotMap};

use crate::config::GameConfig;
use crate::entities::{
    Command, Door, Enemy, EnemyBehavior, Entity, EntityId, EntitySnapshot, FrameContext,
    FrameOutput, Player, PlayerAction, Room, RoomTransition, Shape, Side, Wall, Weapon,
    WeaponKind,
};
use crate::error::{GameError, GameResult};
use crate::events::GameEvent;

/// Ids created by [`World::pair_rooms`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorPair {
    /// Door on the first room's side, then the second room's
    pub doors: [EntityId; 2],
    /// Transition out of the first room, then out of the second
    pub transitions: [EntityId; 2],
}

#[derive(Debug, Clone, Copy)]
struct ActiveTransition {
    room: EntityId,
    until: f64,
}

/// The game world
pub struct World {
    config: GameConfig,
    clock: Box<dyn Clock>,
    timer: FrameTimer,
    now: f64,
    entities: SlotMap<EntityId, Entity>,
    player: Option<EntityId>,
    active_room: Option<EntityId>,
    transition: Option<ActiveTransition>,
    bus: EventBus<GameEvent>,
    pending_removals: Vec<EntityId>,
    game_over: bool,
}

impl World {
    /// Create an empty world reading time from `clock`
    pub fn new(config: GameConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            timer: FrameTimer::new(),
            now: 0.0,
            entities: SlotMap::with_key(),
            player: None,
            active_room: None,
            transition: None,
            bus: EventBus::new(),
            pending_removals: Vec::new(),
            game_over: false,
        }
    }

    /// Create an empty world driven by the wall clock
    pub fn with_system_clock(config: GameConfig) -> Self {
        Self::new(config, Box::new(SystemClock::new()))
    }

    /// Game configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Clock timestamp of the last frame
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of frames stepped
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Look up any entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// The player's id
    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    /// The player
    pub fn player(&self) -> Option<&Player> {
        self.player.and_then(|id| self.entities.get(id)).and_then(Entity::as_player)
    }

    /// An enemy
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.entities.get(id).and_then(Entity::as_enemy)
    }

    /// A door
    pub fn door(&self, id: EntityId) -> Option<&Door> {
        self.entities.get(id).and_then(Entity::as_door)
    }

    /// A room
    pub fn room(&self, id: EntityId) -> Option<&Room> {
        self.entities.get(id).and_then(Entity::as_room)
    }

    /// A weapon
    pub fn weapon(&self, id: EntityId) -> Option<&Weapon> {
        self.entities.get(id).and_then(Entity::as_weapon)
    }

    /// Enemies living in `room`
    pub fn enemies_in(&self, room: EntityId) -> impl Iterator<Item = &Enemy> {
        self.entities
            .values()
            .filter_map(Entity::as_enemy)
            .filter(move |enemy| enemy.room() == room)
    }

    /// Room the player is in
    pub fn active_room(&self) -> Option<EntityId> {
        self.active_room
    }

    /// True while enemies are frozen after a room change
    pub fn transition_in_progress(&self) -> bool {
        self.transition.is_some()
    }

    /// True once the player died
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Register an event handler
    pub fn subscribe(&mut self, handler: impl EventHandler<GameEvent> + 'static) -> SubscriptionId {
        self.bus.subscribe(Box::new(handler))
    }

    /// Remove an event handler; false if the token is unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // -- construction --------------------------------------------------------

    /// Add a room; the first room becomes the active one
    pub fn spawn_room(&mut self, bounds: Aabb) -> EntityId {
        let thickness = self.config.room.wall_thickness;
        let id = self
            .entities
            .insert_with_key(|id| Entity::Room(Room::new(id, bounds, thickness)));
        if self.active_room.is_none() {
            self.active_room = Some(id);
        }
        debug!("Spawned room {id:?}");
        id
    }

    /// Add a free-standing wall to `room`
    pub fn spawn_wall(&mut self, room: EntityId, bounds: Aabb) -> GameResult<EntityId> {
        self.room_ref(room)?;
        Ok(self
            .entities
            .insert_with_key(|id| Entity::Wall(Wall::new(id, room, bounds))))
    }

    /// Add the player, armed with a sword
    pub fn spawn_player(&mut self, center: Point2) -> GameResult<EntityId> {
        if let Some(existing) = self.player {
            return Err(GameError::PlayerAlreadySpawned(existing));
        }
        let config = &self.config;
        let id = self
            .entities
            .insert_with_key(|id| Entity::Player(Player::new(id, center, config)));
        self.player = Some(id);
        self.equip(id, WeaponKind::Sword)?;
        info!("Spawned player {id:?} at ({:.0}, {:.0})", center.x, center.y);
        Ok(id)
    }

    /// Add an enemy to `room`
    pub fn spawn_enemy(
        &mut self,
        room: EntityId,
        center: Point2,
        behavior: EnemyBehavior,
    ) -> GameResult<EntityId> {
        self.room_ref(room)?;
        let config = &self.config;
        let id = self
            .entities
            .insert_with_key(|id| Entity::Enemy(Enemy::new(id, room, center, behavior, config)));
        debug!("Spawned {behavior:?} enemy {id:?}");
        Ok(id)
    }

    /// Give `wielder` a new weapon, dropping the one it held
    pub fn equip(&mut self, wielder: EntityId, kind: WeaponKind) -> GameResult<EntityId> {
        self.detach_weapon(wielder)?;

        let profile = self.config.weapons.profile(kind).clone();
        let weapon = self.entities.insert_with_key(|id| {
            let mut weapon = Weapon::new(id, kind, profile);
            weapon.attach(wielder);
            Entity::Weapon(weapon)
        });

        match self.entities.get_mut(wielder) {
            Some(Entity::Player(player)) => player.set_weapon(Some(weapon)),
            Some(Entity::Enemy(enemy)) => enemy.set_weapon(Some(weapon)),
            _ => {}
        }
        debug!("{wielder:?} equipped {kind:?} {weapon:?}");
        Ok(weapon)
    }

    /// Take the weapon away from `wielder`; the weapon stays in the world
    pub fn detach_weapon(&mut self, wielder: EntityId) -> GameResult<Option<EntityId>> {
        let held = match self.entities.get_mut(wielder) {
            Some(Entity::Player(player)) => {
                let held = player.weapon();
                player.set_weapon(None);
                held
            }
            Some(Entity::Enemy(enemy)) => {
                let held = enemy.weapon();
                enemy.set_weapon(None);
                held
            }
            Some(_) => {
                return Err(GameError::WrongEntityKind { id: wielder, expected: "player or enemy" })
            }
            None => return Err(GameError::UnknownEntity(wielder)),
        };

        if let Some(weapon) = held.and_then(|id| self.entities.get_mut(id)).and_then(Entity::as_weapon_mut) {
            weapon.detach();
        }
        Ok(held)
    }

    /// Connect `a` and `b` through a doorway on `side` of `a`
    ///
    /// Cuts a centered doorway into both rooms, places a door in each gap
    /// and a transition trigger beyond each door.
    pub fn pair_rooms(&mut self, a: EntityId, side: Side, b: EntityId) -> GameResult<DoorPair> {
        self.room_ref(a)?;
        self.room_ref(b)?;

        let width = self.config.room.doorway_width;
        let depth = self.config.room.transition_depth;
        let (leaf_a, trigger_a) = self.cut_paired_doorway(a, side, b, width, depth)?;
        let (leaf_b, trigger_b) = self.cut_paired_doorway(b, side.opposite(), a, width, depth)?;

        let door_a = self.spawn_door(a, side, leaf_a, b);
        let door_b = self.spawn_door(b, side.opposite(), leaf_b, a);

        let transition_a = self
            .entities
            .insert_with_key(|id| Entity::RoomTransition(RoomTransition::new(id, a, b, side, trigger_a)));
        let transition_b = self.entities.insert_with_key(|id| {
            Entity::RoomTransition(RoomTransition::new(id, b, a, side.opposite(), trigger_b))
        });

        info!("Paired room {a:?} ({side:?}) with {b:?}");
        Ok(DoorPair {
            doors: [door_a, door_b],
            transitions: [transition_a, transition_b],
        })
    }

    fn spawn_door(&mut self, room: EntityId, side: Side, leaf: Aabb, leads_to: EntityId) -> EntityId {
        let config = &self.config.door;
        self.entities.insert_with_key(|id| {
            let mut door = Door::new(id, room, side, leaf, config);
            door.set_leads_to(leads_to);
            Entity::Door(door)
        })
    }

    fn cut_paired_doorway(
        &mut self,
        room: EntityId,
        side: Side,
        neighbour: EntityId,
        width: f32,
        depth: f32,
    ) -> GameResult<(Aabb, Aabb)> {
        let room = self.room_mut(room)?;
        let offset = room.centered_offset(side, width);
        let leaf = room.cut_doorway(side, offset, width);
        room.add_neighbour(side, neighbour);
        Ok((leaf, room.transition_box(side, offset, width, depth)))
    }

    /// Move the player or an enemy without travelling
    pub fn teleport(&mut self, id: EntityId, center: Point2) -> GameResult<()> {
        match self.entities.get_mut(id) {
            Some(Entity::Player(player)) => player.teleport(center),
            Some(Entity::Enemy(enemy)) => enemy.teleport(center),
            Some(_) => return Err(GameError::WrongEntityKind { id, expected: "player or enemy" }),
            None => return Err(GameError::UnknownEntity(id)),
        }
        Ok(())
    }

    /// Queue an entity for removal at the next frame boundary
    pub fn despawn(&mut self, id: EntityId) -> GameResult<()> {
        if !self.entities.contains_key(id) {
            return Err(GameError::UnknownEntity(id));
        }
        if !self.pending_removals.contains(&id) {
            self.pending_removals.push(id);
        }
        Ok(())
    }

    fn room_ref(&self, id: EntityId) -> GameResult<&Room> {
        self.entities
            .get(id)
            .ok_or(GameError::UnknownEntity(id))?
            .as_room()
            .ok_or(GameError::WrongEntityKind { id, expected: "room" })
    }

    fn room_mut(&mut self, id: EntityId) -> GameResult<&mut Room> {
        self.entities
            .get_mut(id)
            .ok_or(GameError::UnknownEntity(id))?
            .as_room_mut()
            .ok_or(GameError::WrongEntityKind { id, expected: "room" })
    }

    // -- input ---------------------------------------------------------------

    /// Route a key press to the player and the doors within reach
    pub fn key_pressed(&mut self, code: KeyCode) {
        let Some(player_id) = self.player else {
            return;
        };
        let controls = &self.config.controls;
        let action = match self.entities.get_mut(player_id).and_then(Entity::as_player_mut) {
            Some(player) if !player.is_dead() => player.key_pressed(code, controls),
            _ => None,
        };

        match action {
            Some(PlayerAction::Attack) => self.player_attack(player_id),
            Some(PlayerAction::Interact) => self.interact(code, player_id),
            None => {}
        }
    }

    /// Route a key release to the player
    pub fn key_released(&mut self, code: KeyCode) {
        let Some(player_id) = self.player else {
            return;
        };
        let controls = &self.config.controls;
        if let Some(player) = self.entities.get_mut(player_id).and_then(Entity::as_player_mut) {
            player.key_released(code, controls);
        }
    }

    /// Forget every held key, e.g. when the host window loses focus
    pub fn release_all_keys(&mut self) -> GameResult<()> {
        let player_id = self.player.ok_or(GameError::NoPlayer)?;
        self.entities
            .get_mut(player_id)
            .and_then(Entity::as_player_mut)
            .ok_or(GameError::NoPlayer)?
            .release_all_keys();
        Ok(())
    }

    fn player_attack(&mut self, player_id: EntityId) {
        let Some(player) = self.entities.get(player_id).and_then(Entity::as_player) else {
            return;
        };
        let Some(weapon_id) = player.weapon() else {
            debug!("Player has nothing to swing");
            return;
        };
        let (center, facing) = (player.position(), player.facing());
        let radius = self.config.player.size / 2.0;

        if let Some(weapon) = self.entities.get_mut(weapon_id).and_then(Entity::as_weapon_mut) {
            if weapon.attack() {
                weapon.place_hitboxes(center, facing, radius);
            }
        }
    }

    fn interact(&mut self, code: KeyCode, player_id: EntityId) {
        let Some(room) = self.active_room else {
            return;
        };
        let controls = &self.config.controls;
        let mut toggled = Vec::new();
        for entity in self.entities.values_mut() {
            if let Entity::Door(door) = entity {
                if door.room() == room && door.key_pressed(code, controls, player_id) {
                    toggled.push(GameEvent::DoorToggled { door: door.id(), open: door.is_open() });
                }
            }
        }
        for event in toggled {
            self.bus.publish(event);
        }
    }

    // -- frame ---------------------------------------------------------------

    /// Run one frame, drawing onto `surface`
    pub fn step(&mut self, surface: &mut dyn DrawSurface) {
        self.apply_removals();
        self.refresh_door_locks();

        let now = self.clock.now();
        let dt = self.timer.tick(now);
        self.now = now;
        self.finish_transition(now);

        let participants = self.participants();
        let gathered = self.gather_shapes(&participants);
        self.resolve(&participants, &gathered);

        let (weapons, others): (Vec<EntityId>, Vec<EntityId>) = participants
            .iter()
            .copied()
            .partition(|&id| matches!(self.entities.get(id), Some(Entity::Weapon(_))));

        let mut snapshots = self.snapshots(&participants);
        let mut output = FrameOutput::default();
        self.run_updates(&others, now, dt, &snapshots, &mut output, surface);

        for &id in &others {
            if let Some(entity) = self.entities.get(id) {
                snapshots.insert(id, entity.snapshot());
            }
        }
        for command in std::mem::take(&mut output.commands) {
            self.apply_command(command);
        }
        self.run_updates(&weapons, now, dt, &snapshots, &mut output, surface);

        for event in output.events {
            self.bus.publish(event);
        }
        self.bus.update_time(now);
        for event in self.bus.dispatch() {
            self.react(event);
        }
    }

    fn apply_removals(&mut self) {
        for id in std::mem::take(&mut self.pending_removals) {
            let Some(entity) = self.entities.remove(id) else {
                continue;
            };
            if let Entity::Enemy(enemy) = &entity {
                if let Some(weapon) = enemy.weapon() {
                    self.entities.remove(weapon);
                }
            }
            debug!("Removed {:?} {id:?}", entity.kind());
        }
    }

    fn refresh_door_locks(&mut self) {
        if !self.config.door.lock_while_enemies_alive {
            return;
        }
        let Some(room) = self.active_room else {
            return;
        };
        let hostile = self.enemies_in(room).any(Enemy::is_hostile);
        for entity in self.entities.values_mut() {
            if let Entity::Door(door) = entity {
                if door.room() != room {
                    continue;
                }
                if hostile {
                    door.lock();
                } else {
                    door.unlock();
                }
            }
        }
    }

    fn finish_transition(&mut self, now: f64) {
        if let Some(transition) = self.transition {
            if now >= transition.until {
                self.transition = None;
                self.bus.publish(GameEvent::RoomEntered { room: transition.room });
            }
        }
    }

    fn participants(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, entity)| self.participates(entity))
            .map(|(id, _)| id)
            .collect()
    }

    fn participates(&self, entity: &Entity) -> bool {
        match entity {
            Entity::Player(_) => true,
            Entity::Weapon(weapon) => weapon
                .wielder()
                .and_then(|wielder| self.entities.get(wielder))
                .is_some_and(|wielder| !matches!(wielder, Entity::Weapon(_)) && self.participates(wielder)),
            other => self.active_room.is_some() && other.room() == self.active_room,
        }
    }

    fn gather_shapes(&self, participants: &[EntityId]) -> Vec<(CollisionLayers, Shape)> {
        let mut gathered = Vec::new();
        for &id in participants {
            if let Some(entity) = self.entities.get(id) {
                let layer = entity.kind().layer();
                gathered.extend(entity.collision_shapes().iter().map(|shape| (layer, *shape)));
            }
        }
        gathered
    }

    fn resolve(&mut self, participants: &[EntityId], gathered: &[(CollisionLayers, Shape)]) {
        for &id in participants {
            let Some(entity) = self.entities.get_mut(id) else {
                continue;
            };
            let kind = entity.kind();
            entity.check_for_collisions_with(&scoped(gathered, kind.collision_mask()));

            let activation_mask = kind.activation_mask();
            if !activation_mask.is_empty() {
                entity.check_for_activations_with(&scoped(gathered, activation_mask));
            }
        }
    }

    fn snapshots(&self, participants: &[EntityId]) -> SecondaryMap<EntityId, EntitySnapshot> {
        let mut snapshots = SecondaryMap::new();
        for &id in participants {
            if let Some(entity) = self.entities.get(id) {
                snapshots.insert(id, entity.snapshot());
            }
        }
        snapshots
    }

    fn run_updates(
        &mut self,
        ids: &[EntityId],
        now: f64,
        dt: f32,
        snapshots: &SecondaryMap<EntityId, EntitySnapshot>,
        output: &mut FrameOutput,
        surface: &mut dyn DrawSurface,
    ) {
        let mut ctx = FrameContext {
            now,
            dt,
            config: &self.config,
            snapshots,
            player: self.player,
            transition_in_progress: self.transition.is_some(),
            output,
        };
        for &id in ids {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.update(&mut ctx, surface);
            }
        }
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Attack(weapon) => {
                if let Some(weapon) = self.entities.get_mut(weapon).and_then(Entity::as_weapon_mut) {
                    weapon.attack();
                }
            }
        }
    }

    fn react(&mut self, event: GameEvent) {
        match event {
            GameEvent::EntityDied { id, kind } => {
                debug!("{kind:?} {id:?} died, removing next frame");
                if self.player != Some(id) && !self.pending_removals.contains(&id) {
                    self.pending_removals.push(id);
                }
            }
            GameEvent::GameOver => {
                if !self.game_over {
                    warn!("Game over after {} frames", self.timer.frame_count());
                }
                self.game_over = true;
            }
            GameEvent::RoomTransitionTriggered { from, to, side } => {
                self.begin_transition(from, to, side);
            }
            GameEvent::RoomEntered { room } => info!("Entered room {room:?}"),
            GameEvent::DoorToggled { .. } => {}
        }
    }

    fn begin_transition(&mut self, from: EntityId, to: EntityId, side: Side) {
        if self.transition.is_some() || self.active_room != Some(from) {
            return;
        }
        let Some(player_id) = self.player else {
            return;
        };
        let Some(room) = self.room(to) else {
            warn!("Transition into unknown room {to:?}");
            return;
        };

        let entry_side = side.opposite();
        let width = self.config.room.doorway_width;
        let (offset, width) = room
            .doorway(entry_side)
            .unwrap_or_else(|| (room.centered_offset(entry_side, width), width));
        let entry = room.entry_point(entry_side, offset, width, self.config.player.size / 2.0);

        if let Some(player) = self.entities.get_mut(player_id).and_then(Entity::as_player_mut) {
            player.teleport(entry);
        }
        self.active_room = Some(to);
        self.transition = Some(ActiveTransition {
            room: to,
            until: self.now + self.config.room.transition_duration,
        });
        info!("Room transition {from:?} -> {to:?}");
    }
}

/// Shapes on layers accepted by `mask`
fn scoped(gathered: &[(CollisionLayers, Shape)], mask: CollisionLayers) -> Vec<Shape> {
    gathered
        .iter()
        .filter(|(layer, _)| mask.accepts(*layer))
        .map(|(_, shape)| *shape)
        .collect()
}
