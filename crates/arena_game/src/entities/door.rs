//! Doors cut into room boundaries
//!
//! A door tracks two things independently: who stands in its doorway (the
//! leaf box, blocking only while closed) and who is close enough to use it
//! (the padded activation box).

use arena_engine::debug::{Color, DrawSurface};
use arena_engine::input::KeyCode;
use arena_engine::physics::{
    colliding_owners, Aabb, Activatable, Collidable, CollisionShape, CollisionState,
};
use log::{debug, info};

use crate::config::{ControlsConfig, DoorConfig};
use crate::entities::{EntityId, FrameContext, Shape, Side};

/// A door that can be opened, closed and locked
#[derive(Debug, Clone)]
pub struct Door {
    id: EntityId,
    room: EntityId,
    side: Side,
    leads_to: Option<EntityId>,
    leaf: Vec<Shape>,
    activation: Vec<Shape>,
    open: bool,
    locked: bool,
    collisions: CollisionState<EntityId>,
    activations: CollisionState<EntityId>,
}

impl Door {
    /// Create a closed, unlocked door filling `leaf`
    pub fn new(id: EntityId, room: EntityId, side: Side, leaf: Aabb, config: &DoorConfig) -> Self {
        Self {
            id,
            room,
            side,
            leads_to: None,
            leaf: vec![CollisionShape::new_box(id, leaf)],
            activation: vec![CollisionShape::new_box(id, leaf.padded(config.activation_padding))],
            open: false,
            locked: false,
            collisions: CollisionState::new(),
            activations: CollisionState::new(),
        }
    }

    /// Door id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Room the door belongs to
    pub fn room(&self) -> EntityId {
        self.room
    }

    /// Wall of the room the door sits in
    pub fn side(&self) -> Side {
        self.side
    }

    /// Room on the other side, if paired
    pub fn leads_to(&self) -> Option<EntityId> {
        self.leads_to
    }

    /// Pair the door with a neighbouring room
    pub fn set_leads_to(&mut self, room: EntityId) {
        self.leads_to = Some(room);
    }

    /// Box of the door leaf
    pub fn leaf(&self) -> Aabb {
        self.leaf
            .first()
            .map_or_else(|| Aabb::from_xywh(0.0, 0.0, 0.0, 0.0), Shape::bounding_box)
    }

    /// True while open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True while locked
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// True while something stands in the doorway
    pub fn is_occupied(&self) -> bool {
        self.collisions.is_colliding()
    }

    /// Lock the door, closing it as soon as the doorway is clear
    pub fn lock(&mut self) {
        if !self.locked {
            self.locked = true;
            debug!("Door {:?} locked", self.id);
        }
        if self.open && !self.is_occupied() {
            self.open = false;
        }
    }

    /// Unlock the door; it stays closed until used
    pub fn unlock(&mut self) {
        if self.locked {
            self.locked = false;
            debug!("Door {:?} unlocked", self.id);
        }
    }

    /// Open or close the door; refused while locked or while closing onto someone
    pub fn toggle(&mut self) -> bool {
        if self.locked {
            debug!("Door {:?} is locked", self.id);
            return false;
        }
        if self.open && self.is_occupied() {
            debug!("Door {:?} is blocked", self.id);
            return false;
        }
        self.open = !self.open;
        info!("Door {:?} {}", self.id, if self.open { "opened" } else { "closed" });
        true
    }

    /// Handle a key press; toggles when the player is in reach and presses interact
    ///
    /// Returns true when the door changed state.
    pub fn key_pressed(&mut self, code: KeyCode, controls: &ControlsConfig, player: EntityId) -> bool {
        if code != controls.interact || !self.activations.is_colliding_with(player) {
            return false;
        }
        self.toggle()
    }

    /// Close a locked door once the doorway clears, then draw
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, surface: &mut dyn DrawSurface) {
        if self.locked && self.open && !self.is_occupied() {
            self.open = false;
            debug!("Door {:?} closed behind the player", self.id);
        }
        self.draw(ctx, surface);
    }

    fn draw(&self, ctx: &FrameContext<'_>, surface: &mut dyn DrawSurface) {
        let leaf = self.leaf();
        if self.open {
            surface.draw_rect(leaf.location, leaf.size, Color::BROWN, None);
        } else {
            let fill = if self.locked { Color::GRAY } else { Color::BROWN };
            surface.draw_rect(leaf.location, leaf.size, Color::BROWN, Some(fill));
        }

        if ctx.config.debug_draw {
            let color = if self.activations.is_colliding() { Color::GREEN } else { Color::TRIGGER };
            for area in &self.activation {
                let bounds = area.bounding_box();
                surface.draw_rect(bounds.location, bounds.size, color, None);
            }
        }
    }
}

impl Collidable<EntityId> for Door {
    fn collision_owner(&self) -> EntityId {
        self.id
    }

    /// The leaf blocks only while closed
    fn collision_shapes(&self) -> &[Shape] {
        if self.open {
            &[]
        } else {
            &self.leaf
        }
    }

    fn collision_state_mut(&mut self) -> &mut CollisionState<EntityId> {
        &mut self.collisions
    }

    fn collision_state(&self) -> &CollisionState<EntityId> {
        &self.collisions
    }

    // Occupancy is tracked against the leaf whether open or closed
    fn check_for_collisions_with(&mut self, candidates: &[Shape]) {
        let owners = colliding_owners(self.id, &self.leaf, candidates);
        self.collisions.replace(owners);
    }
}

impl Activatable<EntityId> for Door {
    fn activation_owner(&self) -> EntityId {
        self.id
    }

    fn activation_shapes(&self) -> &[Shape] {
        &self.activation
    }

    fn activation_state_mut(&mut self) -> &mut CollisionState<EntityId> {
        &mut self.activations
    }

    fn activation_state(&self) -> &CollisionState<EntityId> {
        &self.activations
    }
}
