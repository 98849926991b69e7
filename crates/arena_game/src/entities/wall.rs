//! Free-standing walls inside a room

use arena_engine::debug::{Color, DrawSurface};
use arena_engine::physics::{Aabb, Collidable, CollisionShape, CollisionState};

use crate::entities::{EntityId, FrameContext, Shape};

/// An immovable box obstacle
#[derive(Debug, Clone)]
pub struct Wall {
    id: EntityId,
    room: EntityId,
    shapes: Vec<Shape>,
    collisions: CollisionState<EntityId>,
}

impl Wall {
    /// Create a wall of `room` filling `bounds`
    pub fn new(id: EntityId, room: EntityId, bounds: Aabb) -> Self {
        Self {
            id,
            room,
            shapes: vec![CollisionShape::new_box(id, bounds)],
            collisions: CollisionState::new(),
        }
    }

    /// Wall id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Room the wall stands in
    pub fn room(&self) -> EntityId {
        self.room
    }

    /// Box of the wall
    pub fn bounds(&self) -> Aabb {
        self.shapes
            .first()
            .map_or_else(|| Aabb::from_xywh(0.0, 0.0, 0.0, 0.0), Shape::bounding_box)
    }

    /// Draw; colliders only tint the outline in debug mode
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, surface: &mut dyn DrawSurface) {
        let bounds = self.bounds();
        let border = if ctx.config.debug_draw && self.collisions.is_colliding() {
            Color::RED
        } else {
            Color::GRAY
        };
        surface.draw_rect(bounds.location, bounds.size, border, Some(Color::GRAY));
    }
}

impl Collidable<EntityId> for Wall {
    fn collision_owner(&self) -> EntityId {
        self.id
    }

    fn collision_shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn collision_state_mut(&mut self) -> &mut CollisionState<EntityId> {
        &mut self.collisions
    }

    fn collision_state(&self) -> &CollisionState<EntityId> {
        &self.collisions
    }
}
