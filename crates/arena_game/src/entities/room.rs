//! Rooms and their boundary walls
//!
//! A room owns four boundary walls as box shapes. Doorways are gaps cut
//! into those walls; the wall shapes are rebuilt from the remaining
//! segments every time a doorway is cut.

use arena_engine::debug::{Color, DrawSurface};
use arena_engine::foundation::math::Point2;
use arena_engine::physics::{Aabb, Collidable, CollisionShape, CollisionState};
use log::trace;

use crate::entities::{EntityId, FrameContext, Shape};

/// Room sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Top wall
    Top,
    /// Bottom wall
    Bottom,
    /// Left wall
    Left,
    /// Right wall
    Right,
}

impl Side {
    /// Every side, in wall-building order
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    /// The side facing this one across a doorway
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Doorway {
    side: Side,
    offset: f32,
    width: f32,
}

/// A rectangular room
#[derive(Debug, Clone)]
pub struct Room {
    id: EntityId,
    bounds: Aabb,
    wall_thickness: f32,
    doorways: Vec<Doorway>,
    neighbours: Vec<(Side, EntityId)>,
    walls: Vec<Shape>,
    collisions: CollisionState<EntityId>,
}

impl Room {
    /// Create a closed room filling `bounds`
    pub fn new(id: EntityId, bounds: Aabb, wall_thickness: f32) -> Self {
        let mut room = Self {
            id,
            bounds,
            wall_thickness,
            doorways: Vec::new(),
            neighbours: Vec::new(),
            walls: Vec::new(),
            collisions: CollisionState::new(),
        };
        room.rebuild_walls();
        room
    }

    /// Room id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Outer bounds, walls included
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Boundary wall thickness
    pub fn wall_thickness(&self) -> f32 {
        self.wall_thickness
    }

    /// Boundary wall segments
    pub fn walls(&self) -> &[Shape] {
        &self.walls
    }

    /// Neighbouring room through the doorway on `side`
    pub fn neighbour(&self, side: Side) -> Option<EntityId> {
        self.neighbours
            .iter()
            .find(|(neighbour_side, _)| *neighbour_side == side)
            .map(|(_, room)| *room)
    }

    /// Record the room on the other side of `side`
    pub fn add_neighbour(&mut self, side: Side, room: EntityId) {
        self.neighbours.retain(|(neighbour_side, _)| *neighbour_side != side);
        self.neighbours.push((side, room));
    }

    fn side_length(&self, side: Side) -> f32 {
        if side.is_horizontal() {
            self.bounds.size.width
        } else {
            self.bounds.size.height
        }
    }

    /// Offset along `side` that centers a doorway of `width`
    pub fn centered_offset(&self, side: Side, width: f32) -> f32 {
        ((self.side_length(side) - width) / 2.0).max(0.0)
    }

    /// Piece of the boundary wall on `side` spanning `start..start + length`
    pub fn wall_segment(&self, side: Side, start: f32, length: f32) -> Aabb {
        let t = self.wall_thickness;
        let b = self.bounds;
        match side {
            Side::Top => Aabb::from_xywh(b.left() + start, b.top(), length, t),
            Side::Bottom => Aabb::from_xywh(b.left() + start, b.bottom() - t, length, t),
            Side::Left => Aabb::from_xywh(b.left(), b.top() + start, t, length),
            Side::Right => Aabb::from_xywh(b.right() - t, b.top() + start, t, length),
        }
    }

    /// Cut a doorway into the wall on `side`; returns the gap's box
    pub fn cut_doorway(&mut self, side: Side, offset: f32, width: f32) -> Aabb {
        let width = width.min(self.side_length(side));
        let offset = offset.clamp(0.0, self.side_length(side) - width);
        self.doorways.push(Doorway { side, offset, width });
        self.rebuild_walls();
        trace!("Room {:?}: doorway on {side:?} at {offset}", self.id);
        self.wall_segment(side, offset, width)
    }

    /// Trigger volume just outside the doorway at `offset`
    pub fn transition_box(&self, side: Side, offset: f32, width: f32, depth: f32) -> Aabb {
        let b = self.bounds;
        match side {
            Side::Top => Aabb::from_xywh(b.left() + offset, b.top() - depth, width, depth),
            Side::Bottom => Aabb::from_xywh(b.left() + offset, b.bottom(), width, depth),
            Side::Left => Aabb::from_xywh(b.left() - depth, b.top() + offset, depth, width),
            Side::Right => Aabb::from_xywh(b.right(), b.top() + offset, depth, width),
        }
    }

    /// Where a body of `half_extent` appears when arriving through the
    /// doorway on `side`, just clear of the wall
    pub fn entry_point(&self, side: Side, offset: f32, width: f32, half_extent: f32) -> Point2 {
        const MARGIN: f32 = 1.0;
        let b = self.bounds;
        let inset = self.wall_thickness + half_extent + MARGIN;
        let along = offset + width / 2.0;
        match side {
            Side::Top => Point2::new(b.left() + along, b.top() + inset),
            Side::Bottom => Point2::new(b.left() + along, b.bottom() - inset),
            Side::Left => Point2::new(b.left() + inset, b.top() + along),
            Side::Right => Point2::new(b.right() - inset, b.top() + along),
        }
    }

    /// Offset and width of the doorway on `side`, if one was cut
    pub fn doorway(&self, side: Side) -> Option<(f32, f32)> {
        self.doorways
            .iter()
            .find(|doorway| doorway.side == side)
            .map(|doorway| (doorway.offset, doorway.width))
    }

    fn rebuild_walls(&mut self) {
        let mut walls = Vec::new();
        for side in Side::ALL {
            let length = self.side_length(side);
            let mut gaps: Vec<(f32, f32)> = self
                .doorways
                .iter()
                .filter(|doorway| doorway.side == side)
                .map(|doorway| (doorway.offset, doorway.offset + doorway.width))
                .collect();
            gaps.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut cursor = 0.0_f32;
            for (start, end) in gaps {
                if start > cursor {
                    walls.push(self.wall_segment(side, cursor, start - cursor));
                }
                cursor = cursor.max(end);
            }
            if cursor < length {
                walls.push(self.wall_segment(side, cursor, length - cursor));
            }
        }
        let id = self.id;
        self.walls = walls
            .into_iter()
            .map(|segment| CollisionShape::new_box(id, segment))
            .collect();
    }

    /// Draw the boundary walls
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, surface: &mut dyn DrawSurface) {
        let colliding = ctx.config.debug_draw && self.collisions.is_colliding();
        let border = if colliding { Color::RED } else { Color::GRAY };
        for wall in &self.walls {
            let bounds = wall.bounding_box();
            surface.draw_rect(bounds.location, bounds.size, border, Some(Color::GRAY));
        }
    }
}

impl Collidable<EntityId> for Room {
    fn collision_owner(&self) -> EntityId {
        self.id
    }

    fn collision_shapes(&self) -> &[Shape] {
        &self.walls
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
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn room() -> Room {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        Room::new(arena.insert(()), Aabb::from_xywh(17.0, 17.0, 990.0, 700.0), 6.0)
    }

    #[test]
    fn test_closed_room_has_four_walls() {
        let room = room();
        assert_eq!(room.walls().len(), 4);
        assert_eq!(room.walls()[0].bounding_box(), Aabb::from_xywh(17.0, 17.0, 990.0, 6.0));
        assert_eq!(room.walls()[3].bounding_box(), Aabb::from_xywh(1001.0, 17.0, 6.0, 700.0));
    }

    #[test]
    fn test_doorway_splits_wall() {
        let mut room = room();
        let offset = room.centered_offset(Side::Top, 96.0);
        let gap = room.cut_doorway(Side::Top, offset, 96.0);
        assert_eq!(room.walls().len(), 5);
        assert_relative_eq!(gap.left(), 17.0 + 447.0);
        assert_relative_eq!(gap.size.width, 96.0);

        let top: Vec<Aabb> = room
            .walls()
            .iter()
            .map(Shape::bounding_box)
            .filter(|wall| wall.top() == 17.0 && wall.size.height == 6.0)
            .collect();
        assert_eq!(top.len(), 2);
        assert_relative_eq!(top[0].right(), gap.left());
        assert_relative_eq!(top[1].left(), gap.right());
        assert!(room.walls().iter().all(|wall| !wall.bounding_box().intersects(&gap.padded(-0.5))));
    }

    #[test]
    fn test_doorway_at_corner_leaves_one_segment() {
        let mut room = room();
        room.cut_doorway(Side::Left, -10.0, 96.0);
        assert_eq!(room.walls().len(), 4);
        assert_eq!(room.doorway(Side::Left), Some((0.0, 96.0)));
    }

    #[test]
    fn test_entry_point_clears_wall() {
        let room = room();
        let point = room.entry_point(Side::Bottom, 447.0, 96.0, 28.0);
        assert_relative_eq!(point.x, 17.0 + 447.0 + 48.0);
        assert_relative_eq!(point.y, 717.0 - 6.0 - 28.0 - 1.0);
        assert_eq!(Side::Bottom.opposite(), Side::Top);
    }

    #[test]
    fn test_transition_box_sits_outside() {
        let room = room();
        let trigger = room.transition_box(Side::Top, 447.0, 96.0, 12.0);
        assert_relative_eq!(trigger.bottom(), room.bounds().top());
        assert!(!trigger.intersects(&room.bounds().padded(-0.5)));
    }
}
