//! High-level collision shape abstractions
//!
//! A [`CollisionShape`] pairs a primitive with a handle to the entity it
//! stands for. The handle is only used to attribute results; the shape never
//! keeps its owner alive and the owner creates and mutates its shapes.

use crate::foundation::math::{Point2, Vec2};
use super::primitives::{box_intersects_box, circle_intersects_box, circle_intersects_circle, Aabb, Circle};

/// Geometry of a collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned box
    Box(Aabb),
    /// Circle
    Circle(Circle),
}

impl ShapeKind {
    /// Test if this geometry intersects another
    ///
    /// Box/circle pairs use the circle's bounding square in both directions,
    /// so the answer never depends on argument order.
    pub fn intersects(&self, other: &ShapeKind) -> bool {
        match (self, other) {
            (Self::Box(a), Self::Box(b)) => box_intersects_box(a, b),
            (Self::Circle(a), Self::Circle(b)) => circle_intersects_circle(a, b),
            (Self::Circle(circle), Self::Box(aabb)) |
            (Self::Box(aabb), Self::Circle(circle)) => circle_intersects_box(circle, aabb),
        }
    }

    /// Box location is the top-left corner, circle location is the center
    pub fn location(&self) -> Point2 {
        match self {
            Self::Box(aabb) => aabb.location,
            Self::Circle(circle) => circle.location,
        }
    }

    /// Tightest axis-aligned box around the geometry
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Self::Box(aabb) => *aabb,
            Self::Circle(circle) => circle.bounding_square(),
        }
    }
}

/// A collision shape tagged with its owner
///
/// `O` is a cheap handle (an arena key or id), never a reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionShape<O> {
    kind: ShapeKind,
    owner: O,
}

impl<O: Copy + PartialEq> CollisionShape<O> {
    /// Creates a box shape owned by `owner`
    pub fn new_box(owner: O, aabb: Aabb) -> Self {
        Self { kind: ShapeKind::Box(aabb), owner }
    }

    /// Creates a circle shape owned by `owner`
    pub fn new_circle(owner: O, circle: Circle) -> Self {
        Self { kind: ShapeKind::Circle(circle), owner }
    }

    /// The entity this shape stands for
    pub fn owner(&self) -> O {
        self.owner
    }

    /// The underlying geometry
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Box location is the top-left corner, circle location is the center
    pub fn location(&self) -> Point2 {
        self.kind.location()
    }

    /// Move the shape so its anchor sits at `location`
    pub fn set_location(&mut self, location: Point2) {
        match &mut self.kind {
            ShapeKind::Box(aabb) => aabb.location = location,
            ShapeKind::Circle(circle) => circle.location = location,
        }
    }

    /// Move the shape by `offset`
    pub fn translate(&mut self, offset: Vec2) {
        let location = self.location() + offset;
        self.set_location(location);
    }

    /// Tightest axis-aligned box around the shape
    pub fn bounding_box(&self) -> Aabb {
        self.kind.bounding_box()
    }

    /// Test if this shape intersects another
    pub fn is_colliding(&self, other: &CollisionShape<O>) -> bool {
        self.kind.intersects(&other.kind)
    }

    /// Candidates that intersect this shape, in candidate order
    ///
    /// No deduplication happens here: several shapes of one owner can all
    /// appear. Resolving to distinct owners is done by the caller.
    pub fn colliding_with_shapes<'a>(
        &self,
        candidates: &'a [CollisionShape<O>],
    ) -> Vec<&'a CollisionShape<O>> {
        candidates
            .iter()
            .filter(|candidate| self.is_colliding(candidate))
            .collect()
    }
}
