//! Primitive collision shapes and intersection algorithms
//!
//! Provides the two 2D primitives used by every collider (axis-aligned boxes
//! and circles) together with their pairwise intersection tests.
//!
//! All tests are discrete and inclusive: shapes that merely touch are
//! reported as intersecting.

use crate::foundation::math::{Point2, Size, Vec2};

/// Axis-aligned box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner in screen space
    pub location: Point2,
    /// Extent to the right and downwards
    pub size: Size,
}

impl Aabb {
    /// Creates a new box from its top-left corner and size
    pub fn new(location: Point2, size: Size) -> Self {
        Self { location, size }
    }

    /// Creates a box from raw coordinates
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Point2::new(x, y), Size::new(width, height))
    }

    /// Creates a box of `size` centered on `center`
    pub fn centered(center: Point2, size: Size) -> Self {
        Self::new(
            Point2::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size,
        )
    }

    /// Left edge
    pub fn left(&self) -> f32 {
        self.location.x
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.location.x + self.size.width
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.location.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.location.y + self.size.height
    }

    /// Center point of the box
    pub fn center(&self) -> Point2 {
        Point2::new(
            self.location.x + self.size.width / 2.0,
            self.location.y + self.size.height / 2.0,
        )
    }

    /// Same box grown by `padding` on every side
    pub fn padded(&self, padding: f32) -> Self {
        Self::new(
            Point2::new(self.location.x - padding, self.location.y - padding),
            self.size.padded(padding),
        )
    }

    /// Separating-axis test against another box
    pub fn intersects(&self, other: &Aabb) -> bool {
        box_intersects_box(self, other)
    }
}

/// A circle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// The center position of the circle
    pub location: Point2,
    /// The radius of the circle
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle with the given center and radius
    pub fn new(location: Point2, radius: f32) -> Self {
        Self { location, radius }
    }

    /// Smallest axis-aligned square containing the circle
    pub fn bounding_square(&self) -> Aabb {
        Aabb::new(
            self.location - Vec2::new(self.radius, self.radius),
            Size::square(self.radius * 2.0),
        )
    }

    /// Check if this circle intersects with another
    pub fn intersects(&self, other: &Circle) -> bool {
        circle_intersects_circle(self, other)
    }
}

/// True unless the boxes are separated along X or Y
///
/// Exact edge contact counts as an overlap.
pub fn box_intersects_box(a: &Aabb, b: &Aabb) -> bool {
    let separated_x = a.right() < b.left() || b.right() < a.left();
    let separated_y = a.bottom() < b.top() || b.bottom() < a.top();
    !(separated_x || separated_y)
}

/// True iff the squared center distance is within the squared radius sum
pub fn circle_intersects_circle(a: &Circle, b: &Circle) -> bool {
    let distance_squared = (a.location - b.location).norm_squared();
    let radius_sum = a.radius + b.radius;
    distance_squared <= radius_sum * radius_sum
}

/// Circle against box, approximated by the circle's bounding square
///
/// Reports overlaps near box corners that a true circle-rectangle test
/// would reject.
pub fn circle_intersects_box(circle: &Circle, aabb: &Aabb) -> bool {
    box_intersects_box(&circle.bounding_square(), aabb)
}
