//! Collision geometry
//!
//! Discrete, end-of-frame, position-based intersection tests. Nothing here
//! sweeps shapes through time or computes contact responses.
//!
//! # Module Organization
//!
//! - [`primitives`] - Boxes, circles and their pairwise tests
//! - [`shape`] - Owner-tagged shapes with variant dispatch and batch queries
//!
//! # Key Types
//!
//! - [`CollisionShape`] - Geometry plus a non-owning owner handle
//! - [`Aabb`], [`Circle`] - Primitive geometric types

pub mod primitives;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Aabb, Circle, box_intersects_box, circle_intersects_box, circle_intersects_circle};
pub use shape::{CollisionShape, ShapeKind};
