//! Physics module for collision detection
//!
//! Provides brute-force collision detection between 2D boxes and circles,
//! layer filtering for candidate lists, and the per-owner resolution
//! contracts consumed by gameplay code.

pub mod collision;
pub mod collision_layers;
pub mod collision_state;

pub use collision::{
    Aabb,
    Circle,
    CollisionShape,
    ShapeKind,
};
pub use collision_layers::CollisionLayers;
pub use collision_state::{Activatable, Collidable, CollisionState, colliding_owners};
