//! # Arena Engine
//!
//! Frame-stepped 2D collision core for room-based arena games.
//!
//! ## Features
//!
//! - **Collision Geometry**: Boxes, circles and their discrete intersection tests
//! - **Per-Owner Resolution**: "Who overlaps me this frame?" against flat candidate lists
//! - **Layer Scoping**: Bitflag layers to build per-consumer candidate lists
//! - **Injectable Time**: Clock trait, frame timer and cooldowns for deterministic tests
//! - **Event Bus**: Subscription registry drained between frames
//! - **Config**: Serde configs loaded from RON or TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_engine::prelude::*;
//!
//! let wall = CollisionShape::new_box(1u32, Aabb::from_xywh(0.0, 0.0, 100.0, 6.0));
//! let hero = CollisionShape::new_circle(2u32, Circle::new(Point2::new(50.0, 8.0), 4.0));
//! assert!(hero.is_colliding(&wall));
//! assert!(wall.is_colliding(&hero));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod physics;
pub mod events;
pub mod config;
pub mod debug;
pub mod input;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::{
            math::{Point2, Size, Vec2},
            time::{Clock, Cooldown, FrameTimer, ManualClock, SystemClock},
        },
        physics::{
            Aabb, Activatable, Circle, Collidable, CollisionLayers, CollisionShape,
            CollisionState, ShapeKind,
        },
        events::{EventBus, EventHandler, SubscriptionId},
        config::{Config, ConfigError, ConfigFormat},
        debug::{Color, DrawCommand, DrawSurface, RecordingSurface},
        input::{KeyCode, KeyboardState},
    };
}
