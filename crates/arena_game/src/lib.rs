//! # Arena Game
//!
//! Room-and-door melee arena on top of `arena_engine`: a player and enemies
//! that move, collide and fight with swung weapons.
//!
//! ## Features
//!
//! - **Entities**: Player, enemies, doors, walls, rooms, room transitions, weapons
//! - **Combat**: Knockback and invincibility windows, weapon swing arcs with hitboxes
//! - **Rooms**: Doorways, lockable doors, transitions between paired rooms
//! - **World**: Frame driver with a fixed gather, resolve, update order
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_engine::prelude::*;
//! use arena_game::prelude::*;
//!
//! let clock = ManualClock::starting_at(0.0);
//! let mut world = World::new(GameConfig::default(), Box::new(clock.clone()));
//! let room = world.spawn_room(Aabb::from_xywh(17.0, 17.0, 990.0, 700.0));
//! world.spawn_player(Point2::new(300.0, 300.0)).unwrap();
//! world.spawn_enemy(room, Point2::new(700.0, 300.0), EnemyBehavior::TargetDummy).unwrap();
//!
//! let mut surface = RecordingSurface::new(Size::new(1024.0, 768.0));
//! for _ in 0..10 {
//!     clock.advance(1.0 / 60.0);
//!     world.step(&mut surface);
//! }
//! assert_eq!(world.frame_count(), 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod combat;
pub mod config;
pub mod direction;
pub mod entities;
pub mod error;
pub mod events;
pub mod world;

#[cfg(test)]
mod tests;

/// Common imports for game users
pub mod prelude {
    pub use crate::{
        config::GameConfig,
        direction::Direction,
        entities::{
            EnemyBehavior, EnemyState, EntityId, EntityKind, Side, WeaponKind, WeaponState,
        },
        error::{GameError, GameResult},
        events::GameEvent,
        world::{DoorPair, World},
    };
}
