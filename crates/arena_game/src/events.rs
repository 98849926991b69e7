//! Game events delivered through the world's event bus

use crate::entities::{EntityId, EntityKind, Side};

/// Something other systems may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// An entity's health reached zero; sent exactly once per entity
    EntityDied {
        /// The entity that died
        id: EntityId,
        /// What it was
        kind: EntityKind,
    },

    /// The player walked into the trigger beyond a doorway
    RoomTransitionTriggered {
        /// Room being left
        from: EntityId,
        /// Room being entered
        to: EntityId,
        /// Side of `from` the doorway is on
        side: Side,
    },

    /// A room transition finished; enemies of `room` wake up
    RoomEntered {
        /// The new active room
        room: EntityId,
    },

    /// A door was opened or closed by the player
    DoorToggled {
        /// The door
        door: EntityId,
        /// New state
        open: bool,
    },

    /// The player died
    GameOver,
}
