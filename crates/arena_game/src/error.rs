//! Error types for world construction

use arena_engine::config::ConfigError;
use thiserror::Error;

use crate::entities::EntityId;

/// Errors raised while building or driving a world
#[derive(Error, Debug)]
pub enum GameError {
    /// No entity with this id
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// The entity exists but is of another kind
    #[error("entity {id:?} is not a {expected}")]
    WrongEntityKind {
        /// Offending entity
        id: EntityId,
        /// Kind the caller needed
        expected: &'static str,
    },

    /// Operation needs a player and none was spawned
    #[error("no player has been spawned")]
    NoPlayer,

    /// A player already exists
    #[error("a player already exists: {0:?}")]
    PlayerAlreadySpawned(EntityId),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for game operations
pub type GameResult<T> = Result<T, GameError>;
