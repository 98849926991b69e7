//! Game configuration
//!
//! Every tunable lives here with its shipping default. Files may set any
//! subset of fields; missing ones keep their defaults.

use arena_engine::config::Config;
use arena_engine::input::KeyCode;
use serde::{Deserialize, Serialize};

use crate::entities::weapon::WeaponKind;

/// Top-level game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Draw collision shapes and activation areas
    pub debug_draw: bool,

    /// Player tuning
    pub player: PlayerConfig,

    /// Enemy tuning
    pub enemy: EnemyConfig,

    /// Damage and timer windows
    pub combat: CombatConfig,

    /// Door tuning
    pub door: DoorConfig,

    /// Room geometry and transitions
    pub room: RoomConfig,

    /// Per-weapon swing profiles
    pub weapons: WeaponsConfig,

    /// Key bindings
    pub controls: ControlsConfig,
}

impl Config for GameConfig {}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Side of the player's square body
    pub size: f32,

    /// Movement speed in pixels per second
    pub speed: f32,

    /// Starting health
    pub max_health: u32,
}

/// Enemy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Body radius
    pub radius: f32,

    /// Chase speed in pixels per second
    pub speed: f32,

    /// Starting health
    pub max_health: u32,

    /// Speed while being knocked back
    pub knockback_speed: f32,

    /// How close the player must be before a chaser moves
    pub aggro: Aggro,
}

/// Range at which chasers start moving towards the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Aggro {
    /// Chase wherever the player is
    Everywhere,
    /// Chase only while the player is within this radius
    Radius(f32),
}

impl Aggro {
    /// Radius of the aggro circle, if chasing is limited
    pub fn radius(self) -> Option<f32> {
        match self {
            Self::Everywhere => None,
            Self::Radius(radius) => Some(radius),
        }
    }
}

/// Combat configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Damage the player takes from touching an enemy or an enemy weapon
    pub contact_damage: u32,

    /// Damage an enemy takes from a swinging player weapon
    pub weapon_damage: u32,

    /// Seconds between two hits on the player
    pub player_damage_cooldown: f64,

    /// Seconds an enemy is pushed back after a hit
    pub knockback_duration: f64,

    /// Seconds after a hit until an enemy can be damaged again
    pub invincibility_duration: f64,
}

/// Door configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// How far the interact area extends past the door leaf
    pub activation_padding: f32,

    /// Lock the doors of a room while it still holds hostile enemies
    pub lock_while_enemies_alive: bool,
}

/// Room configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Thickness of generated boundary walls
    pub wall_thickness: f32,

    /// Width of the gap cut for a doorway
    pub doorway_width: f32,

    /// Depth of the trigger volume placed beyond a doorway
    pub transition_depth: f32,

    /// Seconds during which enemies freeze after entering a room
    pub transition_duration: f64,
}

/// Swing profile of one weapon kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Total sweep in degrees
    pub arc_degrees: f32,

    /// Degrees per second while swinging out
    pub swing_rate: f32,

    /// Degrees per second while returning
    pub return_rate: f32,

    /// Number of circular hitboxes chained along the blade
    pub hitbox_count: usize,

    /// Radius of each hitbox
    pub hitbox_radius: f32,

    /// Distance between consecutive hitbox centers
    pub hitbox_spacing: f32,

    /// Gap between the wielder's edge and the first hitbox center
    pub reach_offset: f32,
}

/// Weapon profiles by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponsConfig {
    /// The player's sword
    pub sword: WeaponProfile,

    /// Claw of clawed enemies
    pub claw: WeaponProfile,

    /// Sword carried by armed enemies
    pub enemy_sword: WeaponProfile,
}

impl WeaponsConfig {
    /// Profile for a weapon kind
    pub fn profile(&self, kind: WeaponKind) -> &WeaponProfile {
        match kind {
            WeaponKind::Sword => &self.sword,
            WeaponKind::Claw => &self.claw,
            WeaponKind::EnemySword => &self.enemy_sword,
        }
    }
}

/// Controls configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Move up
    pub up: KeyCode,

    /// Move down
    pub down: KeyCode,

    /// Move left
    pub left: KeyCode,

    /// Move right
    pub right: KeyCode,

    /// Swing the weapon
    pub attack: KeyCode,

    /// Open or close a nearby door
    pub interact: KeyCode,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 56.0,
            speed: 240.0,
            max_health: 100,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            speed: 120.0,
            max_health: 30,
            knockback_speed: 400.0,
            aggro: Aggro::Radius(320.0),
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            contact_damage: 10,
            weapon_damage: 10,
            player_damage_cooldown: 0.5,
            knockback_duration: 0.25,
            invincibility_duration: 0.5,
        }
    }
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            activation_padding: 30.0,
            lock_while_enemies_alive: true,
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            wall_thickness: 6.0,
            doorway_width: 96.0,
            transition_depth: 12.0,
            transition_duration: 0.5,
        }
    }
}

impl Default for WeaponsConfig {
    fn default() -> Self {
        Self {
            sword: WeaponProfile {
                arc_degrees: 135.0,
                swing_rate: 540.0,
                return_rate: 540.0,
                hitbox_count: 4,
                hitbox_radius: 6.0,
                hitbox_spacing: 10.0,
                reach_offset: 8.0,
            },
            claw: WeaponProfile {
                arc_degrees: 90.0,
                swing_rate: 360.0,
                return_rate: 360.0,
                hitbox_count: 1,
                hitbox_radius: 10.0,
                hitbox_spacing: 0.0,
                reach_offset: 6.0,
            },
            enemy_sword: WeaponProfile {
                arc_degrees: 120.0,
                swing_rate: 360.0,
                return_rate: 360.0,
                hitbox_count: 3,
                hitbox_radius: 6.0,
                hitbox_spacing: 10.0,
                reach_offset: 8.0,
            },
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            up: KeyCode::W,
            down: KeyCode::S,
            left: KeyCode::A,
            right: KeyCode::D,
            attack: KeyCode::Space,
            interact: KeyCode::E,
        }
    }
}
