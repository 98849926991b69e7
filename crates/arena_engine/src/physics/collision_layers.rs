//! Collision layer system for scoping candidate lists
//!
//! Each shape is gathered under its owner's layer; each consumer asks only
//! for the layers in its mask. There is no broad phase beyond this filter.

use bitflags::bitflags;

bitflags! {
    /// Collision layer definitions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Room boundary walls
        const ROOM = 1 << 0;
        /// Free-standing walls and pillars
        const WALL = 1 << 1;
        /// Door leaves (blocking while closed)
        const DOOR = 1 << 2;
        /// Player character layer
        const PLAYER = 1 << 3;
        /// Enemy character layer
        const ENEMY = 1 << 4;
        /// Hitboxes of weapons wielded by the player
        const PLAYER_WEAPON = 1 << 5;
        /// Hitboxes of weapons wielded by enemies
        const ENEMY_WEAPON = 1 << 6;
        /// Trigger volumes (no physical response)
        const TRIGGER = 1 << 7;

        /// Everything that blocks movement
        const OBSTACLES = Self::ROOM.bits() | Self::WALL.bits() | Self::DOOR.bits();
    }
}

impl CollisionLayers {
    /// Check if a shape on `layer` belongs in a candidate list for `mask`
    pub fn accepts(self, layer: CollisionLayers) -> bool {
        self.intersects(layer)
    }

    /// Check if two layer/mask pairs should see each other
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        mask_b.accepts(layer_a) && mask_a.accepts(layer_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Player weapons look for enemies, enemies only look at obstacles here
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER_WEAPON,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::OBSTACLES,
        ));
    }

    #[test]
    fn test_obstacles_mask() {
        let mask = CollisionLayers::OBSTACLES;
        assert!(mask.accepts(CollisionLayers::ROOM));
        assert!(mask.accepts(CollisionLayers::DOOR));
        assert!(!mask.accepts(CollisionLayers::PLAYER));
    }
}
