//! Per-owner collision resolution
//!
//! Every collidable entity answers "who overlaps me this frame?" against a
//! flat candidate list and keeps the answer until its own update runs.
//!
//! Ordering contract: all `check_for_*` calls for a frame must finish before
//! any entity consumes its state. Results are replaced on every check, never
//! accumulated, so a missed check leaves last frame's answer in place.

use super::collision::CollisionShape;

/// Distinct owners of every candidate overlapping any of `shapes`
///
/// Owners appear once, in first-seen candidate order. `me` is never
/// reported, even when candidates include my own shapes.
pub fn colliding_owners<O: Copy + PartialEq>(
    me: O,
    shapes: &[CollisionShape<O>],
    candidates: &[CollisionShape<O>],
) -> Vec<O> {
    let mut owners: Vec<O> = Vec::new();
    for candidate in candidates {
        let owner = candidate.owner();
        if owner == me || owners.contains(&owner) {
            continue;
        }
        if shapes.iter().any(|shape| shape.is_colliding(candidate)) {
            owners.push(owner);
        }
    }
    owners
}

/// Entities an owner currently overlaps
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionState<O> {
    colliding_with: Vec<O>,
}

impl<O> Default for CollisionState<O> {
    fn default() -> Self {
        Self { colliding_with: Vec::new() }
    }
}

impl<O: Copy + PartialEq> CollisionState<O> {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored result with this frame's owners
    pub fn replace(&mut self, owners: Vec<O>) {
        self.colliding_with = owners;
    }

    /// Forget every recorded collision
    pub fn clear(&mut self) {
        self.colliding_with.clear();
    }

    /// Check if we're currently colliding with any entity
    pub fn is_colliding(&self) -> bool {
        !self.colliding_with.is_empty()
    }

    /// Check if we're colliding with a specific entity
    pub fn is_colliding_with(&self, owner: O) -> bool {
        self.colliding_with.contains(&owner)
    }

    /// All entities we're currently colliding with, in first-seen order
    pub fn entities(&self) -> &[O] {
        &self.colliding_with
    }

    /// Get the number of entities we're colliding with
    pub fn collision_count(&self) -> usize {
        self.colliding_with.len()
    }
}

/// Something that occupies space and wants to know what overlaps it
pub trait Collidable<O: Copy + PartialEq> {
    /// Identity used to exclude self from results
    fn collision_owner(&self) -> O;

    /// Shapes currently occupied; may be empty (an open door, a resting weapon)
    fn collision_shapes(&self) -> &[CollisionShape<O>];

    /// Storage for `entities_colliding_with_me`
    fn collision_state_mut(&mut self) -> &mut CollisionState<O>;

    /// Read access to `entities_colliding_with_me`
    fn collision_state(&self) -> &CollisionState<O>;

    /// Record the owners of every candidate that overlaps one of my shapes
    fn check_for_collisions_with(&mut self, candidates: &[CollisionShape<O>]) {
        let owners = colliding_owners(self.collision_owner(), self.collision_shapes(), candidates);
        self.collision_state_mut().replace(owners);
    }

    /// Entities found by the last check
    fn entities_colliding_with_me(&self) -> &[O] {
        self.collision_state().entities()
    }
}

/// Something with a non-blocking trigger area next to its physical shape
///
/// Doors use it for the interact radius, enemies for their aggro radius.
pub trait Activatable<O: Copy + PartialEq> {
    /// Identity used to exclude self from results
    fn activation_owner(&self) -> O;

    /// Trigger shapes, usually larger than the collision shapes
    fn activation_shapes(&self) -> &[CollisionShape<O>];

    /// Storage for `entities_activating_me`
    fn activation_state_mut(&mut self) -> &mut CollisionState<O>;

    /// Read access to `entities_activating_me`
    fn activation_state(&self) -> &CollisionState<O>;

    /// Record the owners of every candidate inside my activation area
    fn check_for_activations_with(&mut self, candidates: &[CollisionShape<O>]) {
        let owners = colliding_owners(self.activation_owner(), self.activation_shapes(), candidates);
        self.activation_state_mut().replace(owners);
    }

    /// Entities found by the last activation check
    fn entities_activating_me(&self) -> &[O] {
        self.activation_state().entities()
    }
}
