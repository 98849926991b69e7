//! Trigger volumes that move the player between rooms

use arena_engine::debug::{Color, DrawSurface};
use arena_engine::physics::{Aabb, Collidable, CollisionShape, CollisionState};
use log::info;

use crate::entities::{EntityId, FrameContext, Shape, Side};
use crate::events::GameEvent;

/// Trigger placed just beyond a doorway of `from`
#[derive(Debug, Clone)]
pub struct RoomTransition {
    id: EntityId,
    from: EntityId,
    to: EntityId,
    side: Side,
    shapes: Vec<Shape>,
    collisions: CollisionState<EntityId>,
    player_inside: bool,
}

impl RoomTransition {
    /// Create a trigger leading from `from` to `to` through `side`
    pub fn new(id: EntityId, from: EntityId, to: EntityId, side: Side, bounds: Aabb) -> Self {
        Self {
            id,
            from,
            to,
            side,
            shapes: vec![CollisionShape::new_box(id, bounds)],
            collisions: CollisionState::new(),
            player_inside: false,
        }
    }

    /// Trigger id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Room being left
    pub fn from(&self) -> EntityId {
        self.from
    }

    /// Room being entered
    pub fn to(&self) -> EntityId {
        self.to
    }

    /// Side of `from` the trigger sits on
    pub fn side(&self) -> Side {
        self.side
    }

    /// Box of the trigger
    pub fn bounds(&self) -> Aabb {
        self.shapes
            .first()
            .map_or_else(|| Aabb::from_xywh(0.0, 0.0, 0.0, 0.0), Shape::bounding_box)
    }

    /// Fire once when the player walks in, otherwise draw
    pub fn update(&mut self, ctx: &mut FrameContext<'_>, surface: &mut dyn DrawSurface) {
        let player_inside = ctx
            .player
            .is_some_and(|player| self.collisions.is_colliding_with(player));

        if player_inside {
            if !self.player_inside && !ctx.transition_in_progress {
                info!("Leaving room {:?} for {:?} through {:?}", self.from, self.to, self.side);
                ctx.emit(GameEvent::RoomTransitionTriggered {
                    from: self.from,
                    to: self.to,
                    side: self.side,
                });
            }
        } else if ctx.config.debug_draw {
            let bounds = self.bounds();
            surface.draw_rect(bounds.location, bounds.size, Color::TRIGGER, Some(Color::TRIGGER));
        }
        self.player_inside = player_inside;
    }
}

impl Collidable<EntityId> for RoomTransition {
    fn collision_owner(&self) -> EntityId {
        self.id
    }

    fn collision_shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn collision_state_mut(&mut self) -> &mut CollisionState<EntityId> {
        &mut self.collisions
    }

    fn collision_state(&self) -> &CollisionState<EntityId> {
        &self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entities::FrameOutput;
    use arena_engine::debug::RecordingSurface;
    use arena_engine::foundation::math::{Point2, Size};
    use slotmap::{SecondaryMap, SlotMap};

    struct Fixture {
        config: GameConfig,
        output: FrameOutput,
        player: EntityId,
        trigger: RoomTransition,
    }

    impl Fixture {
        fn new() -> Self {
            let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
            let from = arena.insert(());
            let to = arena.insert(());
            let id = arena.insert(());
            let player = arena.insert(());
            let bounds = Aabb::from_xywh(464.0, 5.0, 96.0, 12.0);
            Self {
                config: GameConfig::default(),
                output: FrameOutput::default(),
                player,
                trigger: RoomTransition::new(id, from, to, Side::Top, bounds),
            }
        }

        fn step(&mut self, player_top: f32, transition_in_progress: bool) {
            let body = CollisionShape::new_box(
                self.player,
                Aabb::new(Point2::new(484.0, player_top), Size::square(56.0)),
            );
            self.trigger.check_for_collisions_with(&[body]);

            let snapshots = SecondaryMap::new();
            let mut surface = RecordingSurface::new(Size::new(1024.0, 768.0));
            let mut ctx = FrameContext {
                now: 0.0,
                dt: 0.0,
                config: &self.config,
                snapshots: &snapshots,
                player: Some(self.player),
                transition_in_progress,
                output: &mut self.output,
            };
            self.trigger.update(&mut ctx, &mut surface);
        }

        fn fired(&self) -> usize {
            self.output.events.len()
        }
    }

    #[test]
    fn test_fires_once_per_entry() {
        let mut fixture = Fixture::new();
        fixture.step(40.0, false);
        assert_eq!(fixture.fired(), 0);

        fixture.step(16.0, false);
        fixture.step(12.0, false);
        assert_eq!(fixture.fired(), 1);
        assert!(matches!(
            fixture.output.events[0],
            GameEvent::RoomTransitionTriggered { side: Side::Top, .. }
        ));

        // Leaving and walking back in fires again
        fixture.step(40.0, false);
        fixture.step(16.0, false);
        assert_eq!(fixture.fired(), 2);
    }

    #[test]
    fn test_silent_during_transition() {
        let mut fixture = Fixture::new();
        fixture.step(16.0, true);
        fixture.step(16.0, false);
        assert_eq!(fixture.fired(), 0);
    }
}
