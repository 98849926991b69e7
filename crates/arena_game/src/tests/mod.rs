//! Frame-level integration tests
//!
//! Whole frames are driven through [`World::step`] with a manual clock and a
//! recording surface, so every timer window is exact.

mod room_flow;

use std::cell::RefCell;
use std::rc::Rc;

use arena_engine::prelude::*;

use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::world::World;

/// Bounds used for every test room
pub(crate) const ROOM: (f32, f32, f32, f32) = (17.0, 17.0, 990.0, 700.0);

pub(crate) struct Harness {
    pub world: World,
    pub clock: ManualClock,
    pub surface: RecordingSurface,
    pub events: Rc<RefCell<Vec<GameEvent>>>,
}

impl Harness {
    pub fn new(config: GameConfig) -> Self {
        let clock = ManualClock::starting_at(0.0);
        let mut world = World::new(config, Box::new(clock.clone()));
        let events = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&events);
        world.subscribe(move |event: &GameEvent| {
            log.borrow_mut().push(*event);
            false
        });
        Self {
            world,
            clock,
            surface: RecordingSurface::new(Size::new(1024.0, 768.0)),
            events,
        }
    }

    pub fn room(&mut self) -> crate::entities::EntityId {
        let (x, y, w, h) = ROOM;
        self.world.spawn_room(Aabb::from_xywh(x, y, w, h))
    }

    /// Step one frame at an absolute time
    pub fn frame_at(&mut self, seconds: f64) {
        self.clock.set(seconds);
        self.surface.clear();
        self.world.step(&mut self.surface);
    }

    /// Step `count` frames of `dt` seconds
    pub fn frames(&mut self, count: usize, dt: f64) {
        for _ in 0..count {
            self.clock.advance(dt);
            self.surface.clear();
            self.world.step(&mut self.surface);
        }
    }

    pub fn count_events(&self, predicate: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| predicate(event)).count()
    }
}
