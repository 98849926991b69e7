//! Headless arena run
//!
//! Builds two connected rooms, plays a short scripted session against a
//! manual clock and logs what happened. Pass a `.ron` or `.toml` config path
//! as the first argument to override the defaults.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use arena_engine::foundation::logging;
use arena_engine::prelude::*;
use arena_game::prelude::*;

const DEFAULT_CONFIG: &str = "arena.toml";
const FRAME: f64 = 1.0 / 60.0;
const FRAMES: u64 = 600;

fn main() -> Result<(), GameError> {
    logging::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = GameConfig::load_or_default(&path);

    let clock = ManualClock::starting_at(0.0);
    let mut world = World::new(config, Box::new(clock.clone()));

    let tally: Rc<RefCell<HashMap<&'static str, usize>>> = Rc::default();
    let counter = Rc::clone(&tally);
    world.subscribe(move |event: &GameEvent| {
        let name = match event {
            GameEvent::EntityDied { .. } => "died",
            GameEvent::RoomTransitionTriggered { .. } => "transition",
            GameEvent::RoomEntered { .. } => "entered",
            GameEvent::DoorToggled { .. } => "door",
            GameEvent::GameOver => "game over",
        };
        *counter.borrow_mut().entry(name).or_default() += 1;
        false
    });

    let start = world.spawn_room(Aabb::from_xywh(17.0, 17.0, 990.0, 700.0));
    let north = world.spawn_room(Aabb::from_xywh(17.0, 17.0, 990.0, 700.0));
    let pair = world.pair_rooms(start, Side::Top, north)?;

    world.spawn_player(Point2::new(512.0, 400.0))?;
    world.spawn_enemy(start, Point2::new(580.0, 400.0), EnemyBehavior::TargetDummy)?;
    world.spawn_enemy(start, Point2::new(150.0, 150.0), EnemyBehavior::Chaser)?;
    let guard = world.spawn_enemy(north, Point2::new(512.0, 300.0), EnemyBehavior::Chaser)?;
    world.equip(guard, WeaponKind::Claw)?;
    world.spawn_wall(north, Aabb::from_xywh(300.0, 200.0, 40.0, 200.0))?;

    let controls = world.config().controls.clone();
    let mut surface = RecordingSurface::new(Size::new(1024.0, 768.0));

    // Face the dummy without moving
    world.key_pressed(controls.right);
    world.key_released(controls.right);

    for frame in 0..FRAMES {
        match frame {
            f if f % 20 == 0 && f < 300 => world.key_pressed(controls.attack),
            320 => world.key_pressed(controls.up),
            330 => world.key_pressed(controls.interact),
            _ => {}
        }

        surface.clear();
        world.step(&mut surface);
        clock.advance(FRAME);

        if world.is_game_over() {
            break;
        }
    }
    world.key_released(controls.up);

    let doors_open = pair
        .doors
        .iter()
        .filter_map(|&door| world.door(door))
        .filter(|door| door.is_open())
        .count();
    let health = world.player().map_or(0, |player| player.health().current());
    log::info!(
        "Ran {} frames: {} entities, player health {health}, {doors_open} doors open, game over: {}",
        world.frame_count(),
        world.entity_count(),
        world.is_game_over(),
    );
    for (name, count) in tally.borrow().iter() {
        log::info!("  {name}: {count}");
    }
    log::debug!("Last frame issued {} draw commands", surface.commands().len());
    Ok(())
}
