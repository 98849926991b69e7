use std::cell::Cell;
use std::rc::Rc;

use arena_engine::prelude::*;

use super::Harness;
use crate::config::{Aggro, GameConfig};
use crate::entities::{EnemyBehavior, EntityId, Side};
use crate::error::GameError;
use crate::events::GameEvent;
use crate::world::DoorPair;

const FRAME: f64 = 1.0 / 60.0;

fn two_rooms(h: &mut Harness) -> (EntityId, EntityId, DoorPair) {
    let a = h.room();
    let b = h.room();
    let pair = h.world.pair_rooms(a, Side::Top, b).unwrap();
    (a, b, pair)
}

#[test]
fn test_pairing_builds_doors_and_triggers() {
    let mut h = Harness::new(GameConfig::default());
    let (a, b, pair) = two_rooms(&mut h);

    assert_eq!(h.world.active_room(), Some(a));
    assert_eq!(h.world.room(a).unwrap().neighbour(Side::Top), Some(b));
    assert_eq!(h.world.room(b).unwrap().neighbour(Side::Bottom), Some(a));
    assert_eq!(h.world.room(a).unwrap().walls().len(), 5);

    let door = h.world.door(pair.doors[0]).unwrap();
    assert_eq!(door.leaf(), Aabb::from_xywh(464.0, 17.0, 96.0, 6.0));
    assert_eq!(door.leads_to(), Some(b));
    assert!(!door.is_open());
}

#[test]
fn test_doors_lock_while_hostile_enemy_lives() {
    let mut config = GameConfig::default();
    config.enemy.aggro = Aggro::Radius(50.0);
    let mut h = Harness::new(config);
    let (a, _, pair) = two_rooms(&mut h);
    let door = pair.doors[0];
    h.world.spawn_player(Point2::new(512.0, 60.0)).unwrap();
    let chaser = h
        .world
        .spawn_enemy(a, Point2::new(150.0, 600.0), EnemyBehavior::Chaser)
        .unwrap();

    h.frame_at(0.0);
    assert!(h.world.door(door).unwrap().is_locked());
    h.world.key_pressed(KeyCode::E);
    assert!(!h.world.door(door).unwrap().is_open());

    h.world.despawn(chaser).unwrap();
    h.frames(1, FRAME);
    assert!(h.world.enemy(chaser).is_none());
    assert!(!h.world.door(door).unwrap().is_locked());

    h.world.key_pressed(KeyCode::E);
    assert!(h.world.door(door).unwrap().is_open());
    h.frames(1, FRAME);
    assert_eq!(
        h.count_events(|event| *event == GameEvent::DoorToggled { door, open: true }),
        1
    );
}

#[test]
fn test_dummies_do_not_lock_doors() {
    let mut h = Harness::new(GameConfig::default());
    let (a, _, pair) = two_rooms(&mut h);
    h.world.spawn_player(Point2::new(512.0, 60.0)).unwrap();
    h.world
        .spawn_enemy(a, Point2::new(150.0, 600.0), EnemyBehavior::TargetDummy)
        .unwrap();

    h.frame_at(0.0);
    assert!(!h.world.door(pair.doors[0]).unwrap().is_locked());
}

#[test]
fn test_door_out_of_reach_ignores_interact() {
    let mut h = Harness::new(GameConfig::default());
    let (_, _, pair) = two_rooms(&mut h);
    h.world.spawn_player(Point2::new(512.0, 400.0)).unwrap();

    h.frame_at(0.0);
    h.world.key_pressed(KeyCode::E);
    assert!(!h.world.door(pair.doors[0]).unwrap().is_open());
}

#[test]
fn test_transition_fires_once_and_freezes_enemies() {
    let mut config = GameConfig::default();
    config.enemy.aggro = Aggro::Everywhere;
    let mut h = Harness::new(config);
    let (_, b, pair) = two_rooms(&mut h);
    h.world.spawn_player(Point2::new(512.0, 60.0)).unwrap();
    let chaser = h
        .world
        .spawn_enemy(b, Point2::new(512.0, 300.0), EnemyBehavior::Chaser)
        .unwrap();

    h.frame_at(0.0);
    h.world.key_pressed(KeyCode::E);
    assert!(h.world.door(pair.doors[0]).unwrap().is_open());

    h.world.key_pressed(KeyCode::W);
    let triggered = |event: &GameEvent| matches!(event, GameEvent::RoomTransitionTriggered { .. });
    let mut frames = 0;
    while h.count_events(triggered) == 0 {
        h.frames(1, FRAME);
        frames += 1;
        assert!(frames < 30, "never reached the doorway");
    }
    h.world.key_released(KeyCode::W);

    assert_eq!(h.world.active_room(), Some(b));
    assert!(h.world.transition_in_progress());
    assert_eq!(h.world.player().unwrap().position(), Point2::new(512.0, 682.0));

    let frozen_at = h.world.enemy(chaser).unwrap().position();
    h.frames(10, FRAME);
    assert_eq!(h.world.enemy(chaser).unwrap().position(), frozen_at);
    assert!(h.world.door(pair.doors[1]).unwrap().is_locked());

    h.frames(30, FRAME);
    assert!(!h.world.transition_in_progress());
    assert_ne!(h.world.enemy(chaser).unwrap().position(), frozen_at);
    assert_eq!(h.count_events(|event| *event == GameEvent::RoomEntered { room: b }), 1);
    assert_eq!(h.count_events(triggered), 1);
}

#[test]
fn test_construction_errors() {
    let mut h = Harness::new(GameConfig::default());
    let room = h.room();
    let player = h.world.spawn_player(Point2::new(100.0, 100.0)).unwrap();

    assert!(matches!(
        h.world.spawn_player(Point2::new(200.0, 200.0)),
        Err(GameError::PlayerAlreadySpawned(id)) if id == player
    ));
    assert!(matches!(
        h.world.spawn_enemy(player, Point2::new(0.0, 0.0), EnemyBehavior::Chaser),
        Err(GameError::WrongEntityKind { expected: "room", .. })
    ));
    assert!(matches!(
        h.world.pair_rooms(room, Side::Left, player),
        Err(GameError::WrongEntityKind { .. })
    ));
    assert!(matches!(
        h.world.equip(room, crate::entities::WeaponKind::Claw),
        Err(GameError::WrongEntityKind { .. })
    ));

    let wall = h.world.spawn_wall(room, Aabb::from_xywh(400.0, 400.0, 20.0, 20.0)).unwrap();
    h.world.despawn(wall).unwrap();
    h.frame_at(0.0);
    assert!(matches!(h.world.despawn(wall), Err(GameError::UnknownEntity(id)) if id == wall));
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let mut config = GameConfig::default();
    config.player.max_health = 10;
    let mut h = Harness::new(config);
    let room = h.room();
    h.world.spawn_player(Point2::new(300.0, 300.0)).unwrap();
    h.world
        .spawn_enemy(room, Point2::new(340.0, 300.0), EnemyBehavior::TargetDummy)
        .unwrap();

    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let token = h.world.subscribe(move |_: &GameEvent| {
        counter.set(counter.get() + 1);
        false
    });
    assert!(h.world.unsubscribe(token));

    h.frame_at(0.0);
    assert!(h.world.is_game_over());
    assert_eq!(seen.get(), 0);
    assert!(h.count_events(|event| *event == GameEvent::GameOver) == 1);
}
