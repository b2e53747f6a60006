use std::time::Duration;

use glam::Vec2;
use lane_defence_core::{
    CellCoord, Command, ConfigError, DefenderKind, Event, GameState, PlacementError,
    SimulationConfig,
};
use lane_defence_world::{apply, query, World};

fn world() -> World {
    World::with_config(SimulationConfig::default()).expect("default config is valid")
}

fn started() -> World {
    let mut world = world();
    let mut events = Vec::new();
    assert!(apply(&mut world, Command::StartGame, &mut events));
    world
}

fn tick(world: &mut World, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    let _ = apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        &mut events,
    );
    events
}

#[test]
fn new_world_waits_in_menu() {
    let world = world();
    assert_eq!(query::game_state(&world), GameState::Menu);
    assert_eq!(query::welcome_banner(&world), "Welcome to Lane Defence.");
    assert_eq!(query::dimensions(&world), (5, 9));
    assert_eq!(query::balance(&world), 150);
    assert_eq!(query::selected_defender(&world), DefenderKind::Attacker);
    assert_eq!(query::lane_guard_view(&world).len(), 5);
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut config = SimulationConfig::default();
    config.grid.lanes = 0;
    assert!(matches!(
        World::with_config(config),
        Err(ConfigError::EmptyGrid { lanes: 0, .. })
    ));
}

#[test]
fn ticks_are_ignored_outside_play() {
    let mut world = world();
    let events = tick(&mut world, 1_000);
    assert!(events.is_empty());
    assert_eq!(query::balance(&world), 150);
}

#[test]
fn start_game_enters_first_wave() {
    let mut world = world();
    let mut events = Vec::new();
    assert!(apply(&mut world, Command::StartGame, &mut events));
    assert_eq!(
        events,
        vec![
            Event::GameStateChanged {
                from: GameState::Menu,
                to: GameState::Playing,
            },
            Event::WaveStarted {
                wave: 1,
                required: 10,
            },
        ]
    );

    events.clear();
    assert!(!apply(&mut world, Command::StartGame, &mut events));
    assert!(events.is_empty());
}

#[test]
fn placement_debits_and_rejects_without_side_effects() {
    let mut world = started();
    let mut events = Vec::new();
    let cell = CellCoord::new(2, 3);

    assert!(apply(
        &mut world,
        Command::SelectDefender {
            kind: DefenderKind::Attacker
        },
        &mut events
    ));
    assert!(apply(&mut world, Command::PlaceDefender { cell }, &mut events));
    assert_eq!(query::balance(&world), 50);
    assert_eq!(
        query::defender_at(&world, cell).map(|defender| defender.kind),
        Some(DefenderKind::Attacker)
    );

    events.clear();
    assert!(!apply(&mut world, Command::PlaceDefender { cell }, &mut events));
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            cell,
            kind: DefenderKind::Attacker,
            reason: PlacementError::Occupied,
        }]
    );
    assert_eq!(query::balance(&world), 50);

    events.clear();
    let unaffordable = CellCoord::new(2, 4);
    assert!(!apply(
        &mut world,
        Command::PlaceDefender { cell: unaffordable },
        &mut events
    ));
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            cell: unaffordable,
            kind: DefenderKind::Attacker,
            reason: PlacementError::InsufficientFunds,
        }]
    );
    assert!(query::defender_at(&world, unaffordable).is_none());
    assert_eq!(query::balance(&world), 50);
    assert_eq!(query::grid(&world).occupied().count(), 1);
}

#[test]
fn placement_outside_grid_or_play_is_rejected() {
    let mut world = world();
    let mut events = Vec::new();
    assert!(!apply(
        &mut world,
        Command::PlaceDefender {
            cell: CellCoord::new(0, 0)
        },
        &mut events
    ));
    assert!(matches!(
        events.last(),
        Some(Event::PlacementRejected {
            reason: PlacementError::NotPlaying,
            ..
        })
    ));

    let mut world = started();
    events.clear();
    assert!(!apply(
        &mut world,
        Command::PlaceDefender {
            cell: CellCoord::new(0, 9)
        },
        &mut events
    ));
    assert!(matches!(
        events.last(),
        Some(Event::PlacementRejected {
            reason: PlacementError::OutOfBounds,
            ..
        })
    ));
    assert_eq!(query::balance(&world), 150);
}

#[test]
fn attacker_fires_along_its_lane() {
    let mut world = started();
    let mut events = Vec::new();
    assert!(apply(
        &mut world,
        Command::PlaceDefender {
            cell: CellCoord::new(1, 0)
        },
        &mut events
    ));

    let events = tick(&mut world, 2_000);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));

    let projectiles: Vec<_> = query::projectile_view(&world).iter().copied().collect();
    assert_eq!(projectiles.len(), 1);
    assert_eq!(projectiles[0].lane, 1);
    assert_eq!(projectiles[0].x, 40.0 + 200.0 * 2.0);
}

#[test]
fn pause_freezes_every_timer_and_resume_continues() {
    let mut paused = started();
    let mut uninterrupted = started();
    let mut events = Vec::new();

    let _ = tick(&mut paused, 2_500);
    let _ = tick(&mut uninterrupted, 2_500);

    assert!(apply(&mut paused, Command::Pause, &mut events));
    assert!(!apply(&mut paused, Command::Pause, &mut events));
    for _ in 0..10 {
        assert!(tick(&mut paused, 1_000).is_empty());
    }
    assert!(apply(&mut paused, Command::Resume, &mut events));
    assert!(!apply(&mut paused, Command::Resume, &mut events));

    for _ in 0..20 {
        let _ = tick(&mut paused, 500);
        let _ = tick(&mut uninterrupted, 500);
    }

    assert_eq!(query::balance(&paused), query::balance(&uninterrupted));
    assert_eq!(
        query::wave_progress(&paused),
        query::wave_progress(&uninterrupted)
    );
    assert_eq!(
        query::hostile_view(&paused).into_vec(),
        query::hostile_view(&uninterrupted).into_vec()
    );
}

#[test]
fn falling_pickup_can_be_collected() {
    let mut world = started();
    let mut spawned = None;
    for _ in 0..10 {
        for event in tick(&mut world, 1_000) {
            if let Event::PickupSpawned { pickup, .. } = event {
                spawned = Some(pickup);
            }
        }
    }
    let pickup_id = spawned.expect("a pickup spawns every ten seconds");
    let pickup = query::pickup_view(&world)
        .iter()
        .copied()
        .find(|pickup| pickup.id == pickup_id)
        .expect("pickup is still falling");

    let before = query::balance(&world);
    let mut events = Vec::new();
    assert!(!apply(
        &mut world,
        Command::CollectPickup {
            point: pickup.position + Vec2::new(100.0, 100.0)
        },
        &mut events
    ));
    assert!(apply(
        &mut world,
        Command::CollectPickup {
            point: pickup.position
        },
        &mut events
    ));
    assert_eq!(
        events,
        vec![Event::PickupCollected {
            pickup: pickup_id,
            value: 25,
        }]
    );
    assert_eq!(query::balance(&world), before + 25);
    assert!(query::pickup_view(&world).is_empty());
}

#[test]
fn reset_returns_to_construction_state() {
    let mut world = started();
    let mut events = Vec::new();
    assert!(apply(
        &mut world,
        Command::SelectDefender {
            kind: DefenderKind::Generator
        },
        &mut events
    ));
    assert!(apply(
        &mut world,
        Command::PlaceDefender {
            cell: CellCoord::new(0, 0)
        },
        &mut events
    ));
    for _ in 0..15 {
        let _ = tick(&mut world, 1_000);
    }

    events.clear();
    assert!(apply(&mut world, Command::Reset, &mut events));
    assert_eq!(
        events,
        vec![Event::GameStateChanged {
            from: GameState::Playing,
            to: GameState::Menu,
        }]
    );
    assert_eq!(query::game_state(&world), GameState::Menu);
    assert_eq!(query::balance(&world), 150);
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::selected_defender(&world), DefenderKind::Attacker);
    assert_eq!(query::grid(&world).occupied().count(), 0);
    assert!(query::hostile_view(&world).is_empty());
    assert!(query::pickup_view(&world).is_empty());
    assert!(!query::wave_progress(&world).in_progress);
}

#[test]
fn cost_table_lists_every_kind() {
    let world = world();
    let costs: Vec<(DefenderKind, u32)> = query::cost_table(&world)
        .into_iter()
        .map(|entry| (entry.kind, entry.cost))
        .collect();
    assert_eq!(
        costs,
        vec![
            (DefenderKind::Attacker, 100),
            (DefenderKind::Generator, 50),
            (DefenderKind::Blocker, 125),
            (DefenderKind::Bomb, 150),
            (DefenderKind::FrostAttacker, 175),
        ]
    );
}

#[test]
fn worlds_are_independent() {
    let mut first = started();
    let second = started();
    let _ = tick(&mut first, 6_000);
    assert_eq!(query::balance(&first), 175);
    assert_eq!(query::balance(&second), 150);
}
