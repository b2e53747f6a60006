use std::time::Duration;

use lane_defence_core::{
    CellCoord, DefenderKind, DestructionCause, Event, GameState, HostileId, HostileKind,
    PickupId, PlacementError,
};
use lane_defence_system_analytics::Analytics;

fn started() -> Event {
    Event::GameStateChanged {
        from: GameState::Menu,
        to: GameState::Playing,
    }
}

fn destroyed(id: u32, cause: DestructionCause) -> Event {
    Event::HostileDestroyed {
        hostile: HostileId::new(id),
        lane: 0,
        kind: HostileKind::Standard,
        cause,
    }
}

#[test]
fn ticks_accumulate_simulated_time() {
    let mut analytics = Analytics::new();
    analytics.handle(&[
        started(),
        Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        },
        Event::TimeAdvanced {
            dt: Duration::from_millis(250),
        },
    ]);

    let report = analytics.report();
    assert_eq!(report.ticks, 2);
    assert_eq!(report.simulated_millis, 266);
    assert_eq!(report.outcome, GameState::Playing);
}

#[test]
fn kills_are_split_by_cause() {
    let mut analytics = Analytics::new();
    analytics.handle(&[
        started(),
        destroyed(0, DestructionCause::Projectile),
        destroyed(1, DestructionCause::Projectile),
        destroyed(2, DestructionCause::Bomb),
        destroyed(3, DestructionCause::LaneGuard),
    ]);

    let report = analytics.report();
    assert_eq!(report.kills_by_projectile, 2);
    assert_eq!(report.kills_by_bomb, 1);
    assert_eq!(report.kills_by_lane_guard, 1);
    assert_eq!(report.total_kills(), 4);
}

#[test]
fn economy_events_are_summed() {
    let cell = CellCoord::new(1, 1);
    let mut analytics = Analytics::new();
    analytics.handle(&[
        started(),
        Event::PassiveIncome { amount: 25 },
        Event::ResourcesGenerated { cell, amount: 25 },
        Event::ResourcesGenerated { cell, amount: 25 },
        Event::PickupCollected {
            pickup: PickupId::new(0),
            value: 25,
        },
        Event::PickupExpired {
            pickup: PickupId::new(1),
        },
        Event::DefenderPlaced {
            cell,
            kind: DefenderKind::Generator,
            cost: 50,
        },
        Event::PlacementRejected {
            cell,
            kind: DefenderKind::Generator,
            reason: PlacementError::Occupied,
        },
    ]);

    let report = analytics.report();
    assert_eq!(report.passive_income, 25);
    assert_eq!(report.resources_generated, 50);
    assert_eq!(report.resources_collected, 25);
    assert_eq!(report.pickups_collected, 1);
    assert_eq!(report.pickups_expired, 1);
    assert_eq!(report.defenders_placed, 1);
    assert_eq!(report.placements_rejected, 1);
}

#[test]
fn starting_a_new_game_clears_the_report() {
    let mut analytics = Analytics::new();
    analytics.handle(&[
        started(),
        destroyed(0, DestructionCause::Bomb),
        Event::GameStateChanged {
            from: GameState::Playing,
            to: GameState::GameOver,
        },
    ]);
    assert_eq!(analytics.report().outcome, GameState::GameOver);
    assert_eq!(analytics.report().kills_by_bomb, 1);

    analytics.handle(&[
        Event::GameStateChanged {
            from: GameState::GameOver,
            to: GameState::Menu,
        },
        started(),
    ]);
    assert_eq!(analytics.report().kills_by_bomb, 0);
    assert_eq!(analytics.report().outcome, GameState::Playing);
}

#[test]
fn pausing_keeps_the_report() {
    let mut analytics = Analytics::new();
    analytics.handle(&[
        started(),
        Event::WaveCleared { wave: 1 },
        Event::GameStateChanged {
            from: GameState::Playing,
            to: GameState::Paused,
        },
        Event::GameStateChanged {
            from: GameState::Paused,
            to: GameState::Playing,
        },
    ]);
    assert_eq!(analytics.report().waves_cleared, 1);
}
