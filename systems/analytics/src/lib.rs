#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that folds world events into a match report.

use lane_defence_core::{DestructionCause, Event, GameState, MatchReport};

/// Pure analytics system that aggregates the events of the current game.
#[derive(Debug, Default)]
pub struct Analytics {
    report: MatchReport,
}

impl Analytics {
    /// Creates a new analytics system with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report aggregated so far for the current game.
    #[must_use]
    pub fn report(&self) -> &MatchReport {
        &self.report
    }

    /// Consumes world events in emission order.
    ///
    /// A transition from the menu into play starts a fresh report, so one
    /// analytics instance can follow several consecutive games.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            self.record(event);
        }
    }

    fn record(&mut self, event: &Event) {
        let report = &mut self.report;
        match event {
            Event::GameStateChanged { from, to } => {
                if *from == GameState::Menu && *to == GameState::Playing {
                    *report = MatchReport::default();
                }
                report.outcome = *to;
            }
            Event::TimeAdvanced { dt } => {
                report.ticks = report.ticks.saturating_add(1);
                let millis = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
                report.simulated_millis = report.simulated_millis.saturating_add(millis);
            }
            Event::DefenderPlaced { .. } => bump(&mut report.defenders_placed),
            Event::PlacementRejected { .. } => bump(&mut report.placements_rejected),
            Event::DefenderDestroyed { .. } => bump(&mut report.defenders_lost),
            Event::ProjectileFired { .. } => bump(&mut report.projectiles_fired),
            Event::ResourcesGenerated { amount, .. } => {
                report.resources_generated = report.resources_generated.saturating_add(*amount);
            }
            Event::PassiveIncome { amount } => {
                report.passive_income = report.passive_income.saturating_add(*amount);
            }
            Event::PickupCollected { value, .. } => {
                bump(&mut report.pickups_collected);
                report.resources_collected = report.resources_collected.saturating_add(*value);
            }
            Event::PickupExpired { .. } => bump(&mut report.pickups_expired),
            Event::HostileSpawned { .. } => bump(&mut report.hostiles_spawned),
            Event::HostileDestroyed { cause, .. } => match cause {
                DestructionCause::Projectile => bump(&mut report.kills_by_projectile),
                DestructionCause::Bomb => bump(&mut report.kills_by_bomb),
                DestructionCause::LaneGuard => bump(&mut report.kills_by_lane_guard),
            },
            Event::LaneGuardTriggered { .. } => bump(&mut report.lane_guards_triggered),
            Event::WaveCleared { .. } => bump(&mut report.waves_cleared),
            Event::DefenderSelected { .. }
            | Event::BombDetonated { .. }
            | Event::LaneGuardSpent { .. }
            | Event::PickupSpawned { .. }
            | Event::WaveStarted { .. } => {}
        }
    }
}

fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}
