#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.
//!
//! The [`World`] owns the defender grid and every entity collection. It is
//! mutated exclusively through [`apply`] and observed through the [`query`]
//! module. One [`Command::Tick`] advances the simulation by one discrete step
//! in a fixed phase order: schedules, pickups, defenders, defender pruning,
//! projectiles, hostiles and finally lane guards.

mod combat;
mod defenders;
mod hostiles;
mod lane_guards;
mod pickups;
mod projectiles;

use std::{mem, time::Duration};

use glam::Vec2;
use lane_defence_core::{
    CellCoord, Command, ConfigError, DefenderKind, DestructionCause, Event, GameState, HostileId,
    HostileKind, PickupId, PlacementError, ProjectileId, ProjectileKind, SimulationConfig,
    WELCOME_BANNER,
};
use lane_defence_system_economy::Economy;
use lane_defence_system_waves::{WaveEvent, WaveScheduler};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::{
    defenders::{Defender, DefenderAction, DefenderGrid},
    hostiles::Hostile,
    lane_guards::LaneGuard,
    pickups::Pickup,
    projectiles::Projectile,
};

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SimulationConfig,
    state: GameState,
    selected: DefenderKind,
    grid: DefenderGrid,
    hostiles: Vec<Hostile>,
    projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    lane_guards: Vec<LaneGuard>,
    economy: Economy,
    waves: WaveScheduler,
    rng: ChaCha8Rng,
    score: u32,
    next_hostile_id: u32,
    next_projectile_id: u32,
    next_pickup_id: u32,
}

impl World {
    /// Creates a world in the menu state from a validated configuration.
    pub fn with_config(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let waves = WaveScheduler::new(
            &config.waves,
            config.grid.lanes,
            config.hostiles.spawn_weights(),
        )?;

        Ok(Self {
            banner: WELCOME_BANNER,
            state: GameState::Menu,
            selected: DefenderKind::Attacker,
            grid: DefenderGrid::new(config.grid.lanes, config.grid.columns),
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            lane_guards: fresh_lane_guards(&config),
            economy: Economy::new(&config.economy),
            waves,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            score: 0,
            next_hostile_id: 0,
            next_projectile_id: 0,
            next_pickup_id: 0,
            config,
        })
    }

    fn reset(&mut self) {
        self.selected = DefenderKind::Attacker;
        self.grid.clear();
        self.hostiles.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.lane_guards = fresh_lane_guards(&self.config);
        self.economy.reset();
        self.waves.reset();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.score = 0;
        self.next_hostile_id = 0;
        self.next_projectile_id = 0;
        self.next_pickup_id = 0;
    }

    fn transition(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(?from, ?to, score = self.score, "game state changed");
        out_events.push(Event::GameStateChanged { from, to });
    }

    fn place_defender(&mut self, cell: CellCoord) -> Result<u32, PlacementError> {
        if self.state != GameState::Playing {
            return Err(PlacementError::NotPlaying);
        }
        if self.grid.index(cell).is_none() {
            return Err(PlacementError::OutOfBounds);
        }
        if self.grid.defender(cell).is_some() {
            return Err(PlacementError::Occupied);
        }

        let kind = self.selected;
        let cost = self.config.defenders.cost(kind);
        if !self.economy.try_debit(cost) {
            return Err(PlacementError::InsufficientFunds);
        }

        let defender = Defender::new(cell, kind, self.config.defenders.health(kind));
        if !self.grid.place(defender) {
            self.economy.credit(cost);
            return Err(PlacementError::Occupied);
        }
        Ok(cost)
    }

    fn collect_pickups(&mut self, point: Vec2, out_events: &mut Vec<Event>) -> bool {
        let (collected, remaining): (Vec<Pickup>, Vec<Pickup>) = mem::take(&mut self.pickups)
            .into_iter()
            .partition(|pickup| pickup.contains(point));
        self.pickups = remaining;

        for pickup in &collected {
            self.economy.credit(pickup.value);
            out_events.push(Event::PickupCollected {
                pickup: pickup.id,
                value: pickup.value,
            });
        }
        !collected.is_empty()
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });

        if self.advance_schedules(dt, out_events) {
            return;
        }
        self.advance_pickups(dt, out_events);
        self.run_defenders(dt, out_events);
        self.prune_defenders(out_events);
        self.advance_projectiles(dt);
        if self.advance_hostiles(dt, out_events) {
            return;
        }
        self.advance_lane_guards(dt, out_events);
    }

    /// Runs the wave scheduler and economy timers. Returns `true` once the
    /// final wave is won.
    fn advance_schedules(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> bool {
        let mut wave_events = Vec::new();
        self.waves
            .advance(dt, self.hostiles.len(), &mut self.rng, &mut wave_events);

        for event in wave_events {
            match event {
                WaveEvent::Started { wave, required } => {
                    out_events.push(Event::WaveStarted { wave, required });
                }
                WaveEvent::Spawn { lane, kind } => self.spawn_hostile(lane, kind, out_events),
                WaveEvent::Cleared { wave } => out_events.push(Event::WaveCleared { wave }),
                WaveEvent::AllCleared => {
                    self.transition(GameState::Won, out_events);
                    return true;
                }
            }
        }

        let accrual = self.economy.advance(dt);
        if accrual.passive_credited > 0 {
            out_events.push(Event::PassiveIncome {
                amount: accrual.passive_credited,
            });
        }
        for _ in 0..accrual.pickups_due {
            self.spawn_pickup(out_events);
        }
        false
    }

    fn spawn_hostile(&mut self, lane: u32, kind: HostileKind, out_events: &mut Vec<Event>) {
        let id = HostileId::new(self.next_hostile_id);
        self.next_hostile_id = self.next_hostile_id.saturating_add(1);

        let x = self.config.grid.width() + self.config.combat.spawn_margin;
        let profile = self.config.hostiles.profile(kind);
        self.hostiles.push(Hostile::new(id, lane, kind, profile, x));
        debug!(hostile = id.get(), lane, ?kind, "hostile spawned");
        out_events.push(Event::HostileSpawned {
            hostile: id,
            lane,
            kind,
        });
    }

    fn spawn_pickup(&mut self, out_events: &mut Vec<Event>) {
        let id = PickupId::new(self.next_pickup_id);
        self.next_pickup_id = self.next_pickup_id.saturating_add(1);

        let economy = &self.config.economy;
        let max_x = (self.config.grid.width() - economy.pickup_size).max(0.0);
        let position = Vec2::new(self.rng.gen_range(0.0..=max_x), 0.0);
        self.pickups.push(Pickup::new(
            id,
            position,
            economy.pickup_value,
            economy.pickup_drift,
            economy.pickup_size,
        ));
        out_events.push(Event::PickupSpawned {
            pickup: id,
            position,
        });
    }

    fn advance_pickups(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let bottom = self.config.grid.height();
        self.pickups.retain_mut(|pickup| {
            pickup.advance(dt);
            if pickup.position().y < bottom {
                return true;
            }
            out_events.push(Event::PickupExpired { pickup: pickup.id });
            false
        });
    }

    fn run_defenders(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let table = &self.config.defenders;
        let actions: Vec<DefenderAction> = self
            .grid
            .iter_mut()
            .filter(|defender| defender.is_alive())
            .filter_map(|defender| defender.act(dt, table))
            .collect();

        for action in actions {
            match action {
                DefenderAction::Fire { cell, kind, damage } => {
                    self.fire_projectile(cell, kind, damage, out_events);
                }
                DefenderAction::Generate { cell, amount } => {
                    self.economy.credit(amount);
                    out_events.push(Event::ResourcesGenerated { cell, amount });
                }
                DefenderAction::Detonate { cell } => {
                    let kills = self.detonate(cell, out_events);
                    out_events.push(Event::BombDetonated { cell, kills });
                }
            }
        }
    }

    fn fire_projectile(
        &mut self,
        cell: CellCoord,
        kind: ProjectileKind,
        damage: i32,
        out_events: &mut Vec<Event>,
    ) {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);

        let cell_length = self.config.grid.cell_length;
        let x = cell.column() as f32 * cell_length + cell_length * 0.5;
        self.projectiles.push(Projectile::new(
            id,
            cell.lane(),
            x,
            self.config.combat.projectile_speed,
            damage,
            kind,
        ));
        out_events.push(Event::ProjectileFired {
            projectile: id,
            cell,
            kind,
        });
    }

    fn detonate(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> u32 {
        let cell_length = self.config.grid.cell_length;
        let (_, columns) = self.grid.dimensions();
        let caught =
            self.take_hostiles(|hostile| combat::within_blast(cell, hostile, cell_length, columns));

        for hostile in &caught {
            self.record_destroyed(hostile, DestructionCause::Bomb, out_events);
        }
        debug!(lane = cell.lane(), column = cell.column(), kills = caught.len(), "bomb detonated");
        u32::try_from(caught.len()).unwrap_or(u32::MAX)
    }

    fn prune_defenders(&mut self, out_events: &mut Vec<Event>) {
        for defender in self.grid.prune_dead() {
            let cell = defender.cell();
            debug!(
                lane = cell.lane(),
                column = cell.column(),
                kind = ?defender.kind(),
                "defender destroyed"
            );
            out_events.push(Event::DefenderDestroyed {
                cell,
                kind: defender.kind(),
            });
        }
    }

    fn advance_projectiles(&mut self, dt: Duration) {
        let far_bound = self.config.grid.width();
        self.projectiles.retain_mut(|projectile| {
            projectile.advance(dt);
            projectile.x <= far_bound
        });
    }

    /// Moves hostiles and resolves projectile hits, breaches and melee.
    /// Returns `true` when a breach ended the game.
    fn advance_hostiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> bool {
        for hostile in &mut self.hostiles {
            hostile.advance(dt);
        }

        self.resolve_projectile_hits(out_events);

        let defended_edge = self.config.combat.defended_edge;
        let melee = self.config.combat.melee_dps * dt.as_secs_f32();
        let cell_length = self.config.grid.cell_length;
        let (_, columns) = self.grid.dimensions();

        for index in 0..self.hostiles.len() {
            let (lane, x) = {
                let hostile = &self.hostiles[index];
                (hostile.lane, hostile.x)
            };

            if x < defended_edge {
                let triggered = usize::try_from(lane)
                    .ok()
                    .and_then(|lane| self.lane_guards.get_mut(lane))
                    .is_some_and(LaneGuard::trigger);
                if !triggered {
                    info!(lane, "lane breached");
                    self.transition(GameState::GameOver, out_events);
                    return true;
                }
                info!(lane, "lane guard triggered");
                out_events.push(Event::LaneGuardTriggered { lane });
            }

            let Some(column) = combat::column_at(x, cell_length, columns) else {
                continue;
            };
            if let Some(defender) = self.grid.defender_mut(CellCoord::new(lane, column)) {
                if defender.is_alive() {
                    defender.take_melee(melee);
                }
            }
        }

        false
    }

    fn resolve_projectile_hits(&mut self, out_events: &mut Vec<Event>) {
        let hits = combat::collect_hits(
            &self.hostiles,
            &self.projectiles,
            self.config.combat.hit_half_width,
        );
        if hits.is_empty() {
            return;
        }

        let slow_factor = self.config.combat.slow_factor;
        let slow_duration = self.config.combat.slow_duration();
        let mut consumed = Vec::with_capacity(hits.len());
        for hit in &hits {
            let projectile = &self.projectiles[hit.projectile];
            let hostile = &mut self.hostiles[hit.hostile];
            hostile.take_damage(projectile.damage);
            if projectile.kind == ProjectileKind::Frost {
                hostile.slow(slow_factor, slow_duration);
            }
            consumed.push(projectile.id);
        }
        self.projectiles
            .retain(|projectile| !consumed.contains(&projectile.id));

        let destroyed = self.take_hostiles(|hostile| !hostile.is_alive());
        for hostile in &destroyed {
            self.record_destroyed(hostile, DestructionCause::Projectile, out_events);
        }
    }

    fn advance_lane_guards(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let speed = self.config.combat.lane_guard_speed;
        let half_width = self.config.combat.lane_guard_half_width;
        let far_bound = self.config.grid.width();

        for index in 0..self.lane_guards.len() {
            let Some((lane, x)) = self.lane_guards[index].sweep(dt, speed) else {
                continue;
            };

            // Hostiles only walk toward the edge the guard started from, so
            // anything behind its leading side has been crossed.
            let swept = self
                .take_hostiles(|hostile| hostile.lane == lane && hostile.x < x + half_width);
            for hostile in &swept {
                self.record_destroyed(hostile, DestructionCause::LaneGuard, out_events);
            }

            if x > far_bound {
                self.lane_guards[index].retire();
                info!(lane, "lane guard spent");
                out_events.push(Event::LaneGuardSpent { lane });
            }
        }
    }

    fn take_hostiles<F>(&mut self, predicate: F) -> Vec<Hostile>
    where
        F: FnMut(&Hostile) -> bool,
    {
        let (taken, kept): (Vec<Hostile>, Vec<Hostile>) =
            mem::take(&mut self.hostiles).into_iter().partition(predicate);
        self.hostiles = kept;
        taken
    }

    fn record_destroyed(
        &mut self,
        hostile: &Hostile,
        cause: DestructionCause,
        out_events: &mut Vec<Event>,
    ) {
        if cause != DestructionCause::LaneGuard {
            self.score = self
                .score
                .saturating_add(self.config.combat.score_per_kill);
        }
        self.waves.record_destroyed();
        debug!(hostile = hostile.id.get(), lane = hostile.lane, ?cause, "hostile destroyed");
        out_events.push(Event::HostileDestroyed {
            hostile: hostile.id,
            lane: hostile.lane,
            kind: hostile.kind,
            cause,
        });
    }
}

fn fresh_lane_guards(config: &SimulationConfig) -> Vec<LaneGuard> {
    let start = config.grid.cell_length * 0.5;
    (0..config.grid.lanes)
        .map(|lane| LaneGuard::new(lane, start))
        .collect()
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Returns whether the command took effect. Rejected commands leave the world
/// untouched; placement rejections are additionally reported through
/// [`Event::PlacementRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) -> bool {
    match command {
        Command::StartGame => {
            if world.state != GameState::Menu {
                return false;
            }
            world.reset();
            world.transition(GameState::Playing, out_events);
            let mut wave_events = Vec::new();
            world.waves.start(&mut wave_events);
            for event in wave_events {
                if let WaveEvent::Started { wave, required } = event {
                    out_events.push(Event::WaveStarted { wave, required });
                }
            }
            true
        }
        Command::SelectDefender { kind } => {
            world.selected = kind;
            out_events.push(Event::DefenderSelected { kind });
            true
        }
        Command::PlaceDefender { cell } => {
            let kind = world.selected;
            match world.place_defender(cell) {
                Ok(cost) => {
                    debug!(lane = cell.lane(), column = cell.column(), ?kind, cost, "placed");
                    out_events.push(Event::DefenderPlaced { cell, kind, cost });
                    true
                }
                Err(reason) => {
                    debug!(lane = cell.lane(), column = cell.column(), %reason, "rejected");
                    out_events.push(Event::PlacementRejected { cell, kind, reason });
                    false
                }
            }
        }
        Command::CollectPickup { point } => {
            world.state == GameState::Playing && world.collect_pickups(point, out_events)
        }
        Command::Pause => {
            if world.state != GameState::Playing {
                return false;
            }
            world.transition(GameState::Paused, out_events);
            true
        }
        Command::Resume => {
            if world.state != GameState::Paused {
                return false;
            }
            world.transition(GameState::Playing, out_events);
            true
        }
        Command::Reset => {
            world.reset();
            world.transition(GameState::Menu, out_events);
            true
        }
        Command::Tick { dt } => {
            if world.state != GameState::Playing {
                return false;
            }
            world.tick(dt, out_events);
            true
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_defence_core::{
        CellCoord, CostEntry, DefenderKind, DefenderSnapshot, GameState, GridView, HostileView,
        LaneGuardSnapshot, PickupView, ProjectileView, SimulationConfig, WaveProgress,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current top-level state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Captures every cell of the defender grid.
    #[must_use]
    pub fn grid(world: &World) -> GridView {
        world.grid.view()
    }

    /// Returns the defender occupying the cell, if any.
    #[must_use]
    pub fn defender_at(world: &World, cell: CellCoord) -> Option<DefenderSnapshot> {
        world.grid.defender(cell).map(|defender| defender.snapshot())
    }

    /// Captures every live hostile.
    #[must_use]
    pub fn hostile_view(world: &World) -> HostileView {
        HostileView::from_snapshots(world.hostiles.iter().map(|hostile| hostile.snapshot()).collect())
    }

    /// Captures every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures every pickup on the field.
    #[must_use]
    pub fn pickup_view(world: &World) -> PickupView {
        PickupView::from_snapshots(world.pickups.iter().map(|pickup| pickup.snapshot()).collect())
    }

    /// Captures the guard of every lane in lane order.
    #[must_use]
    pub fn lane_guard_view(world: &World) -> Vec<LaneGuardSnapshot> {
        world.lane_guards.iter().map(|guard| guard.snapshot()).collect()
    }

    /// Spendable resource balance.
    #[must_use]
    pub fn balance(world: &World) -> u32 {
        world.economy.balance()
    }

    /// Score accumulated in the current game.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Progress of the current wave.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        world.waves.progress()
    }

    /// Defender kind used by the next placement.
    #[must_use]
    pub fn selected_defender(world: &World) -> DefenderKind {
        world.selected
    }

    /// Placement cost of every defender kind in selection-bar order.
    #[must_use]
    pub fn cost_table(world: &World) -> Vec<CostEntry> {
        DefenderKind::ALL
            .iter()
            .map(|kind| CostEntry {
                kind: *kind,
                cost: world.config.defenders.cost(*kind),
            })
            .collect()
    }

    /// Provides the `(lanes, columns)` dimensions of the grid.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }
}
