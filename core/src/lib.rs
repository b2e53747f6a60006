#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the pure systems it drives. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values that
//! adapters and systems react to. Adapters never mutate simulation state
//! directly; they observe it through immutable snapshots.

mod config;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use config::{
    BlockerProfile, BombProfile, CombatConfig, ConfigError, DefenderTable, EconomyConfig,
    GeneratorProfile, GridConfig, HostileProfile, HostileTable, ShooterProfile,
    SimulationConfig, WaveConfig,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lane Defence.";

/// Top-level state machine of a simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for the player to start a game.
    #[default]
    Menu,
    /// The only state in which ticks advance the simulation.
    Playing,
    /// Simulation is frozen; every timer is suspended.
    Paused,
    /// A hostile breached a lane without an available guard.
    GameOver,
    /// Every wave was cleared.
    Won,
}

impl GameState {
    /// Reports whether the state ends the current game.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Won)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Leaves the menu and starts the first wave.
    StartGame,
    /// Chooses the defender kind used by subsequent placements.
    SelectDefender {
        /// Kind of defender to select.
        kind: DefenderKind,
    },
    /// Places the selected defender kind into the provided cell.
    PlaceDefender {
        /// Cell that should receive the defender.
        cell: CellCoord,
    },
    /// Collects every resource pickup whose bounds contain the point.
    CollectPickup {
        /// Point in field coordinates.
        point: Vec2,
    },
    /// Suspends simulation while playing.
    Pause,
    /// Resumes a paused simulation.
    Resume,
    /// Reinitialises every component to its construction-time state.
    Reset,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces a transition of the top-level state machine.
    GameStateChanged {
        /// State before the transition.
        from: GameState,
        /// State after the transition.
        to: GameState,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a new defender kind was selected.
    DefenderSelected {
        /// Kind that became active.
        kind: DefenderKind,
    },
    /// Confirms that a defender was placed on the grid.
    DefenderPlaced {
        /// Cell occupied by the defender.
        cell: CellCoord,
        /// Kind of defender that was placed.
        kind: DefenderKind,
        /// Amount debited from the balance.
        cost: u32,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Cell provided in the request.
        cell: CellCoord,
        /// Kind that was selected when the request was made.
        kind: DefenderKind,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a defender was removed from the grid.
    DefenderDestroyed {
        /// Cell the defender occupied.
        cell: CellCoord,
        /// Kind of defender that was removed.
        kind: DefenderKind,
    },
    /// Reports that a defender launched a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Cell of the defender that fired.
        cell: CellCoord,
        /// Kind of projectile launched.
        kind: ProjectileKind,
    },
    /// Reports that a generator credited resources.
    ResourcesGenerated {
        /// Cell of the generator.
        cell: CellCoord,
        /// Amount credited to the balance.
        amount: u32,
    },
    /// Reports passive income credited by the economy timer.
    PassiveIncome {
        /// Amount credited to the balance.
        amount: u32,
    },
    /// Reports that a bomb detonated.
    BombDetonated {
        /// Cell of the bomb.
        cell: CellCoord,
        /// Number of hostiles destroyed by the blast.
        kills: u32,
    },
    /// Confirms that a hostile entered the field.
    HostileSpawned {
        /// Identifier allocated to the hostile.
        hostile: HostileId,
        /// Lane the hostile travels along.
        lane: u32,
        /// Kind of hostile spawned.
        kind: HostileKind,
    },
    /// Confirms that a hostile was destroyed.
    HostileDestroyed {
        /// Identifier of the destroyed hostile.
        hostile: HostileId,
        /// Lane the hostile occupied.
        lane: u32,
        /// Kind of the destroyed hostile.
        kind: HostileKind,
        /// Mechanism that destroyed the hostile.
        cause: DestructionCause,
    },
    /// Reports that a lane guard started sweeping its lane.
    LaneGuardTriggered {
        /// Lane guarded by the triggered guard.
        lane: u32,
    },
    /// Reports that a lane guard left the field and is spent.
    LaneGuardSpent {
        /// Lane guarded by the spent guard.
        lane: u32,
    },
    /// Confirms that a resource pickup appeared.
    PickupSpawned {
        /// Identifier allocated to the pickup.
        pickup: PickupId,
        /// Initial position of the pickup.
        position: Vec2,
    },
    /// Confirms that a pickup was collected.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Amount credited to the balance.
        value: u32,
    },
    /// Reports that a pickup reached the bottom bound uncollected.
    PickupExpired {
        /// Identifier of the discarded pickup.
        pickup: PickupId,
    },
    /// Announces that a wave began spawning.
    WaveStarted {
        /// One-based wave index.
        wave: u32,
        /// Number of hostiles the wave spawns.
        required: u32,
    },
    /// Announces that a wave was cleared.
    WaveCleared {
        /// One-based wave index.
        wave: u32,
    },
}

/// Kinds of defender the player can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DefenderKind {
    /// Fires kinetic projectiles along its lane.
    Attacker,
    /// Periodically credits resources.
    Generator,
    /// Sturdy damage sink with no timed action.
    Blocker,
    /// Detonates after a fuse, clearing its neighbourhood.
    Bomb,
    /// Fires frost projectiles that slow hostiles.
    FrostAttacker,
}

impl DefenderKind {
    /// Every defender kind in selection-bar order.
    pub const ALL: [Self; 5] = [
        Self::Attacker,
        Self::Generator,
        Self::Blocker,
        Self::Bomb,
        Self::FrostAttacker,
    ];

    /// Human readable label used by adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attacker => "attacker",
            Self::Generator => "generator",
            Self::Blocker => "blocker",
            Self::Bomb => "bomb",
            Self::FrostAttacker => "frost attacker",
        }
    }
}

/// Kinds of hostile spawned by the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HostileKind {
    /// Baseline hostile.
    Standard,
    /// Tougher and slightly faster hostile.
    Armored,
    /// Slow hostile with the most health.
    HeavilyArmored,
}

impl HostileKind {
    /// Every hostile kind.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Armored, Self::HeavilyArmored];
}

/// Kinds of projectile fired by defenders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Plain damage.
    Kinetic,
    /// Damage plus a temporary slow.
    Frost,
}

/// Mechanism that destroyed a hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Killed by projectile damage.
    Projectile,
    /// Caught in a bomb blast.
    Bomb,
    /// Swept away by a lane guard.
    LaneGuard,
}

/// Lifecycle of a lane guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneGuardState {
    /// Ready to be triggered by a breach.
    #[default]
    Idle,
    /// Travelling along the lane, destroying hostiles it overlaps.
    Sweeping,
    /// Used up; a further breach in the lane is fatal.
    Spent,
}

/// Reasons a defender placement request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// Placement is only possible while playing.
    #[error("placement is only possible while playing")]
    NotPlaying,
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell already holds a defender.
    #[error("cell already holds a defender")]
    Occupied,
    /// The balance does not cover the defender's cost.
    #[error("balance does not cover the defender cost")]
    InsufficientFunds,
}

/// Unique identifier assigned to a hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostileId(u32);

impl HostileId {
    /// Creates a new hostile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a resource pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as lane and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    lane: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(lane: u32, column: u32) -> Self {
        Self { lane, column }
    }

    /// Zero-based lane index of the cell.
    #[must_use]
    pub const fn lane(&self) -> u32 {
        self.lane
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Immutable representation of a placed defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderSnapshot {
    /// Cell occupied by the defender.
    pub cell: CellCoord,
    /// Kind of defender.
    pub kind: DefenderKind,
    /// Remaining health; zero or less means the defender is pruned next tick.
    pub health: i32,
    /// Time accrued toward the defender's next action.
    pub action_elapsed: Duration,
}

/// Read-only snapshot of the defender grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridView {
    lanes: u32,
    columns: u32,
    cells: Vec<Option<DefenderSnapshot>>,
}

impl GridView {
    /// Creates a grid view from lane-major cell contents.
    #[must_use]
    pub fn new(lanes: u32, columns: u32, cells: Vec<Option<DefenderSnapshot>>) -> Self {
        Self {
            lanes,
            columns,
            cells,
        }
    }

    /// Provides the `(lanes, columns)` dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.lanes, self.columns)
    }

    /// Returns the defender occupying the provided cell, if any.
    #[must_use]
    pub fn defender(&self, cell: CellCoord) -> Option<&DefenderSnapshot> {
        if cell.lane() >= self.lanes || cell.column() >= self.columns {
            return None;
        }
        let index = usize::try_from(cell.lane() * self.columns + cell.column()).ok()?;
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Iterator over every occupied cell in lane-major order.
    pub fn occupied(&self) -> impl Iterator<Item = &DefenderSnapshot> {
        self.cells.iter().flatten()
    }
}

/// Immutable representation of a single hostile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostileSnapshot {
    /// Identifier assigned to the hostile.
    pub id: HostileId,
    /// Lane the hostile travels along.
    pub lane: u32,
    /// Kind of hostile.
    pub kind: HostileKind,
    /// Remaining health.
    pub health: i32,
    /// Horizontal position in field units.
    pub x: f32,
    /// Speed the hostile moves at when not slowed.
    pub base_speed: f32,
    /// Speed the hostile currently moves at.
    pub speed: f32,
    /// Remaining duration of an active slow.
    pub slowed_for: Duration,
}

/// Read-only snapshot describing all hostiles on the field.
#[derive(Clone, Debug, Default)]
pub struct HostileView {
    snapshots: Vec<HostileSnapshot>,
}

impl HostileView {
    /// Creates a new hostile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HostileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &HostileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of hostiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no hostile is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HostileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Lane the projectile travels along.
    pub lane: u32,
    /// Horizontal position in field units.
    pub x: f32,
    /// Damage dealt on impact.
    pub damage: i32,
    /// Kind of projectile.
    pub kind: ProjectileKind,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a resource pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Identifier assigned to the pickup.
    pub id: PickupId,
    /// Centre of the pickup in field coordinates.
    pub position: Vec2,
    /// Amount credited on collection.
    pub value: u32,
}

/// Read-only snapshot describing all pickups on the field.
#[derive(Clone, Debug, Default)]
pub struct PickupView {
    snapshots: Vec<PickupSnapshot>,
}

impl PickupView {
    /// Creates a new pickup view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PickupSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &PickupSnapshot> {
        self.snapshots.iter()
    }

    /// Number of pickups captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the field holds no pickup.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a lane guard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneGuardSnapshot {
    /// Lane protected by the guard.
    pub lane: u32,
    /// Horizontal position in field units.
    pub x: f32,
    /// Lifecycle state of the guard.
    pub state: LaneGuardState,
}

/// Progress of the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveProgress {
    /// One-based index of the current wave.
    pub current: u32,
    /// Number of waves that must be cleared to win.
    pub total: u32,
    /// Hostiles spawned so far in the current wave.
    pub spawned: u32,
    /// Hostiles the current wave spawns in total.
    pub required: u32,
    /// Hostiles destroyed so far in the current wave.
    pub destroyed: u32,
    /// Indicates whether the current wave is still spawning or being fought.
    pub in_progress: bool,
}

/// Placement cost of a defender kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CostEntry {
    /// Defender kind.
    pub kind: DefenderKind,
    /// Amount debited on placement.
    pub cost: u32,
}

/// Aggregated statistics describing a single game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Number of ticks that advanced the simulation.
    pub ticks: u64,
    /// Simulated time in milliseconds.
    pub simulated_millis: u64,
    /// Defenders successfully placed.
    pub defenders_placed: u32,
    /// Placement requests that were rejected.
    pub placements_rejected: u32,
    /// Defenders removed from the grid.
    pub defenders_lost: u32,
    /// Projectiles launched by defenders.
    pub projectiles_fired: u32,
    /// Resources credited by generators.
    pub resources_generated: u32,
    /// Resources credited by passive income.
    pub passive_income: u32,
    /// Resources credited by collected pickups.
    pub resources_collected: u32,
    /// Pickups collected by the player.
    pub pickups_collected: u32,
    /// Pickups that expired uncollected.
    pub pickups_expired: u32,
    /// Hostiles that entered the field.
    pub hostiles_spawned: u32,
    /// Hostiles destroyed by projectiles.
    pub kills_by_projectile: u32,
    /// Hostiles destroyed by bombs.
    pub kills_by_bomb: u32,
    /// Hostiles destroyed by lane guards.
    pub kills_by_lane_guard: u32,
    /// Lane guards that were triggered.
    pub lane_guards_triggered: u32,
    /// Waves cleared.
    pub waves_cleared: u32,
    /// Most recent game state observed.
    pub outcome: GameState,
}

impl MatchReport {
    /// Total number of hostiles destroyed by any mechanism.
    #[must_use]
    pub const fn total_kills(&self) -> u32 {
        self.kills_by_projectile + self.kills_by_bomb + self.kills_by_lane_guard
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, DefenderKind, DefenderSnapshot, GameState, GridView, MatchReport};
    use std::time::Duration;

    fn snapshot(cell: CellCoord) -> DefenderSnapshot {
        DefenderSnapshot {
            cell,
            kind: DefenderKind::Blocker,
            health: 20,
            action_elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn grid_view_resolves_lane_major_cells() {
        let mut cells = vec![None; 6];
        cells[4] = Some(snapshot(CellCoord::new(1, 1)));
        let view = GridView::new(2, 3, cells);

        assert_eq!(view.dimensions(), (2, 3));
        assert_eq!(
            view.defender(CellCoord::new(1, 1)).map(|defender| defender.cell),
            Some(CellCoord::new(1, 1))
        );
        assert!(view.defender(CellCoord::new(0, 1)).is_none());
        assert_eq!(view.occupied().count(), 1);
    }

    #[test]
    fn grid_view_ignores_out_of_range_cells() {
        let view = GridView::new(2, 3, vec![None; 6]);
        assert!(view.defender(CellCoord::new(2, 0)).is_none());
        assert!(view.defender(CellCoord::new(0, 3)).is_none());
    }

    #[test]
    fn terminal_states_end_the_game() {
        assert!(GameState::GameOver.is_terminal());
        assert!(GameState::Won.is_terminal());
        assert!(!GameState::Paused.is_terminal());
        assert!(!GameState::Menu.is_terminal());
    }

    #[test]
    fn selection_bar_lists_every_kind_once() {
        let mut kinds = DefenderKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), DefenderKind::ALL.len());
    }

    #[test]
    fn match_report_serialises_outcome_as_text() {
        let report = MatchReport {
            kills_by_projectile: 3,
            kills_by_bomb: 2,
            outcome: GameState::Won,
            ..MatchReport::default()
        };
        assert_eq!(report.total_kills(), 5);

        let encoded = toml::to_string(&report).expect("serialize report");
        assert!(encoded.contains("outcome = \"Won\""));
        let decoded: MatchReport = toml::from_str(&encoded).expect("deserialize report");
        assert_eq!(decoded, report);
    }
}
