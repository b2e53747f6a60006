//! Tunable parameters for a simulation.
//!
//! Every section deserialises with defaults so adapters can load partial
//! TOML documents. Durations are expressed in seconds to keep the documents
//! readable; accessors convert them to [`Duration`] values.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DefenderKind, HostileKind};

/// Problems detected while validating a [`SimulationConfig`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The grid must contain at least one lane and one column.
    #[error("grid must have at least one lane and one column (got {lanes}x{columns})")]
    EmptyGrid {
        /// Configured lane count.
        lanes: u32,
        /// Configured column count.
        columns: u32,
    },
    /// A length, speed or interval must be strictly positive and finite.
    #[error("`{field}` must be positive and finite (got {value})")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// A starting health value must be strictly positive.
    #[error("`{field}` health must be positive (got {value})")]
    NonPositiveHealth {
        /// Name of the offending profile.
        field: &'static str,
        /// Configured value.
        value: i32,
    },
    /// At least one wave with a non-zero quota is required.
    #[error("waves must be non-empty (total {total_waves}, base quota {base_quota})")]
    NoWaves {
        /// Configured wave count.
        total_waves: u32,
        /// Configured base quota.
        base_quota: u32,
    },
    /// The slow factor must lie in `(0, 1]`.
    #[error("slow factor must lie in (0, 1] (got {0})")]
    SlowFactor(f32),
    /// The spawn acceleration must lie in `(0, 1]`.
    #[error("spawn acceleration must lie in (0, 1] (got {0})")]
    SpawnAcceleration(f32),
    /// Every hostile spawn weight is zero.
    #[error("at least one hostile kind needs a non-zero spawn weight")]
    NoHostileWeight,
}

/// Complete configuration of a simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the random stream driving spawns and pickups.
    pub seed: u64,
    /// Field layout.
    pub grid: GridConfig,
    /// Resource economy.
    pub economy: EconomyConfig,
    /// Wave scheduling.
    pub waves: WaveConfig,
    /// Projectiles, melee, breaches and lane guards.
    pub combat: CombatConfig,
    /// Per-kind defender parameters.
    pub defenders: DefenderTable,
    /// Per-kind hostile parameters.
    pub hostiles: HostileTable,
}

impl SimulationConfig {
    /// Checks every parameter, reporting the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.lanes == 0 || grid.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                lanes: grid.lanes,
                columns: grid.columns,
            });
        }

        let economy = &self.economy;
        let waves = &self.waves;
        let combat = &self.combat;
        let defenders = &self.defenders;
        let hostiles = &self.hostiles;

        let positive = [
            ("grid.cell_length", grid.cell_length),
            ("economy.passive_interval_secs", economy.passive_interval_secs),
            ("economy.pickup_interval_secs", economy.pickup_interval_secs),
            ("economy.pickup_drift", economy.pickup_drift),
            ("economy.pickup_size", economy.pickup_size),
            ("waves.initial_spawn_interval_secs", waves.initial_spawn_interval_secs),
            ("waves.minimum_spawn_interval_secs", waves.minimum_spawn_interval_secs),
            ("waves.post_wave_delay_secs", waves.post_wave_delay_secs),
            ("combat.projectile_speed", combat.projectile_speed),
            ("combat.hit_half_width", combat.hit_half_width),
            ("combat.slow_duration_secs", combat.slow_duration_secs),
            ("combat.melee_dps", combat.melee_dps),
            ("combat.lane_guard_speed", combat.lane_guard_speed),
            ("combat.lane_guard_half_width", combat.lane_guard_half_width),
            ("defenders.attacker.interval_secs", defenders.attacker.interval_secs),
            (
                "defenders.frost_attacker.interval_secs",
                defenders.frost_attacker.interval_secs,
            ),
            ("defenders.generator.interval_secs", defenders.generator.interval_secs),
            ("defenders.bomb.fuse_secs", defenders.bomb.fuse_secs),
            ("hostiles.standard.speed", hostiles.standard.speed),
            ("hostiles.armored.speed", hostiles.armored.speed),
            ("hostiles.heavily_armored.speed", hostiles.heavily_armored.speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("combat.spawn_margin", combat.spawn_margin),
            ("combat.defended_edge", combat.defended_edge),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let healths = [
            ("defenders.attacker", defenders.attacker.health),
            ("defenders.frost_attacker", defenders.frost_attacker.health),
            ("defenders.generator", defenders.generator.health),
            ("defenders.blocker", defenders.blocker.health),
            ("defenders.bomb", defenders.bomb.health),
            ("hostiles.standard", hostiles.standard.health),
            ("hostiles.armored", hostiles.armored.health),
            ("hostiles.heavily_armored", hostiles.heavily_armored.health),
        ];
        for (field, value) in healths {
            if value <= 0 {
                return Err(ConfigError::NonPositiveHealth { field, value });
            }
        }

        if waves.total_waves == 0 || waves.base_quota == 0 {
            return Err(ConfigError::NoWaves {
                total_waves: waves.total_waves,
                base_quota: waves.base_quota,
            });
        }

        if !(combat.slow_factor > 0.0 && combat.slow_factor <= 1.0) {
            return Err(ConfigError::SlowFactor(combat.slow_factor));
        }

        if !(waves.spawn_acceleration > 0.0 && waves.spawn_acceleration <= 1.0) {
            return Err(ConfigError::SpawnAcceleration(waves.spawn_acceleration));
        }

        if HostileKind::ALL
            .iter()
            .all(|kind| hostiles.profile(*kind).spawn_weight == 0)
        {
            return Err(ConfigError::NoHostileWeight);
        }

        Ok(())
    }
}

/// Layout of the lane grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of lanes hostiles travel along.
    pub lanes: u32,
    /// Number of columns per lane.
    pub columns: u32,
    /// Side length of a square cell in field units.
    pub cell_length: f32,
}

impl GridConfig {
    /// Width of the field; also the far bound for projectiles and guards.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Height of the field; also the bottom bound for pickups.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.lanes as f32 * self.cell_length
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lanes: 5,
            columns: 9,
            cell_length: 80.0,
        }
    }
}

/// Parameters of the resource economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Balance at the start of a game.
    pub initial_balance: u32,
    /// Amount credited by each passive accrual.
    pub passive_amount: u32,
    /// Seconds between passive accruals.
    pub passive_interval_secs: f32,
    /// Seconds between pickup spawns.
    pub pickup_interval_secs: f32,
    /// Amount credited by a collected pickup.
    pub pickup_value: u32,
    /// Downward drift of pickups in field units per second.
    pub pickup_drift: f32,
    /// Side length of a pickup's square collection bounds.
    pub pickup_size: f32,
}

impl EconomyConfig {
    /// Interval between passive accruals.
    #[must_use]
    pub fn passive_interval(&self) -> Duration {
        seconds(self.passive_interval_secs)
    }

    /// Interval between pickup spawns.
    #[must_use]
    pub fn pickup_interval(&self) -> Duration {
        seconds(self.pickup_interval_secs)
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_balance: 150,
            passive_amount: 25,
            passive_interval_secs: 5.0,
            pickup_interval_secs: 10.0,
            pickup_value: 25,
            pickup_drift: 30.0,
            pickup_size: 40.0,
        }
    }
}

/// Parameters of the wave scheduler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Number of waves that must be cleared to win.
    pub total_waves: u32,
    /// Hostiles in the first wave; wave `n` spawns `n` times as many.
    pub base_quota: u32,
    /// Spawn interval of the first wave; wave `n` starts at `1/n` of it.
    pub initial_spawn_interval_secs: f32,
    /// Factor applied to the spawn interval after every spawn.
    pub spawn_acceleration: f32,
    /// Lower bound of the spawn interval.
    pub minimum_spawn_interval_secs: f32,
    /// Pause between clearing a wave and starting the next one.
    pub post_wave_delay_secs: f32,
}

impl WaveConfig {
    /// Spawn interval at the start of the first wave.
    #[must_use]
    pub fn initial_spawn_interval(&self) -> Duration {
        seconds(self.initial_spawn_interval_secs)
    }

    /// Lower bound of the spawn interval.
    #[must_use]
    pub fn minimum_spawn_interval(&self) -> Duration {
        seconds(self.minimum_spawn_interval_secs)
    }

    /// Pause between clearing a wave and starting the next one.
    #[must_use]
    pub fn post_wave_delay(&self) -> Duration {
        seconds(self.post_wave_delay_secs)
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            total_waves: 3,
            base_quota: 10,
            initial_spawn_interval_secs: 10.0,
            spawn_acceleration: 0.99,
            minimum_spawn_interval_secs: 3.0,
            post_wave_delay_secs: 5.0,
        }
    }
}

/// Parameters of projectiles, melee, breaches and lane guards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Horizontal projectile speed in field units per second.
    pub projectile_speed: f32,
    /// Half width of the symmetric projectile hit window.
    pub hit_half_width: f32,
    /// Multiplier applied to a hostile's base speed while slowed.
    pub slow_factor: f32,
    /// Seconds a frost hit slows a hostile for.
    pub slow_duration_secs: f32,
    /// Damage per second a hostile deals to the defender it stands on.
    pub melee_dps: f32,
    /// Distance beyond the far bound at which hostiles spawn.
    pub spawn_margin: f32,
    /// Hostiles with a position below this value breach their lane.
    pub defended_edge: f32,
    /// Lane guard speed in field units per second.
    pub lane_guard_speed: f32,
    /// Half width of the lane guard's sweep window.
    pub lane_guard_half_width: f32,
    /// Score awarded per hostile destroyed by a projectile or bomb.
    pub score_per_kill: u32,
}

impl CombatConfig {
    /// Duration of a frost slow.
    #[must_use]
    pub fn slow_duration(&self) -> Duration {
        seconds(self.slow_duration_secs)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 200.0,
            hit_half_width: 20.0,
            slow_factor: 0.5,
            slow_duration_secs: 3.0,
            melee_dps: 2.0,
            spawn_margin: 10.0,
            defended_edge: 50.0,
            lane_guard_speed: 200.0,
            lane_guard_half_width: 40.0,
            score_per_kill: 10,
        }
    }
}

/// Parameters of a projectile-firing defender.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShooterProfile {
    /// Placement cost.
    pub cost: u32,
    /// Starting health.
    pub health: i32,
    /// Seconds between shots.
    pub interval_secs: f32,
    /// Damage dealt by each projectile.
    pub projectile_damage: i32,
}

impl ShooterProfile {
    /// Time between shots.
    #[must_use]
    pub fn interval(&self) -> Duration {
        seconds(self.interval_secs)
    }
}

/// Parameters of a resource generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorProfile {
    /// Placement cost.
    pub cost: u32,
    /// Starting health.
    pub health: i32,
    /// Seconds between generations.
    pub interval_secs: f32,
    /// Amount credited per generation.
    pub amount: u32,
}

impl GeneratorProfile {
    /// Time between generations.
    #[must_use]
    pub fn interval(&self) -> Duration {
        seconds(self.interval_secs)
    }
}

/// Parameters of a blocker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockerProfile {
    /// Placement cost.
    pub cost: u32,
    /// Starting health.
    pub health: i32,
}

/// Parameters of a bomb.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BombProfile {
    /// Placement cost.
    pub cost: u32,
    /// Starting health.
    pub health: i32,
    /// Seconds between placement and detonation.
    pub fuse_secs: f32,
}

impl BombProfile {
    /// Time between placement and detonation.
    #[must_use]
    pub fn fuse(&self) -> Duration {
        seconds(self.fuse_secs)
    }
}

/// Per-kind defender parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenderTable {
    /// Kinetic shooter.
    pub attacker: ShooterProfile,
    /// Frost shooter.
    pub frost_attacker: ShooterProfile,
    /// Resource generator.
    pub generator: GeneratorProfile,
    /// Damage sink.
    pub blocker: BlockerProfile,
    /// Area bomb.
    pub bomb: BombProfile,
}

impl DefenderTable {
    /// Placement cost of the provided kind.
    #[must_use]
    pub fn cost(&self, kind: DefenderKind) -> u32 {
        match kind {
            DefenderKind::Attacker => self.attacker.cost,
            DefenderKind::FrostAttacker => self.frost_attacker.cost,
            DefenderKind::Generator => self.generator.cost,
            DefenderKind::Blocker => self.blocker.cost,
            DefenderKind::Bomb => self.bomb.cost,
        }
    }

    /// Starting health of the provided kind.
    #[must_use]
    pub fn health(&self, kind: DefenderKind) -> i32 {
        match kind {
            DefenderKind::Attacker => self.attacker.health,
            DefenderKind::FrostAttacker => self.frost_attacker.health,
            DefenderKind::Generator => self.generator.health,
            DefenderKind::Blocker => self.blocker.health,
            DefenderKind::Bomb => self.bomb.health,
        }
    }
}

impl Default for DefenderTable {
    fn default() -> Self {
        Self {
            attacker: ShooterProfile {
                cost: 100,
                health: 5,
                interval_secs: 2.0,
                projectile_damage: 2,
            },
            frost_attacker: ShooterProfile {
                cost: 175,
                health: 5,
                interval_secs: 3.0,
                projectile_damage: 2,
            },
            generator: GeneratorProfile {
                cost: 50,
                health: 5,
                interval_secs: 7.0,
                amount: 25,
            },
            blocker: BlockerProfile {
                cost: 125,
                health: 20,
            },
            bomb: BombProfile {
                cost: 150,
                health: 5,
                fuse_secs: 2.0,
            },
        }
    }
}

/// Parameters of a hostile kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostileProfile {
    /// Starting health.
    pub health: i32,
    /// Base speed in field units per second.
    pub speed: f32,
    /// Relative likelihood of the kind being spawned.
    pub spawn_weight: u32,
}

/// Per-kind hostile parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileTable {
    /// Baseline hostile.
    pub standard: HostileProfile,
    /// Armoured hostile.
    pub armored: HostileProfile,
    /// Heavily armoured hostile.
    pub heavily_armored: HostileProfile,
}

impl HostileTable {
    /// Parameters of the provided kind.
    #[must_use]
    pub fn profile(&self, kind: HostileKind) -> &HostileProfile {
        match kind {
            HostileKind::Standard => &self.standard,
            HostileKind::Armored => &self.armored,
            HostileKind::HeavilyArmored => &self.heavily_armored,
        }
    }

    /// Spawn weights paired with their kinds, in [`HostileKind::ALL`] order.
    #[must_use]
    pub fn spawn_weights(&self) -> [(HostileKind, u32); 3] {
        HostileKind::ALL.map(|kind| (kind, self.profile(kind).spawn_weight))
    }
}

impl Default for HostileTable {
    fn default() -> Self {
        Self {
            standard: HostileProfile {
                health: 10,
                speed: 15.0,
                spawn_weight: 5,
            },
            armored: HostileProfile {
                health: 18,
                speed: 18.0,
                spawn_weight: 3,
            },
            heavily_armored: HostileProfile {
                health: 30,
                speed: 12.0,
                spawn_weight: 2,
            },
        }
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}
