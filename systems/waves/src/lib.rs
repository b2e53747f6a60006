#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler that paces hostile spawns and detects cleared waves.
//!
//! The scheduler never touches hostiles itself. Each call to
//! [`WaveScheduler::advance`] reports what should happen through
//! [`WaveEvent`] values, and the world turns spawn requests into hostiles.

use std::time::Duration;

use lane_defence_core::{ConfigError, HostileKind, WaveConfig, WaveProgress};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};
use tracing::{debug, info};

/// Phases of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// No game has started yet.
    Idle,
    /// The current wave is spawning or still being fought.
    Spawning,
    /// The current wave was cleared; waiting out the post-wave delay.
    Cleared,
    /// Every wave was cleared.
    Finished,
}

/// Notifications produced while advancing the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveEvent {
    /// A wave began.
    Started {
        /// One-based wave index.
        wave: u32,
        /// Hostiles the wave spawns.
        required: u32,
    },
    /// A hostile should enter the field.
    Spawn {
        /// Lane chosen for the hostile.
        lane: u32,
        /// Kind chosen for the hostile.
        kind: HostileKind,
    },
    /// The current wave was cleared.
    Cleared {
        /// One-based wave index.
        wave: u32,
    },
    /// The last wave's delay elapsed; the game is won.
    AllCleared,
}

/// Wave scheduler state machine.
#[derive(Clone, Debug)]
pub struct WaveScheduler {
    lanes: u32,
    total_waves: u32,
    base_quota: u32,
    initial_interval: Duration,
    minimum_interval: Duration,
    acceleration: f32,
    post_wave_delay: Duration,
    kinds: [HostileKind; 3],
    weights: WeightedIndex<u32>,
    phase: WavePhase,
    wave: u32,
    spawned: u32,
    required: u32,
    destroyed: u32,
    interval: Duration,
    since_spawn: Duration,
    since_clear: Duration,
}

impl WaveScheduler {
    /// Creates an idle scheduler spawning into `lanes` lanes.
    ///
    /// Fails when every spawn weight is zero.
    pub fn new(
        config: &WaveConfig,
        lanes: u32,
        spawn_weights: [(HostileKind, u32); 3],
    ) -> Result<Self, ConfigError> {
        let kinds = spawn_weights.map(|(kind, _)| kind);
        let weights = WeightedIndex::new(spawn_weights.iter().map(|(_, weight)| *weight))
            .map_err(|_| ConfigError::NoHostileWeight)?;

        Ok(Self {
            lanes,
            total_waves: config.total_waves,
            base_quota: config.base_quota,
            initial_interval: config.initial_spawn_interval(),
            minimum_interval: config.minimum_spawn_interval(),
            acceleration: config.spawn_acceleration,
            post_wave_delay: config.post_wave_delay(),
            kinds,
            weights,
            phase: WavePhase::Idle,
            wave: 1,
            spawned: 0,
            required: 0,
            destroyed: 0,
            interval: config.initial_spawn_interval(),
            since_spawn: Duration::ZERO,
            since_clear: Duration::ZERO,
        })
    }

    /// Returns the scheduler to its construction-time idle state.
    pub fn reset(&mut self) {
        self.phase = WavePhase::Idle;
        self.wave = 1;
        self.spawned = 0;
        self.required = 0;
        self.destroyed = 0;
        self.interval = self.initial_interval;
        self.since_spawn = Duration::ZERO;
        self.since_clear = Duration::ZERO;
    }

    /// Starts the first wave.
    pub fn start(&mut self, out: &mut Vec<WaveEvent>) {
        self.reset();
        self.enter_wave(out);
    }

    /// Current phase of the state machine.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Current spawn interval.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.interval
    }

    /// Snapshot of the current wave's progress.
    #[must_use]
    pub const fn progress(&self) -> WaveProgress {
        WaveProgress {
            current: self.wave,
            total: self.total_waves,
            spawned: self.spawned,
            required: self.required,
            destroyed: self.destroyed,
            in_progress: matches!(self.phase, WavePhase::Spawning),
        }
    }

    /// Records a hostile destroyed during the current wave.
    pub fn record_destroyed(&mut self) {
        self.destroyed = self.destroyed.saturating_add(1);
    }

    /// Advances the state machine by `dt` given the number of live hostiles.
    pub fn advance<R>(
        &mut self,
        dt: Duration,
        live_hostiles: usize,
        rng: &mut R,
        out: &mut Vec<WaveEvent>,
    ) where
        R: Rng,
    {
        match self.phase {
            WavePhase::Idle | WavePhase::Finished => {}
            WavePhase::Spawning => {
                if self.spawned >= self.required && live_hostiles == 0 {
                    self.phase = WavePhase::Cleared;
                    self.since_clear = Duration::ZERO;
                    info!(wave = self.wave, "wave cleared");
                    out.push(WaveEvent::Cleared { wave: self.wave });
                    return;
                }

                if self.spawned >= self.required {
                    return;
                }

                self.since_spawn = self.since_spawn.saturating_add(dt);
                if self.since_spawn >= self.interval {
                    self.since_spawn = Duration::ZERO;
                    let lane = rng.gen_range(0..self.lanes.max(1));
                    let kind = self.kinds[self.weights.sample(rng)];
                    self.spawned += 1;
                    self.interval = self.accelerated_interval();
                    debug!(wave = self.wave, lane, ?kind, spawned = self.spawned, "spawn due");
                    out.push(WaveEvent::Spawn { lane, kind });
                }
            }
            WavePhase::Cleared => {
                self.since_clear = self.since_clear.saturating_add(dt);
                if self.since_clear < self.post_wave_delay {
                    return;
                }

                self.wave += 1;
                if self.wave > self.total_waves {
                    self.phase = WavePhase::Finished;
                    info!(waves = self.total_waves, "all waves cleared");
                    out.push(WaveEvent::AllCleared);
                } else {
                    self.enter_wave(out);
                }
            }
        }
    }

    fn enter_wave(&mut self, out: &mut Vec<WaveEvent>) {
        self.phase = WavePhase::Spawning;
        self.spawned = 0;
        self.destroyed = 0;
        self.required = self.base_quota.saturating_mul(self.wave);
        self.interval = self.initial_interval / self.wave;
        self.since_spawn = Duration::ZERO;
        info!(wave = self.wave, required = self.required, "wave started");
        out.push(WaveEvent::Started {
            wave: self.wave,
            required: self.required,
        });
    }

    fn accelerated_interval(&self) -> Duration {
        self.interval
            .mul_f32(self.acceleration)
            .max(self.minimum_interval)
    }
}
