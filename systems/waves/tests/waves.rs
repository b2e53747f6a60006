use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use lane_defence_core::{HostileKind, WaveConfig};
use lane_defence_system_waves::{WaveEvent, WavePhase, WaveScheduler};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const WEIGHTS: [(HostileKind, u32); 3] = [
    (HostileKind::Standard, 5),
    (HostileKind::Armored, 3),
    (HostileKind::HeavilyArmored, 2),
];

fn started_scheduler(config: &WaveConfig) -> WaveScheduler {
    let mut scheduler = WaveScheduler::new(config, 5, WEIGHTS).expect("valid weights");
    let mut out = Vec::new();
    scheduler.start(&mut out);
    scheduler
}

/// Advances with one-second ticks until the wave has spawned everything,
/// pretending every spawned hostile is still alive.
fn spawn_entire_wave(scheduler: &mut WaveScheduler, rng: &mut ChaCha8Rng) -> Vec<WaveEvent> {
    let mut spawns = Vec::new();
    let mut guard = 0;
    while scheduler.progress().spawned < scheduler.progress().required {
        let live = usize::try_from(scheduler.progress().spawned).expect("fits");
        let mut out = Vec::new();
        scheduler.advance(Duration::from_secs(1), live.max(1), rng, &mut out);
        spawns.extend(out);
        guard += 1;
        assert!(guard < 10_000, "wave never finished spawning");
    }
    spawns
}

#[test]
fn first_wave_requires_base_quota_spawns() {
    let config = WaveConfig::default();
    let mut scheduler = started_scheduler(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    let spawns = spawn_entire_wave(&mut scheduler, &mut rng);
    assert_eq!(spawns.len(), 10);
    for event in &spawns {
        match event {
            WaveEvent::Spawn { lane, .. } => assert!(*lane < 5),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    let mut out = Vec::new();
    scheduler.advance(Duration::from_secs(60), 3, &mut rng, &mut out);
    assert!(out.is_empty(), "quota reached, nothing else spawns");
    assert_eq!(scheduler.phase(), WavePhase::Spawning);
}

#[test]
fn wave_is_not_cleared_while_hostiles_remain() {
    let config = WaveConfig::default();
    let mut scheduler = started_scheduler(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let _ = spawn_entire_wave(&mut scheduler, &mut rng);

    let mut out = Vec::new();
    scheduler.advance(Duration::from_millis(16), 1, &mut rng, &mut out);
    assert!(out.is_empty());
    assert!(scheduler.progress().in_progress);
}

#[test]
fn wave_is_not_cleared_before_quota_even_without_hostiles() {
    let config = WaveConfig::default();
    let mut scheduler = started_scheduler(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let mut out = Vec::new();
    scheduler.advance(Duration::from_secs(1), 0, &mut rng, &mut out);
    assert!(out.is_empty());
    assert_eq!(scheduler.phase(), WavePhase::Spawning);
}

#[test]
fn cleared_wave_waits_for_delay_then_doubles_quota() {
    let config = WaveConfig::default();
    let mut scheduler = started_scheduler(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let _ = spawn_entire_wave(&mut scheduler, &mut rng);

    let mut out = Vec::new();
    scheduler.advance(Duration::from_millis(16), 0, &mut rng, &mut out);
    assert_eq!(out, vec![WaveEvent::Cleared { wave: 1 }]);
    assert!(!scheduler.progress().in_progress);

    out.clear();
    scheduler.advance(Duration::from_secs(4), 0, &mut rng, &mut out);
    assert!(out.is_empty(), "post-wave delay has not elapsed");

    scheduler.advance(Duration::from_secs(1), 0, &mut rng, &mut out);
    assert_eq!(
        out,
        vec![WaveEvent::Started {
            wave: 2,
            required: 20
        }]
    );
    assert_eq!(scheduler.spawn_interval(), Duration::from_secs(5));
    assert_eq!(scheduler.progress().current, 2);
    assert_eq!(scheduler.progress().spawned, 0);
}

#[test]
fn final_wave_reports_all_cleared_exactly_once() {
    let config = WaveConfig {
        total_waves: 1,
        base_quota: 2,
        ..WaveConfig::default()
    };
    let mut scheduler = started_scheduler(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let _ = spawn_entire_wave(&mut scheduler, &mut rng);

    let mut out = Vec::new();
    scheduler.advance(Duration::from_millis(16), 0, &mut rng, &mut out);
    scheduler.advance(Duration::from_secs(5), 0, &mut rng, &mut out);
    scheduler.advance(Duration::from_secs(5), 0, &mut rng, &mut out);
    scheduler.advance(Duration::from_secs(5), 0, &mut rng, &mut out);

    assert_eq!(
        out,
        vec![WaveEvent::Cleared { wave: 1 }, WaveEvent::AllCleared]
    );
    assert_eq!(scheduler.phase(), WavePhase::Finished);
}

#[test]
fn spawn_interval_never_drops_below_minimum() {
    let config = WaveConfig {
        base_quota: 200,
        ..WaveConfig::default()
    };
    let mut scheduler = started_scheduler(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let _ = spawn_entire_wave(&mut scheduler, &mut rng);
    assert_eq!(scheduler.spawn_interval(), Duration::from_secs(3));
}

#[test]
fn destroyed_counter_resets_with_each_wave() {
    let config = WaveConfig {
        base_quota: 1,
        ..WaveConfig::default()
    };
    let mut scheduler = started_scheduler(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let _ = spawn_entire_wave(&mut scheduler, &mut rng);
    scheduler.record_destroyed();
    assert_eq!(scheduler.progress().destroyed, 1);

    let mut out = Vec::new();
    scheduler.advance(Duration::from_millis(16), 0, &mut rng, &mut out);
    scheduler.advance(Duration::from_secs(5), 0, &mut rng, &mut out);
    assert_eq!(scheduler.progress().current, 2);
    assert_eq!(scheduler.progress().destroyed, 0);
}

#[test]
fn identical_seeds_replay_identically() {
    let first = fingerprint(0x4d59_5df4_d0f3_3173);
    let second = fingerprint(0x4d59_5df4_d0f3_3173);
    assert_eq!(first, second, "replay diverged between runs");
}

fn fingerprint(seed: u64) -> u64 {
    let config = WaveConfig::default();
    let mut scheduler = started_scheduler(&config);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spawns = spawn_entire_wave(&mut scheduler, &mut rng);

    let mut hasher = DefaultHasher::new();
    for event in spawns {
        if let WaveEvent::Spawn { lane, kind } = event {
            (lane, kind).hash(&mut hasher);
        }
    }
    hasher.finish()
}
