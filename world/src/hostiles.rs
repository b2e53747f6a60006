//! Hostiles advancing along their lanes toward the defended edge.

use std::time::Duration;

use lane_defence_core::{HostileId, HostileKind, HostileProfile, HostileSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Hostile {
    pub(crate) id: HostileId,
    pub(crate) lane: u32,
    pub(crate) kind: HostileKind,
    pub(crate) health: i32,
    pub(crate) x: f32,
    /// Position before the latest advance.
    pub(crate) previous_x: f32,
    base_speed: f32,
    speed: f32,
    slowed_for: Duration,
}

impl Hostile {
    pub(crate) fn new(
        id: HostileId,
        lane: u32,
        kind: HostileKind,
        profile: &HostileProfile,
        x: f32,
    ) -> Self {
        Self {
            id,
            lane,
            kind,
            health: profile.health,
            x,
            previous_x: x,
            base_speed: profile.speed,
            speed: profile.speed,
            slowed_for: Duration::ZERO,
        }
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Runs down an active slow, then moves toward the defended edge.
    pub(crate) fn advance(&mut self, dt: Duration) {
        if !self.slowed_for.is_zero() {
            self.slowed_for = self.slowed_for.saturating_sub(dt);
            if self.slowed_for.is_zero() {
                self.speed = self.base_speed;
            }
        }
        self.previous_x = self.x;
        self.x -= self.speed * dt.as_secs_f32();
    }

    pub(crate) fn take_damage(&mut self, amount: i32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Applies or refreshes a slow.
    pub(crate) fn slow(&mut self, factor: f32, duration: Duration) {
        self.speed = self.base_speed * factor;
        self.slowed_for = duration;
    }

    pub(crate) fn snapshot(&self) -> HostileSnapshot {
        HostileSnapshot {
            id: self.id,
            lane: self.lane,
            kind: self.kind,
            health: self.health,
            x: self.x,
            base_speed: self.base_speed,
            speed: self.speed,
            slowed_for: self.slowed_for,
        }
    }
}
