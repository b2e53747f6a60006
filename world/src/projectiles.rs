//! Projectiles travelling toward the far edge of their lane.

use std::time::Duration;

use lane_defence_core::{ProjectileId, ProjectileKind, ProjectileSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) lane: u32,
    pub(crate) x: f32,
    /// Position before the latest advance.
    pub(crate) previous_x: f32,
    pub(crate) damage: i32,
    pub(crate) kind: ProjectileKind,
    speed: f32,
}

impl Projectile {
    pub(crate) fn new(
        id: ProjectileId,
        lane: u32,
        x: f32,
        speed: f32,
        damage: i32,
        kind: ProjectileKind,
    ) -> Self {
        Self {
            id,
            lane,
            x,
            previous_x: x,
            damage,
            kind,
            speed,
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.previous_x = self.x;
        self.x += self.speed * dt.as_secs_f32();
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            lane: self.lane,
            x: self.x,
            damage: self.damage,
            kind: self.kind,
        }
    }
}
