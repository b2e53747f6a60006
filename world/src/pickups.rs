//! Resource pickups drifting down the field until collected or expired.

use std::time::Duration;

use glam::Vec2;
use lane_defence_core::{PickupId, PickupSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Pickup {
    pub(crate) id: PickupId,
    pub(crate) value: u32,
    position: Vec2,
    drift: f32,
    half_size: f32,
}

impl Pickup {
    pub(crate) fn new(id: PickupId, position: Vec2, value: u32, drift: f32, size: f32) -> Self {
        Self {
            id,
            value,
            position,
            drift,
            half_size: size * 0.5,
        }
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.position.y += self.drift * dt.as_secs_f32();
    }

    /// Reports whether the point lies inside the pickup's bounding square.
    pub(crate) fn contains(&self, point: Vec2) -> bool {
        let min = self.position - Vec2::splat(self.half_size);
        let max = self.position + Vec2::splat(self.half_size);
        point.cmpge(min).all() && point.cmplt(max).all()
    }

    pub(crate) fn snapshot(&self) -> PickupSnapshot {
        PickupSnapshot {
            id: self.id,
            position: self.position,
            value: self.value,
        }
    }
}
