//! One-shot guards that sweep a breached lane clean.

use std::time::Duration;

use lane_defence_core::{LaneGuardSnapshot, LaneGuardState};

#[derive(Clone, Debug)]
pub(crate) struct LaneGuard {
    lane: u32,
    x: f32,
    state: LaneGuardState,
}

impl LaneGuard {
    pub(crate) fn new(lane: u32, x: f32) -> Self {
        Self {
            lane,
            x,
            state: LaneGuardState::Idle,
        }
    }

    /// Starts sweeping; only an idle guard can be triggered.
    pub(crate) fn trigger(&mut self) -> bool {
        if self.state != LaneGuardState::Idle {
            return false;
        }
        self.state = LaneGuardState::Sweeping;
        true
    }

    /// Moves a sweeping guard, returning its lane and new position.
    pub(crate) fn sweep(&mut self, dt: Duration, speed: f32) -> Option<(u32, f32)> {
        if self.state != LaneGuardState::Sweeping {
            return None;
        }
        self.x += speed * dt.as_secs_f32();
        Some((self.lane, self.x))
    }

    pub(crate) fn retire(&mut self) {
        self.state = LaneGuardState::Spent;
    }

    pub(crate) fn snapshot(&self) -> LaneGuardSnapshot {
        LaneGuardSnapshot {
            lane: self.lane,
            x: self.x,
            state: self.state,
        }
    }
}
