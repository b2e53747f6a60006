//! Collision queries shared by the tick phases.
//!
//! Projectile resolution is split in two: [`collect_hits`] pairs projectiles
//! with hostiles without mutating anything, and the world applies the pairs
//! afterwards. A projectile is claimed by at most one hostile and a hostile
//! stops claiming projectiles once the pending damage would kill it.
//!
//! Overlap is tested over the whole tick: a projectile and a hostile collide
//! when the gap between them passed through the hit window while both moved,
//! so long ticks cannot carry a projectile through a hostile unseen.

use lane_defence_core::CellCoord;

use crate::{hostiles::Hostile, projectiles::Projectile};

/// Projectile striking a hostile, as indices into the resolved slices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Hit {
    pub(crate) hostile: usize,
    pub(crate) projectile: usize,
}

pub(crate) fn collect_hits(
    hostiles: &[Hostile],
    projectiles: &[Projectile],
    half_width: f32,
) -> Vec<Hit> {
    let mut claimed = vec![false; projectiles.len()];
    let mut hits = Vec::new();

    for (hostile_index, hostile) in hostiles.iter().enumerate() {
        let mut health = hostile.health;
        for (projectile_index, projectile) in projectiles.iter().enumerate() {
            if health <= 0 {
                break;
            }
            if claimed[projectile_index]
                || projectile.lane != hostile.lane
                || !swept_overlap(hostile, projectile, half_width)
            {
                continue;
            }
            claimed[projectile_index] = true;
            health = health.saturating_sub(projectile.damage);
            hits.push(Hit {
                hostile: hostile_index,
                projectile: projectile_index,
            });
        }
    }

    hits
}

fn swept_overlap(hostile: &Hostile, projectile: &Projectile, half_width: f32) -> bool {
    let before = hostile.previous_x - projectile.previous_x;
    let after = hostile.x - projectile.x;
    before.min(after) < half_width && before.max(after) > -half_width
}

/// Column containing the horizontal position, if it lies on the grid.
pub(crate) fn column_at(x: f32, cell_length: f32, columns: u32) -> Option<u32> {
    if x.is_nan() || x < 0.0 {
        return None;
    }
    let column = (x / cell_length).floor();
    if column >= columns as f32 {
        return None;
    }
    Some(column as u32)
}

/// Reports whether a hostile lies in the grid-clamped 3x3 neighbourhood of
/// the cell.
pub(crate) fn within_blast(
    centre: CellCoord,
    hostile: &Hostile,
    cell_length: f32,
    columns: u32,
) -> bool {
    let Some(column) = column_at(hostile.x, cell_length, columns) else {
        return false;
    };
    centre.lane().abs_diff(hostile.lane) <= 1 && centre.column().abs_diff(column) <= 1
}
