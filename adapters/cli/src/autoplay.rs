//! Scripted player used by the headless adapter.
//!
//! Each frame the strategy collects every falling pickup and requests at most
//! one placement. Placements follow a fixed build order: a generator at the
//! back of every lane, then shooters in the most threatened lanes, then
//! blockers ahead of them. A bomb pre-empts the build order whenever a
//! single cell holds a crowd of hostiles. When the next wanted placement is
//! unaffordable the strategy saves up instead of buying something cheaper.

use std::collections::BTreeMap;

use lane_defence_core::{CellCoord, Command, DefenderKind, GridView, HostileView};
use lane_defence_world::{query, World};

/// Hostiles sharing one cell that justify a bomb.
const BOMB_CROWD: u32 = 3;

/// Build order as `(kind, column)` pairs, applied lane by lane.
const BUILD_ORDER: [(DefenderKind, u32); 4] = [
    (DefenderKind::Generator, 0),
    (DefenderKind::Attacker, 1),
    (DefenderKind::FrostAttacker, 2),
    (DefenderKind::Attacker, 3),
];

/// Commands the strategy wants applied before the next tick.
pub(crate) fn plan(world: &World) -> Vec<Command> {
    let mut commands: Vec<Command> = query::pickup_view(world)
        .iter()
        .map(|pickup| Command::CollectPickup {
            point: pickup.position,
        })
        .collect();

    if let Some((kind, cell)) = next_placement(world) {
        commands.push(Command::SelectDefender { kind });
        commands.push(Command::PlaceDefender { cell });
    }
    commands
}

fn next_placement(world: &World) -> Option<(DefenderKind, CellCoord)> {
    let grid = query::grid(world);
    let hostiles = query::hostile_view(world);
    let cell_length = query::config(world).grid.cell_length;

    let wanted = crowded_cell(&grid, &hostiles, cell_length)
        .map(|cell| (DefenderKind::Bomb, cell))
        .or_else(|| build_order_gap(&grid, &hostiles))?;

    let affordable = query::cost_table(world)
        .iter()
        .any(|entry| entry.kind == wanted.0 && entry.cost <= query::balance(world));
    affordable.then_some(wanted)
}

/// Free cell holding the largest crowd of hostiles, if the crowd is big enough.
fn crowded_cell(grid: &GridView, hostiles: &HostileView, cell_length: f32) -> Option<CellCoord> {
    let (_, columns) = grid.dimensions();
    let mut crowds: BTreeMap<CellCoord, u32> = BTreeMap::new();
    for hostile in hostiles.iter() {
        if hostile.x < 0.0 {
            continue;
        }
        let column = (hostile.x / cell_length).floor() as u32;
        if column < columns {
            *crowds.entry(CellCoord::new(hostile.lane, column)).or_default() += 1;
        }
    }

    crowds
        .into_iter()
        .filter(|(cell, count)| *count >= BOMB_CROWD && grid.defender(*cell).is_none())
        .max_by_key(|(cell, count)| (*count, std::cmp::Reverse(*cell)))
        .map(|(cell, _)| cell)
}

fn build_order_gap(grid: &GridView, hostiles: &HostileView) -> Option<(DefenderKind, CellCoord)> {
    let lanes = lanes_by_threat(grid, hostiles);
    let (_, columns) = grid.dimensions();

    for (kind, column) in BUILD_ORDER {
        if column >= columns {
            continue;
        }
        for lane in &lanes {
            let cell = CellCoord::new(*lane, column);
            if grid.defender(cell).is_none() {
                return Some((kind, cell));
            }
        }
    }

    let blocker_column = columns.checked_sub(3)?;
    lanes
        .iter()
        .map(|lane| CellCoord::new(*lane, blocker_column))
        .find(|cell| {
            grid.defender(*cell).is_none() && hostiles.iter().any(|h| h.lane == cell.lane())
        })
        .map(|cell| (DefenderKind::Blocker, cell))
}

/// Lanes ordered by descending hostile count, ties broken by lane index.
fn lanes_by_threat(grid: &GridView, hostiles: &HostileView) -> Vec<u32> {
    let (lanes, _) = grid.dimensions();
    let mut threat: Vec<(u32, usize)> = (0..lanes)
        .map(|lane| {
            let count = hostiles.iter().filter(|hostile| hostile.lane == lane).count();
            (lane, count)
        })
        .collect();
    threat.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    threat.into_iter().map(|(lane, _)| lane).collect()
}
