//! Placed defenders and the dense grid that stores them.

use std::time::Duration;

use lane_defence_core::{
    CellCoord, DefenderKind, DefenderSnapshot, DefenderTable, GridView, ProjectileKind,
};

/// Defender occupying a single grid cell.
#[derive(Clone, Debug)]
pub(crate) struct Defender {
    cell: CellCoord,
    kind: DefenderKind,
    health: i32,
    action_elapsed: Duration,
    wear: f32,
}

/// Timed behaviour requested by a defender during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DefenderAction {
    /// Launch a projectile from the defender's cell.
    Fire {
        cell: CellCoord,
        kind: ProjectileKind,
        damage: i32,
    },
    /// Credit resources to the economy.
    Generate { cell: CellCoord, amount: u32 },
    /// Clear the 3x3 neighbourhood around the cell.
    Detonate { cell: CellCoord },
}

impl Defender {
    pub(crate) fn new(cell: CellCoord, kind: DefenderKind, health: i32) -> Self {
        Self {
            cell,
            kind,
            health,
            action_elapsed: Duration::ZERO,
            wear: 0.0,
        }
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) const fn kind(&self) -> DefenderKind {
        self.kind
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Accrues fractional melee damage, converting it to whole health points.
    pub(crate) fn take_melee(&mut self, amount: f32) {
        self.wear += amount;
        let whole = self.wear.floor();
        if whole >= 1.0 {
            self.wear -= whole;
            self.health = self.health.saturating_sub(whole as i32);
        }
    }

    /// Accrues `dt` and reports the action that became due, if any.
    pub(crate) fn act(&mut self, dt: Duration, table: &DefenderTable) -> Option<DefenderAction> {
        self.action_elapsed = self.action_elapsed.saturating_add(dt);

        match self.kind {
            DefenderKind::Attacker => self.fire_when_due(
                table.attacker.interval(),
                ProjectileKind::Kinetic,
                table.attacker.projectile_damage,
            ),
            DefenderKind::FrostAttacker => self.fire_when_due(
                table.frost_attacker.interval(),
                ProjectileKind::Frost,
                table.frost_attacker.projectile_damage,
            ),
            DefenderKind::Generator => {
                if self.action_elapsed < table.generator.interval() {
                    return None;
                }
                self.action_elapsed = Duration::ZERO;
                Some(DefenderAction::Generate {
                    cell: self.cell,
                    amount: table.generator.amount,
                })
            }
            DefenderKind::Bomb => {
                if self.action_elapsed < table.bomb.fuse() {
                    return None;
                }
                self.health = 0;
                Some(DefenderAction::Detonate { cell: self.cell })
            }
            DefenderKind::Blocker => None,
        }
    }

    fn fire_when_due(
        &mut self,
        interval: Duration,
        kind: ProjectileKind,
        damage: i32,
    ) -> Option<DefenderAction> {
        if self.action_elapsed < interval {
            return None;
        }
        self.action_elapsed = Duration::ZERO;
        Some(DefenderAction::Fire {
            cell: self.cell,
            kind,
            damage,
        })
    }

    pub(crate) fn snapshot(&self) -> DefenderSnapshot {
        DefenderSnapshot {
            cell: self.cell,
            kind: self.kind,
            health: self.health,
            action_elapsed: self.action_elapsed,
        }
    }
}

/// Lane-major grid holding at most one defender per cell.
#[derive(Clone, Debug)]
pub(crate) struct DefenderGrid {
    lanes: u32,
    columns: u32,
    cells: Vec<Option<Defender>>,
}

impl DefenderGrid {
    pub(crate) fn new(lanes: u32, columns: u32) -> Self {
        let capacity_u64 = u64::from(lanes) * u64::from(columns);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            lanes,
            columns,
            cells: vec![None; capacity],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.lanes, self.columns)
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.lane() < self.lanes && cell.column() < self.columns {
            let lane = usize::try_from(cell.lane()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(lane * width + column)
        } else {
            None
        }
    }

    pub(crate) fn defender(&self, cell: CellCoord) -> Option<&Defender> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    pub(crate) fn defender_mut(&mut self, cell: CellCoord) -> Option<&mut Defender> {
        let index = self.index(cell)?;
        self.cells.get_mut(index).and_then(Option::as_mut)
    }

    /// Stores the defender in its cell; returns `false` when the cell is
    /// out of range or taken.
    pub(crate) fn place(&mut self, defender: Defender) -> bool {
        let Some(index) = self.index(defender.cell) else {
            return false;
        };
        let Some(slot) = self.cells.get_mut(index) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(defender);
        true
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Defender> {
        self.cells.iter_mut().flatten()
    }

    /// Removes every defender whose health dropped to zero or below.
    pub(crate) fn prune_dead(&mut self) -> Vec<Defender> {
        let mut removed = Vec::new();
        for slot in &mut self.cells {
            if slot.as_ref().is_some_and(|defender| !defender.is_alive()) {
                if let Some(defender) = slot.take() {
                    removed.push(defender);
                }
            }
        }
        removed
    }

    pub(crate) fn view(&self) -> GridView {
        GridView::new(
            self.lanes,
            self.columns,
            self.cells
                .iter()
                .map(|slot| slot.as_ref().map(Defender::snapshot))
                .collect(),
        )
    }
}
