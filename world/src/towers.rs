//! Tower storage and identifier allocation.

use tile_siege_core::{TowerId, TowerView};
use tile_siege_system_tower_combat::Tower;

/// Registry that stores towers in creation order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    towers: Vec<Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) const fn new() -> Self {
        Self {
            towers: Vec::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Reserves the identifier of the next tower.
    pub(crate) fn allocate(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, tower: Tower) {
        self.towers.push(tower);
    }

    pub(crate) fn towers_mut(&mut self) -> &mut [Tower] {
        &mut self.towers
    }

    pub(crate) fn view(&self) -> TowerView {
        TowerView::from_snapshots(self.towers.iter().map(Tower::snapshot).collect())
    }
}
