#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Siege engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! defense coordinator, and the pure systems. Adapters submit [`Command`]
//! values describing desired actions, the coordinator executes them against
//! the shared [`grid::Grid`], and then buffers [`Event`] values that adapters
//! drain to drive sound and presentation. Systems never mutate the grid; they
//! borrow it for queries within a single tick.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod layout;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use error::{ConfigurationError, PlacementError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tile Siege.";

/// Commands that express every action a driver may request from the coordinator.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests construction of an obstacle tower at the provided pixel position.
    PlaceObstacle {
        /// Cursor position expressed in display pixels.
        position: Vec2,
    },
    /// Requests that a new wave of enemies begins spawning.
    StartWave {
        /// Composition and cadence of the wave.
        plan: WavePlan,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events buffered by the coordinator after processing commands and ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that an enemy entered the grid at a spawn point.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy that spawned.
        kind: EnemyKind,
        /// Spawn tile the enemy appeared on.
        cell: CellCoord,
    },
    /// Reports that an enemy could not find any route to the goal.
    EnemyStranded {
        /// Identifier of the stranded enemy.
        enemy: EnemyId,
    },
    /// Confirms that an enemy reached the goal and damaged the objective.
    EnemyReachedGoal {
        /// Identifier of the enemy that arrived.
        enemy: EnemyId,
        /// Damage applied to the objective.
        damage: u32,
    },
    /// Confirms that an enemy was destroyed by a tower.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Resources awarded for the kill.
        reward: u32,
    },
    /// Confirms that a tower fired at an enemy.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that was hit.
        enemy: EnemyId,
    },
    /// Confirms that an obstacle tower was placed on the grid.
    ObstaclePlaced {
        /// Identifier assigned to the new tower.
        tower: TowerId,
        /// Tile the tower occupies.
        cell: CellCoord,
        /// Resources deducted for the placement.
        cost: u32,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Tile resolved from the request, if the position mapped onto the grid.
        cell: Option<CellCoord>,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that every live enemy was asked to recompute its route.
    PathsInvalidated {
        /// Number of enemies that were flagged.
        enemies: usize,
    },
    /// Announces that a wave started spawning.
    WaveStarted {
        /// Number of the wave.
        wave: u32,
        /// Number of enemies the wave will spawn.
        count: u32,
    },
    /// Announces that every enemy of a wave spawned and left the grid.
    WaveCompleted {
        /// Number of the wave.
        wave: u32,
    },
    /// Announces that the objective ran out of health.
    ObjectiveDestroyed,
}

/// Declarative description of a wave requested by a driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavePlan {
    /// Sequential number of the wave, used for reporting.
    pub wave: u32,
    /// Number of enemies that spawn over the course of the wave.
    pub count: u32,
    /// Simulated time between consecutive spawns.
    pub spawn_interval: Duration,
    /// Enemy kinds cycled through as enemies spawn.
    pub kinds: Vec<EnemyKind>,
}

impl WavePlan {
    /// Creates a new wave plan.
    #[must_use]
    pub fn new(wave: u32, count: u32, spawn_interval: Duration, kinds: Vec<EnemyKind>) -> Self {
        Self {
            wave,
            count,
            spawn_interval,
            kinds,
        }
    }

    /// Kind of the enemy spawned at the provided zero-based position in the wave.
    #[must_use]
    pub fn kind_at(&self, index: u32) -> EnemyKind {
        if self.kinds.is_empty() {
            return EnemyKind::Grunt;
        }
        let slot = usize::try_from(index).unwrap_or(0) % self.kinds.len();
        self.kinds[slot]
    }
}

/// Types of enemies that can be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Balanced baseline enemy.
    Grunt,
    /// Fast enemy with little health.
    Runner,
    /// Slow enemy with a large health pool.
    Brute,
}

impl EnemyKind {
    /// Parses a lowercase kind name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "grunt" => Some(Self::Grunt),
            "runner" => Some(Self::Runner),
            "brute" => Some(Self::Brute),
            _ => None,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid tile coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two coordinates share an edge.
    #[must_use]
    pub fn is_adjacent_to(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Ordered sequence of tiles from a start tile to the goal, both inclusive.
///
/// An empty path signals that no route exists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Creates a path from an ordered list of tiles.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Creates the sentinel path that signals an unreachable goal.
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    /// Reports whether the path is the "no path" sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of tiles in the path, including both endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Tile at the provided index, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<CellCoord> {
        self.cells.get(index).copied()
    }

    /// First tile of the path.
    #[must_use]
    pub fn start(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    /// Last tile of the path.
    #[must_use]
    pub fn end(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Tiles composing the path in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }
}

/// Hit points tracked for enemies and the objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the raw health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the health left after subtracting the provided damage.
    #[must_use]
    pub const fn saturating_sub(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }
}

/// Lifecycle of a path-following enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Freshly created and waiting for its first route.
    Spawning,
    /// Following its current route.
    Traveling,
    /// Computing a fresh route on this tick.
    Recalculating,
    /// No route exists; idle until the grid changes.
    Stranded,
    /// Arrived at the goal tile.
    ReachedGoal,
    /// Removed from play.
    Destroyed,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Continuous pixel position of the enemy.
    pub position: Vec2,
    /// Tile beneath the enemy, if it lies on the grid.
    pub cell: Option<CellCoord>,
    /// Remaining health.
    pub health: Health,
    /// Health at spawn.
    pub max_health: Health,
    /// Lifecycle state of the enemy.
    pub state: AgentState,
    /// Indicates whether the enemy will recompute its route on its next update.
    pub needs_recalculation: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the coordinator.
    pub id: TowerId,
    /// Tile occupied by the tower.
    pub cell: CellCoord,
    /// Pixel centre of the tower.
    pub center: Vec2,
    /// Targeting radius in pixels.
    pub range: f32,
    /// Time remaining until the tower may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot describing all towers on the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, EnemyKind, Health, Path, PlacementError, TowerId, WavePlan};
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(3, 4);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn coordinates_order_by_row_then_column() {
        assert!(CellCoord::new(0, 9) < CellCoord::new(1, 0));
        assert!(CellCoord::new(2, 1) < CellCoord::new(2, 3));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn wave_plan_round_trips_through_bincode() {
        let plan = WavePlan::new(
            3,
            12,
            Duration::from_millis(750),
            vec![EnemyKind::Runner, EnemyKind::Brute],
        );
        assert_round_trip(&plan);
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&PlacementError::WouldBlockPath);
    }

    #[test]
    fn wave_plan_cycles_kinds() {
        let plan = WavePlan::new(
            1,
            5,
            Duration::from_secs(1),
            vec![EnemyKind::Grunt, EnemyKind::Runner],
        );
        assert_eq!(plan.kind_at(0), EnemyKind::Grunt);
        assert_eq!(plan.kind_at(1), EnemyKind::Runner);
        assert_eq!(plan.kind_at(4), EnemyKind::Grunt);
    }

    #[test]
    fn empty_kind_sequence_defaults_to_grunt() {
        let plan = WavePlan::new(1, 2, Duration::from_secs(1), Vec::new());
        assert_eq!(plan.kind_at(1), EnemyKind::Grunt);
    }

    #[test]
    fn health_saturates_at_zero() {
        let health = Health::new(3).saturating_sub(10);
        assert!(health.is_zero());
    }

    #[test]
    fn empty_path_reports_no_endpoints() {
        let path = Path::empty();
        assert!(path.is_empty());
        assert_eq!(path.start(), None);
        assert_eq!(path.end(), None);
    }

    #[test]
    fn enemy_kind_parses_names() {
        assert_eq!(EnemyKind::from_name(" Runner "), Some(EnemyKind::Runner));
        assert_eq!(EnemyKind::from_name("dragon"), None);
    }
}
