//! Injected reporting interface for recoverable conditions.
//!
//! Components receive a [`DiagnosticsHandle`] at construction instead of
//! reaching for a process-wide logger. Production drivers pass
//! [`TracingDiagnostics`]; tests pass [`RecordingDiagnostics`] and inspect what
//! was reported.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::{CellCoord, ConfigurationError, EnemyId};

/// Shared handle to the diagnostics sink.
pub type DiagnosticsHandle = Rc<dyn Diagnostics>;

/// How severe a reported condition is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Non-fatal condition that the simulation recovers from.
    Warning,
    /// Misconfiguration that disables dependent operations.
    Error,
}

/// Recoverable condition observed by the simulation core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A path search started or ended on a tile that cannot be walked.
    BlockedEndpoint {
        /// Requested start tile.
        start: CellCoord,
        /// Requested goal tile.
        goal: CellCoord,
    },
    /// A path search exhausted its frontier without reaching the goal.
    Unreachable {
        /// Requested start tile.
        start: CellCoord,
        /// Requested goal tile.
        goal: CellCoord,
    },
    /// An enemy's position no longer maps onto the grid.
    AgentOffGrid {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// The grid configuration was rejected.
    InvalidGridConfiguration(ConfigurationError),
    /// An operation was requested before a valid configuration was installed.
    NotConfigured {
        /// Name of the skipped operation.
        operation: &'static str,
    },
}

impl Diagnostic {
    /// Severity associated with the condition.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::BlockedEndpoint { .. } | Self::Unreachable { .. } | Self::AgentOffGrid { .. } => {
                Severity::Warning
            }
            Self::InvalidGridConfiguration(_) | Self::NotConfigured { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockedEndpoint { start, goal } => write!(
                f,
                "path endpoints not walkable: start ({}, {}), goal ({}, {})",
                start.row(),
                start.column(),
                goal.row(),
                goal.column()
            ),
            Self::Unreachable { start, goal } => write!(
                f,
                "no path from ({}, {}) to ({}, {})",
                start.row(),
                start.column(),
                goal.row(),
                goal.column()
            ),
            Self::AgentOffGrid { enemy } => {
                write!(f, "enemy {} is outside the grid", enemy.get())
            }
            Self::InvalidGridConfiguration(error) => {
                write!(f, "invalid grid configuration: {error}")
            }
            Self::NotConfigured { operation } => {
                write!(f, "{operation} ignored: defense grid is not configured")
            }
        }
    }
}

/// Sink receiving diagnostics from the simulation core.
pub trait Diagnostics: fmt::Debug {
    /// Records a single condition.
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber installed by the driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl TracingDiagnostics {
    /// Creates a shared handle to the tracing sink.
    #[must_use]
    pub fn handle() -> DiagnosticsHandle {
        Rc::new(Self)
    }
}

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => tracing::warn!(target: "tile_siege", "{diagnostic}"),
            Severity::Error => tracing::error!(target: "tile_siege", "{diagnostic}"),
        }
    }
}

/// Captures diagnostics in memory for later inspection.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Snapshot of every recorded diagnostic in report order.
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    /// Removes and returns every recorded diagnostic.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.entries.take()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}
