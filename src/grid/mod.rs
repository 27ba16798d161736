//! Grid construction: planning, footprint enumeration, worker pool and
//! the cell value type.

pub mod builder;
pub mod cell;
pub mod planner;
pub mod queue;
pub mod shapes;

pub use builder::{CancelFlag, GridBuilder, GridConfig};
pub use cell::{CellShape, GridCell};

/// Receiver for finished cells. Implementations must tolerate concurrent
/// `cell` calls from multiple worker threads; `done` is called exactly
/// once after all workers have drained.
pub trait CellSink: Sync {
    fn cell(&self, cell: GridCell);

    fn done(&self) {}
}
