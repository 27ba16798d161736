//! Global grid tessellation: tile a projected plane with square, hex or
//! diamond cells and stream them back in geographic coordinates.
//!
//! The lattice is planned on the projection (30 cells across the equator
//! at level 1, quadrupling per level), enumerated row by row through a
//! bounded queue, and expanded by worker threads into closed (lat, lon)
//! polygons with a reproducible content hash.
//!
//! ```no_run
//! use std::sync::Mutex;
//! use worldgrid::{CellSink, GridBuilder, GridCell, GridConfig};
//!
//! struct Collect(Mutex<Vec<GridCell>>);
//!
//! impl CellSink for Collect {
//!     fn cell(&self, cell: GridCell) {
//!         self.0.lock().unwrap().push(cell);
//!     }
//! }
//!
//! # fn main() -> Result<(), worldgrid::GridError> {
//! let builder = GridBuilder::resolve("behrmann")?;
//! let sink = Collect(Mutex::new(Vec::new()));
//! builder.build_grid(&GridConfig::default().with_level(2), &sink)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod grid;
pub mod proj;

pub use error::{GridError, PlanError, ProjError};
pub use grid::{CancelFlag, CellShape, CellSink, GridBuilder, GridCell, GridConfig};
pub use proj::resolver::GridTransform;
