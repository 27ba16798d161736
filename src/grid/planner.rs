//! Lattice planning: level multipliers, cell size, horizontal extents and
//! the pole bound search.

use log::debug;

use crate::error::PlanError;
use crate::grid::cell::CellShape;
use crate::proj::resolver::GridTransform;

/// Highest level with a defined multiplier; anything outside 1..=MAX_LEVEL
/// falls back to level 1.
pub const MAX_LEVEL: u8 = 9;

/// Cells per side quadruple with each level.
fn multiplier(level: u8) -> u64 {
    1u64 << (2 * (level - 1) as u32)
}

/// Lattice geometry for one (projection, shape, level) combination, in
/// projected coordinates.
#[derive(Clone, Copy, Debug)]
pub struct GridPlan {
    level: u8,
    grid_size: f64,
    left_offset: f64,
    west_x: f64,
    east_x: f64,
    top_y: f64,
    bottom_y: f64,
}

impl GridPlan {
    /// Plan the lattice for `shape` at `level` on the given projection.
    ///
    /// The equator spans 30 cells at level 1; the horizontal extent is
    /// derived from projecting (180°, 0°). Diamond lattices above level 1
    /// start half a cell west so rows interleave across levels.
    pub fn new(
        transform: &GridTransform,
        shape: CellShape,
        level: u8,
    ) -> Result<Self, PlanError> {
        let level = if (1..=MAX_LEVEL).contains(&level) {
            level
        } else {
            1
        };

        let (east_x, _) = transform.to_projected(180.0, 0.0)?;
        let west_x = -east_x;
        let grid_size = 2.0 * east_x / (30.0 * multiplier(level) as f64);

        let left_offset = if shape == CellShape::Diamond && level > 1 {
            grid_size / 2.0
        } else {
            0.0
        };

        let (top_y, bottom_y) = pole_bounds(transform, grid_size, east_x)?;

        debug!(
            "grid plan: EPSG:{} {shape:?} level {level}, size {grid_size:.3}, \
             x [{west_x:.3}, {east_x:.3}], y [{bottom_y:.3}, {top_y:.3}]",
            transform.id()
        );

        Ok(Self {
            level,
            grid_size,
            left_offset,
            west_x,
            east_x,
            top_y,
            bottom_y,
        })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn left_offset(&self) -> f64 {
        self.left_offset
    }

    pub fn west_x(&self) -> f64 {
        self.west_x
    }

    pub fn east_x(&self) -> f64 {
        self.east_x
    }

    pub fn top_y(&self) -> f64 {
        self.top_y
    }

    pub fn bottom_y(&self) -> f64 {
        self.bottom_y
    }
}

/// Projected y extents of the lattice.
///
/// Projections that are total at the poles give the bounds directly.
/// Otherwise walk north one row at a time until the projection's declared
/// latitude bound is reached; the first row at or past the bound caps the
/// lattice, mirrored south.
fn pole_bounds(
    transform: &GridTransform,
    grid_size: f64,
    east_x: f64,
) -> Result<(f64, f64), PlanError> {
    let direct = transform.to_projected(0.0, 90.0).and_then(|(_, top)| {
        transform
            .to_projected(0.0, -90.0)
            .map(|(_, bottom)| (top, bottom))
    });
    if let Ok((top, bottom)) = direct {
        if top.is_finite() && bottom.is_finite() {
            return Ok((top, bottom));
        }
    }

    let max_lat = transform
        .max_latitude()
        .ok_or_else(|| PlanError::NoPoleBound(format!("EPSG:{}", transform.id())))?;

    // Row positions are multiples of grid_size, computed by index so the
    // bound returned here is bit-identical to the enumerator's rows.
    for step in 1u64.. {
        let y = step as f64 * grid_size;
        if y >= east_x * 4.0 {
            break;
        }
        let (_, lat) = transform.to_geographic(0.0, y)?;
        if lat >= max_lat {
            return Ok((y, -y));
        }
    }
    Err(PlanError::NoPoleBound(format!("EPSG:{}", transform.id())))
}
