//! Per-shape cell geometry: footprints, square/diamond/hex construction,
//! offset cells, densification, reprojection and the antimeridian check.
//!
//! Everything here is a pure function over footprints; queue and thread
//! concerns live in the builder.

use geo::{Densify, EuclideanLength};
use geo_types::{Coord, LineString, Polygon};
use log::trace;

use crate::grid::cell::CellShape;
use crate::proj::resolver::GridTransform;

/// Longitude of the rejection seam just west of the antimeridian. Cells
/// whose ring straddles this line are wrap-around artifacts of the
/// lattice's left edge and are discarded.
pub const SEAM_LONGITUDE: f64 = -180.005;

/// Ordered 5-point ring in projected coordinates: upper-left, lower-left,
/// lower-right, upper-right, closing point. Transient, producer-to-worker
/// hand-off only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellFootprint {
    ring: [(f64, f64); 5],
}

impl CellFootprint {
    /// Axis-aligned footprint with lower-left corner (x, y) and edge
    /// length `size`.
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self {
            ring: [
                (x, y + size),        // ul
                (x, y),               // ll
                (x + size, y),        // lr
                (x + size, y + size), // ur
                (x, y + size),
            ],
        }
    }

    fn from_corners(ul: (f64, f64), ll: (f64, f64), lr: (f64, f64), ur: (f64, f64)) -> Self {
        Self {
            ring: [ul, ll, lr, ur, ul],
        }
    }

    pub fn ring(&self) -> &[(f64, f64); 5] {
        &self.ring
    }

    fn left(&self) -> f64 {
        self.ring[0].0
    }

    fn right(&self) -> f64 {
        self.ring[3].0
    }

    fn top(&self) -> f64 {
        self.ring[0].1
    }

    fn bottom(&self) -> f64 {
        self.ring[1].1
    }

    fn center(&self) -> (f64, f64) {
        (
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }
}

/// Build the candidate polygon(s) for one footprint: one for squares, two
/// for diamonds and hexes (the base cell plus the offset cell that
/// completes the tiling from a square enumeration lattice).
pub fn candidate_rings(footprint: &CellFootprint, shape: CellShape) -> Vec<Polygon<f64>> {
    match shape {
        CellShape::Square => vec![shape_polygon(footprint, shape)],
        CellShape::Diamond | CellShape::Hex => vec![
            shape_polygon(footprint, shape),
            shape_polygon(&offset_footprint(footprint, shape), shape),
        ],
    }
}

/// Construct the shape polygon for a footprint, in projected coordinates.
fn shape_polygon(footprint: &CellFootprint, shape: CellShape) -> Polygon<f64> {
    let (cx, cy) = footprint.center();
    let top = footprint.top();
    let bottom = footprint.bottom();
    let left = footprint.left();
    let right = footprint.right();

    let ring: Vec<(f64, f64)> = match shape {
        CellShape::Square => footprint.ring().to_vec(),
        CellShape::Diamond => vec![(cx, top), (left, cy), (cx, bottom), (right, cy), (cx, top)],
        CellShape::Hex => {
            // Vertical span split into quarters
            let dy = (top - bottom) / 4.0;
            let y1 = top - dy;
            let y2 = bottom + dy;
            vec![
                (cx, top),
                (left, y1),
                (left, y2),
                (cx, bottom),
                (right, y2),
                (right, y1),
                (cx, top),
            ]
        }
    };

    Polygon::new(LineString::from(ring), vec![])
}

/// Footprint of the second cell, right and down from the base footprint.
///
/// Diamonds shift by half the cell width and height; hexes shift an extra
/// quarter-height so the rows interlock.
fn offset_footprint(footprint: &CellFootprint, shape: CellShape) -> CellFootprint {
    let (cx, cy) = footprint.center();
    let width = footprint.right() - footprint.left();
    let height = footprint.top() - footprint.bottom();

    match shape {
        CellShape::Hex => {
            let dy = height / 4.0;
            CellFootprint::from_corners(
                (cx, cy - dy),
                (cx, cy - height - dy),
                (cx + width, cy - height - dy),
                (cx + width, cy - dy),
            )
        }
        _ => CellFootprint::from_corners(
            (cx, cy),
            (cx, cy - height),
            (cx + width, cy - height),
            (cx + width, cy),
        ),
    }
}

/// Insert intermediate vertices so that vertex spacing is approximately
/// perimeter / density. A density of 1 (or less) is a no-op.
pub fn densify(polygon: &Polygon<f64>, density: f64) -> Polygon<f64> {
    if density > 1.0 {
        let spacing = polygon.exterior().euclidean_length() / density;
        polygon.densify(spacing)
    } else {
        polygon.clone()
    }
}

/// Reproject a projected-space polygon to geographic (lon, lat) degrees.
///
/// A vertex outside the projection's valid domain discards the whole
/// candidate; this is expected, not exceptional.
pub fn reproject(polygon: &Polygon<f64>, transform: &GridTransform) -> Option<Polygon<f64>> {
    let mut coords: Vec<(f64, f64)> = polygon.exterior().coords().map(|c| (c.x, c.y)).collect();
    if let Err(err) = transform.to_geographic_batch(&mut coords) {
        trace!("dropping candidate outside projection domain: {err}");
        return None;
    }
    Some(Polygon::new(LineString::from(coords), vec![]))
}

/// True when the ring straddles the antimeridian seam line.
pub fn crosses_seam(polygon: &Polygon<f64>) -> bool {
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    for c in polygon.exterior().coords() {
        min_lon = min_lon.min(c.x);
        max_lon = max_lon.max(c.x);
    }
    min_lon < SEAM_LONGITUDE && max_lon > SEAM_LONGITUDE
}

/// Swap a (lon, lat) ring into the (lat, lon) storage order.
pub fn swap_axes(polygon: &Polygon<f64>) -> Polygon<f64> {
    let ring: Vec<Coord<f64>> = polygon
        .exterior()
        .coords()
        .map(|c| Coord { x: c.y, y: c.x })
        .collect();
    Polygon::new(LineString::new(ring), vec![])
}
