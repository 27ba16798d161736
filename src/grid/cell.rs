//! Grid cell value type and its content hash.

use std::hash::Hasher;

use geo::Centroid;
use geo_types::Polygon;
use rustc_hash::FxHasher;

/// Shape of an individual grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellShape {
    Square = 1,
    Hex = 2,
    Diamond = 3,
}

/// A single grid cell, immutable once constructed.
///
/// The exterior ring is stored in (latitude, longitude) axis order, closed
/// (first vertex equals last): 5 vertices for square/diamond, 7 for hex,
/// more after densification.
#[derive(Clone, Debug)]
pub struct GridCell {
    shape: CellShape,
    level: u8,
    projection_id: u32,
    geometry: Polygon<f64>,
    content_hash: i64,
}

impl GridCell {
    /// Build a cell from its final (lat, lon) geometry, deriving the
    /// content hash from the geometry's centroid. Returns `None` when the
    /// geometry is degenerate and has no centroid.
    pub fn from_geometry(
        shape: CellShape,
        level: u8,
        projection_id: u32,
        geometry: Polygon<f64>,
    ) -> Option<Self> {
        let centroid = geometry.centroid()?;
        let content_hash = content_hash(shape, level, projection_id, centroid.x(), centroid.y());
        Some(Self {
            shape,
            level,
            projection_id,
            geometry,
            content_hash,
        })
    }

    pub fn shape(&self) -> CellShape {
        self.shape
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn projection_id(&self) -> u32 {
        self.projection_id
    }

    pub fn geometry(&self) -> &Polygon<f64> {
        &self.geometry
    }

    pub fn content_hash(&self) -> i64 {
        self.content_hash
    }
}

/// Deterministic fingerprint of a cell's defining parameters.
///
/// A pure function of its inputs: identical (shape, level, projection,
/// centroid) tuples hash identically across runs, threads, and platforms.
/// FxHasher is unseeded, which is what makes the value reproducible.
pub fn content_hash(
    shape: CellShape,
    level: u8,
    projection_id: u32,
    centroid_x: f64,
    centroid_y: f64,
) -> i64 {
    let mut hasher = FxHasher::default();
    hasher.write_u8(shape as u8);
    hasher.write_u8(level);
    hasher.write_u32(projection_id);
    hasher.write_u64(centroid_x.to_bits());
    hasher.write_u64(centroid_y.to_bits());
    hasher.finish() as i64
}
