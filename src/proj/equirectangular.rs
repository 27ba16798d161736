//! Equirectangular (Plate Carrée) projection.
//!
//! forward: x = a·(λ - λ₀)·cos(φ₁), y = a·φ
//! inverse: λ = λ₀ + x/(a·cos(φ₁)), φ = y/a
//!
//! Total on the globe, poles included.

use crate::error::ProjError;
use crate::proj::ellipsoid::{Ellipsoid, WGS84};
use crate::proj::Projection;

pub struct Equirectangular {
    ellipsoid: Ellipsoid,
    lon0: f64,
    cos_lat_ts: f64,
}

impl Equirectangular {
    pub fn new(ellipsoid: Ellipsoid, lon0: f64, lat_ts: f64) -> Self {
        Self {
            ellipsoid,
            lon0,
            cos_lat_ts: lat_ts.cos(),
        }
    }

    /// World Equidistant Cylindrical (EPSG:4087): WGS84, equatorial aspect.
    pub fn world() -> Self {
        Self::new(WGS84, 0.0, 0.0)
    }
}

impl Projection for Equirectangular {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if !lat.is_finite() {
            return Err(ProjError::OutOfDomain);
        }
        let x = self.ellipsoid.a * (lon - self.lon0) * self.cos_lat_ts;
        let y = self.ellipsoid.a * lat;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let lon = self.lon0 + x / (self.ellipsoid.a * self.cos_lat_ts);
        let lat = y / self.ellipsoid.a;
        Ok((lon, lat))
    }
}
