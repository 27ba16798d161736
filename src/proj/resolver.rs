//! GridTransform — projection resolver that dispatches between native
//! pure-Rust projections and proj4rs fallback.
//!
//! Accepts the preset names "behrmann" (EPSG:54017) and "google"
//! (EPSG:3857), "EPSG:n" strings, or bare numeric codes. Public
//! coordinates are degrees for geographic and metres for projected;
//! the radians conversion at the projection seam is handled here.

use crate::error::ProjError;
use crate::proj::crs::CrsTransform;
use crate::proj::cylindrical_equal_area::CylindricalEqualArea;
use crate::proj::equirectangular::Equirectangular;
use crate::proj::mercator::{Mercator, WebMercator};
use crate::proj::Projection;

enum Backend {
    /// Recognized EPSG code with a native projection implementation.
    Native(Box<dyn Projection>),
    /// Fallback to proj4rs for everything else.
    Proj4(Box<CrsTransform>),
}

/// A resolved grid projection: geographic (degrees) ↔ projected (metres).
pub struct GridTransform {
    epsg: u32,
    backend: Backend,
}

impl GridTransform {
    /// Resolve a projection identifier.
    ///
    /// Name lookups are limited to "behrmann" and "google"; anything else
    /// must be an "EPSG:n" string or a bare numeric EPSG code.
    pub fn resolve(name: &str) -> Result<Self, ProjError> {
        let code = if name.eq_ignore_ascii_case("behrmann") {
            54017
        } else if name.eq_ignore_ascii_case("google") {
            3857
        } else {
            let digits = name
                .strip_prefix("EPSG:")
                .or_else(|| name.strip_prefix("epsg:"))
                .unwrap_or(name);
            digits
                .parse::<u32>()
                .map_err(|_| ProjError::UnknownCrs(name.to_string()))?
        };
        Self::from_epsg(code)
    }

    /// Resolve a numeric EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, ProjError> {
        let backend = match native_projection(code) {
            Some(proj) => Backend::Native(proj),
            None => Backend::Proj4(Box::new(CrsTransform::new(code)?)),
        };
        Ok(Self {
            epsg: code,
            backend,
        })
    }

    /// The EPSG code this transform was resolved from.
    pub fn id(&self) -> u32 {
        self.epsg
    }

    /// Declared northern latitude bound of the projection's valid domain,
    /// in degrees. `None` when the domain reaches the poles or when no
    /// bound is known (proj4rs fallback).
    pub fn max_latitude(&self) -> Option<f64> {
        match &self.backend {
            Backend::Native(proj) => proj.max_latitude(),
            Backend::Proj4(_) => None,
        }
    }

    /// Geographic (lon, lat in degrees) to projected coordinates.
    pub fn to_projected(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        match &self.backend {
            Backend::Native(proj) => proj.forward(lon.to_radians(), lat.to_radians()),
            Backend::Proj4(ct) => ct.to_projected(lon, lat),
        }
    }

    /// Projected coordinates to geographic (lon, lat in degrees).
    pub fn to_geographic(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        match &self.backend {
            Backend::Native(proj) => {
                let (lon, lat) = proj.inverse(x, y)?;
                Ok((lon.to_degrees(), lat.to_degrees()))
            }
            Backend::Proj4(ct) => ct.to_geographic(x, y),
        }
    }

    /// Batch projected-to-geographic transform, in place. Output in degrees.
    pub fn to_geographic_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        match &self.backend {
            Backend::Native(proj) => {
                proj.inverse_batch(coords)?;
                for c in coords.iter_mut() {
                    c.0 = c.0.to_degrees();
                    c.1 = c.1.to_degrees();
                }
                Ok(())
            }
            Backend::Proj4(ct) => ct.to_geographic_batch(coords),
        }
    }
}

/// Native projection lookup by EPSG code.
fn native_projection(code: u32) -> Option<Box<dyn Projection>> {
    match code {
        // Web Mercator
        3857 => Some(Box::new(WebMercator::new())),

        // World Mercator
        3395 => Some(Box::new(Mercator::world())),

        // World Equidistant Cylindrical
        4087 => Some(Box::new(Equirectangular::world())),

        // Behrmann equal area
        54017 => Some(Box::new(CylindricalEqualArea::behrmann())),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_presets() {
        assert_eq!(GridTransform::resolve("behrmann").unwrap().id(), 54017);
        assert_eq!(GridTransform::resolve("BEHRMANN").unwrap().id(), 54017);
        assert_eq!(GridTransform::resolve("google").unwrap().id(), 3857);
    }

    #[test]
    fn test_resolve_epsg_strings() {
        assert_eq!(GridTransform::resolve("EPSG:3857").unwrap().id(), 3857);
        assert_eq!(GridTransform::resolve("epsg:3395").unwrap().id(), 3395);
        assert_eq!(GridTransform::resolve("4087").unwrap().id(), 4087);
    }

    #[test]
    fn test_resolve_garbage_fails() {
        assert!(GridTransform::resolve("mercatorish").is_err());
        assert!(GridTransform::resolve("EPSG:abc").is_err());
    }

    #[test]
    fn test_native_google_reference() {
        let t = GridTransform::resolve("google").unwrap();
        let (x, y) = t.to_projected(180.0, 0.0).unwrap();
        assert_relative_eq!(x, 20_037_508.342_789_244, epsilon = 0.01);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_native_behrmann_reference() {
        let t = GridTransform::resolve("behrmann").unwrap();
        let (x, _) = t.to_projected(180.0, 0.0).unwrap();
        assert_relative_eq!(x, 17_367_530.45, epsilon = 1.0);
        // Poles project to finite y
        let (_, y) = t.to_projected(0.0, 90.0).unwrap();
        assert!(y.is_finite() && y > 7_000_000.0);
    }

    #[test]
    fn test_degrees_roundtrip() {
        for name in ["google", "behrmann", "EPSG:3395", "EPSG:4087"] {
            let t = GridTransform::resolve(name).unwrap();
            let (x, y) = t.to_projected(12.5, 41.9).unwrap();
            let (lon, lat) = t.to_geographic(x, y).unwrap();
            assert_relative_eq!(lon, 12.5, epsilon = 1e-8);
            assert_relative_eq!(lat, 41.9, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_google_pole_fails() {
        let t = GridTransform::resolve("google").unwrap();
        assert!(t.to_projected(0.0, 90.0).is_err());
        assert_eq!(t.max_latitude(), Some(85.06));
    }

    #[test]
    fn test_fallback_to_proj4rs() {
        // UTM 33N has no native implementation
        let t = GridTransform::from_epsg(32633).unwrap();
        assert_eq!(t.id(), 32633);
        assert_eq!(t.max_latitude(), None);
        let (e, n) = t.to_projected(15.0, 52.0).unwrap();
        assert_relative_eq!(e, 500_000.0, epsilon = 1.0);
        assert!(n > 5_700_000.0 && n < 5_800_000.0, "northing = {n}");
    }

    #[test]
    fn test_batch_matches_single() {
        let t = GridTransform::resolve("google").unwrap();
        let (x, y) = t.to_projected(15.0, 52.0).unwrap();
        let mut coords = vec![(x, y), (x + 1000.0, y + 1000.0)];
        t.to_geographic_batch(&mut coords).unwrap();
        let (lon, lat) = t.to_geographic(x, y).unwrap();
        assert_relative_eq!(coords[0].0, lon, epsilon = 1e-12);
        assert_relative_eq!(coords[0].1, lat, epsilon = 1e-12);
    }
}
