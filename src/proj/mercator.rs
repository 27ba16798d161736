//! Mercator projection — Normal (ellipsoidal, EPSG:3395) and Web Mercator (EPSG:3857).
//!
//! Normal Mercator (ellipsoidal with standard parallel):
//!   forward: x = a·k₀·(λ - λ₀), y = -a·k₀·ln(tsfn(φ, e))
//!   inverse: λ = λ₀ + x/(a·k₀), φ = phi_from_ts(exp(-y/(a·k₀)), e)
//!
//! Web Mercator (spherical):
//!   forward: x = a·(λ - λ₀), y = a·ln(tan(π/4 + φ/2))
//!   inverse: λ = λ₀ + x/a, φ = 2·atan(exp(y/a)) - π/2
//!
//! Both diverge toward the poles. Forward transforms fail with
//! `ProjError::OutOfDomain` at |φ| ≥ 90° rather than clamping, so callers
//! can distinguish projections that cover the poles from those that do not.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::ProjError;
use crate::proj::common::{msfn, phi_from_ts, tsfn};
use crate::proj::ellipsoid::{Ellipsoid, WGS84};
use crate::proj::Projection;

/// Northern limit of the EPSG:3395 area of use, degrees.
const MAX_LAT_3395: f64 = 84.0;

/// Northern limit of the EPSG:3857 area of use, degrees.
const MAX_LAT_3857: f64 = 85.06;

/// Ellipsoidal Mercator projection with a standard parallel.
pub struct Mercator {
    ellipsoid: Ellipsoid,
    lon0: f64,
    k0: f64,
}

impl Mercator {
    pub fn new(ellipsoid: Ellipsoid, lon0: f64, lat_ts: f64) -> Self {
        // Scale factor from standard parallel
        let k0 = msfn(lat_ts, ellipsoid.e2);
        Self {
            ellipsoid,
            lon0,
            k0,
        }
    }

    /// World Mercator (EPSG:3395): WGS84, central meridian 0, k₀ = 1.
    pub fn world() -> Self {
        Self::new(WGS84, 0.0, 0.0)
    }
}

impl Projection for Mercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if !lat.is_finite() || lat.abs() >= FRAC_PI_2 {
            return Err(ProjError::OutOfDomain);
        }
        let e = self.ellipsoid.eccentricity();
        let x = self.ellipsoid.a * self.k0 * (lon - self.lon0);
        let y = self.ellipsoid.a * self.k0 * (-tsfn(lat, e).ln());
        if !y.is_finite() {
            return Err(ProjError::OutOfDomain);
        }
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let e = self.ellipsoid.eccentricity();
        let lon = self.lon0 + x / (self.ellipsoid.a * self.k0);
        let ts = (-y / (self.ellipsoid.a * self.k0)).exp();
        let lat = phi_from_ts(ts, e);
        Ok((lon, lat))
    }

    fn max_latitude(&self) -> Option<f64> {
        Some(MAX_LAT_3395)
    }
}

/// Web Mercator projection (EPSG:3857) — spherical formulae on the WGS84
/// semi-major axis.
pub struct WebMercator {
    ellipsoid: Ellipsoid,
    lon0: f64,
}

impl WebMercator {
    pub fn new() -> Self {
        Self {
            ellipsoid: WGS84,
            lon0: 0.0,
        }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for WebMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if !lat.is_finite() || lat.abs() >= FRAC_PI_2 {
            return Err(ProjError::OutOfDomain);
        }
        let x = self.ellipsoid.a * (lon - self.lon0);
        let y = self.ellipsoid.a * (FRAC_PI_4 + lat / 2.0).tan().ln();
        if !y.is_finite() {
            return Err(ProjError::OutOfDomain);
        }
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let lon = self.lon0 + x / self.ellipsoid.a;
        let lat = 2.0 * (y / self.ellipsoid.a).exp().atan() - FRAC_PI_2;
        Ok((lon, lat))
    }

    fn max_latitude(&self) -> Option<f64> {
        Some(MAX_LAT_3857)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_web_mercator_origin() {
        let proj = WebMercator::new();
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_web_mercator_roundtrip() {
        let proj = WebMercator::new();
        let cases: &[(f64, f64)] = &[
            (0.0, 0.0),
            (10.0, 45.0),
            (-73.9857, 40.7484), // NYC
            (139.6917, 35.6895), // Tokyo
            (-180.0, 0.0),
            (180.0, 0.0),
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_web_mercator_epsg3857_reference() {
        // Known EPSG:3857 values:
        // (0°, 0°) → (0, 0)
        // (180°, 0°) → (20037508.34, 0)
        let proj = WebMercator::new();
        let (x, _) = proj.forward(PI, 0.0).unwrap();
        assert_relative_eq!(x, 20_037_508.342_789_244, epsilon = 0.01);
    }

    #[test]
    fn test_web_mercator_pole_fails() {
        let proj = WebMercator::new();
        assert!(proj.forward(0.0, FRAC_PI_2).is_err());
        assert!(proj.forward(0.0, -FRAC_PI_2).is_err());
        // High latitudes short of the pole still project
        let (_, y) = proj.forward(0.0, 85.5_f64.to_radians()).unwrap();
        assert!(y.is_finite());
    }

    #[test]
    fn test_web_mercator_square_bound() {
        // At lat = atan(sinh(π)) ≈ 85.0511°, y equals the half-width a·π
        let proj = WebMercator::new();
        let lat = std::f64::consts::PI.sinh().atan();
        let (_, y) = proj.forward(0.0, lat).unwrap();
        assert_relative_eq!(y, 20_037_508.342_789_244, epsilon = 0.01);
    }

    #[test]
    fn test_world_mercator_roundtrip() {
        let proj = Mercator::world();
        let cases: &[(f64, f64)] = &[
            (0.0, 0.0),
            (10.0, 45.0),
            (-73.9857, 40.7484),
            (139.6917, 35.6895),
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_world_mercator_reference() {
        // EPSG:3395 at (180°, 0°): x = a·π, y = 0
        let proj = Mercator::world();
        let (x, y) = proj.forward(PI, 0.0).unwrap();
        assert_relative_eq!(x, 20_037_508.342_789_244, epsilon = 0.01);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_world_mercator_pole_fails() {
        let proj = Mercator::world();
        assert!(proj.forward(0.0, FRAC_PI_2).is_err());
    }

    #[test]
    fn test_declared_bounds() {
        assert_eq!(WebMercator::new().max_latitude(), Some(85.06));
        assert_eq!(Mercator::world().max_latitude(), Some(84.0));
    }
}
