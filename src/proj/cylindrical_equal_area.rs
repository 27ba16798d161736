//! Cylindrical Equal Area projection (ellipsoidal).
//!
//! forward: x = a·k₀·(λ - λ₀), y = a·q(φ)/(2·k₀)
//! inverse: λ = λ₀ + x/(a·k₀), φ = phi_from_q(2·y·k₀/a)
//!
//! Area-preserving on the full globe; the poles map to finite y, so no
//! domain restriction applies. The Behrmann variant (EPSG:54017) uses a
//! standard parallel of 30°.

use crate::error::ProjError;
use crate::proj::common::{msfn, phi_from_q, qsfn};
use crate::proj::ellipsoid::{Ellipsoid, WGS84};
use crate::proj::Projection;

pub struct CylindricalEqualArea {
    ellipsoid: Ellipsoid,
    lon0: f64,
    k0: f64,
}

impl CylindricalEqualArea {
    pub fn new(ellipsoid: Ellipsoid, lon0: f64, lat_ts: f64) -> Self {
        let k0 = msfn(lat_ts, ellipsoid.e2);
        Self {
            ellipsoid,
            lon0,
            k0,
        }
    }

    /// Behrmann equal area (EPSG:54017): WGS84, standard parallel 30°.
    pub fn behrmann() -> Self {
        Self::new(WGS84, 0.0, 30.0_f64.to_radians())
    }
}

impl Projection for CylindricalEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if !lat.is_finite() {
            return Err(ProjError::OutOfDomain);
        }
        let e = self.ellipsoid.eccentricity();
        let x = self.ellipsoid.a * self.k0 * (lon - self.lon0);
        let y = self.ellipsoid.a * qsfn(lat, e) / (2.0 * self.k0);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let e = self.ellipsoid.eccentricity();
        let lon = self.lon0 + x / (self.ellipsoid.a * self.k0);
        let q = 2.0 * y * self.k0 / self.ellipsoid.a;
        let q_pole = qsfn(std::f64::consts::FRAC_PI_2, e);
        if q.abs() > q_pole {
            return Err(ProjError::OutOfDomain);
        }
        let lat = phi_from_q(q, e);
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_behrmann_origin() {
        let proj = CylindricalEqualArea::behrmann();
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_behrmann_reference() {
        // EPSG:54017 world extent: x ≈ ±17367530.45 at λ = ±180°
        let proj = CylindricalEqualArea::behrmann();
        let (x, _) = proj.forward(PI, 0.0).unwrap();
        assert_relative_eq!(x, 17_367_530.45, epsilon = 1.0);
    }

    #[test]
    fn test_behrmann_pole_is_finite() {
        let proj = CylindricalEqualArea::behrmann();
        let (_, y_n) = proj.forward(0.0, FRAC_PI_2).unwrap();
        let (_, y_s) = proj.forward(0.0, -FRAC_PI_2).unwrap();
        assert!(y_n.is_finite() && y_n > 7_000_000.0, "y_n = {y_n}");
        assert_relative_eq!(y_s, -y_n, epsilon = 1e-6);
    }

    #[test]
    fn test_behrmann_roundtrip() {
        let proj = CylindricalEqualArea::behrmann();
        let cases: &[(f64, f64)] = &[
            (0.0, 0.0),
            (10.0, 45.0),
            (-73.9857, 40.7484),
            (139.6917, 35.6895),
            (0.0, 89.0),
            (0.0, -89.0),
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_no_declared_bound() {
        // Domain reaches the poles, so no latitude bound is declared
        assert_eq!(CylindricalEqualArea::behrmann().max_latitude(), None);
    }

    #[test]
    fn test_inverse_beyond_pole_fails() {
        let proj = CylindricalEqualArea::behrmann();
        assert!(proj.inverse(0.0, 8_000_000.0).is_err());
    }
}
