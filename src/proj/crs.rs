use crate::error::ProjError;
use proj4rs::Proj;

/// Thin wrapper around proj4rs that handles radians/degrees conversion
/// transparently.
///
/// proj4rs works in radians for geographic CRS while this crate's public
/// surface uses degrees, so both directions convert at the boundary.
pub struct CrsTransform {
    geographic: Proj,
    projected: Proj,
    projected_is_geo: bool,
}

impl CrsTransform {
    /// Create a transform between WGS84 geographic coordinates and the
    /// projected CRS identified by `epsg`.
    pub fn new(epsg: u32) -> Result<Self, ProjError> {
        let geographic = Proj::from_user_string("EPSG:4326")
            .map_err(|e| ProjError::UnknownCrs(format!("EPSG:4326: {e}")))?;
        let projected = Proj::from_user_string(&format!("EPSG:{epsg}"))
            .map_err(|e| ProjError::UnknownCrs(format!("EPSG:{epsg}: {e}")))?;
        let projected_is_geo = projected.is_latlong();
        Ok(Self {
            geographic,
            projected,
            projected_is_geo,
        })
    }

    /// Geographic (lon, lat in degrees) to projected coordinates.
    pub fn to_projected(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let mut point = (lon.to_radians(), lat.to_radians());
        proj4rs::transform::transform(&self.geographic, &self.projected, &mut point)
            .map_err(|e| ProjError::TransformFailed(e.to_string()))?;
        if self.projected_is_geo {
            Ok((point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok(point)
        }
    }

    /// Projected coordinates to geographic (lon, lat in degrees).
    pub fn to_geographic(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let mut point = if self.projected_is_geo {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };
        proj4rs::transform::transform(&self.projected, &self.geographic, &mut point)
            .map_err(|e| ProjError::TransformFailed(e.to_string()))?;
        Ok((point.0.to_degrees(), point.1.to_degrees()))
    }

    /// Batch projected-to-geographic transform, in place. Output in degrees.
    pub fn to_geographic_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        if self.projected_is_geo {
            for c in coords.iter_mut() {
                c.0 = c.0.to_radians();
                c.1 = c.1.to_radians();
            }
        }
        proj4rs::transform::transform(&self.projected, &self.geographic, coords)
            .map_err(|e| ProjError::TransformFailed(e.to_string()))?;
        for c in coords.iter_mut() {
            c.0 = c.0.to_degrees();
            c.1 = c.1.to_degrees();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roundtrip_utm() {
        // Oslo, Norway: ~10.75°E, ~59.91°N through UTM zone 33N
        let ct = CrsTransform::new(32633).unwrap();

        let (e, n) = ct.to_projected(10.75, 59.91).unwrap();
        assert!(e > 200_000.0 && e < 800_000.0, "easting out of range: {e}");
        assert!(
            n > 6_000_000.0 && n < 7_000_000.0,
            "northing out of range: {n}"
        );

        let (lon, lat) = ct.to_geographic(e, n).unwrap();
        assert_relative_eq!(lon, 10.75, epsilon = 1e-8);
        assert_relative_eq!(lat, 59.91, epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_crs() {
        assert!(CrsTransform::new(99999).is_err());
    }

    #[test]
    fn test_batch_matches_single() {
        let ct = CrsTransform::new(32633).unwrap();
        let (e, n) = ct.to_projected(15.0, 52.0).unwrap();

        let mut coords = vec![(e, n), (e + 10_000.0, n + 10_000.0)];
        ct.to_geographic_batch(&mut coords).unwrap();

        let single = ct.to_geographic(e, n).unwrap();
        assert_relative_eq!(coords[0].0, single.0, epsilon = 1e-12);
        assert_relative_eq!(coords[0].1, single.1, epsilon = 1e-12);
        for (lon, lat) in &coords {
            assert!(*lon > 10.0 && *lon < 20.0, "lon = {lon}");
            assert!(*lat > 50.0 && *lat < 55.0, "lat = {lat}");
        }
    }
}
