//! Geographic query points and their projection into planar meters.
//!
//! Everything the engine measures happens in spherical Web Mercator
//! (EPSG:3857). Geographic coordinates (EPSG:4326) are validated and
//! projected exactly once, at the boundary, through [`GeoPoint`].

use geo::Coord;
use thiserror::Error;

/// Sphere radius used by EPSG:3857, in meters.
pub const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Largest latitude representable in Web Mercator, in degrees.
///
/// Beyond this the projected northing grows without bound.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// Errors returned when a geographic coordinate cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidCoordinateError {
    /// Latitude or longitude was NaN or infinite.
    #[error("coordinate ({lat}, {lon}) is not finite")]
    NonFinite {
        /// Supplied latitude.
        lat: f64,
        /// Supplied longitude.
        lon: f64,
    },
    /// Latitude fell outside `-90..=90`.
    #[error("latitude {lat} is outside -90..=90")]
    LatitudeOutOfRange {
        /// Supplied latitude.
        lat: f64,
    },
    /// Longitude fell outside `-180..=180`.
    #[error("longitude {lon} is outside -180..=180")]
    LongitudeOutOfRange {
        /// Supplied longitude.
        lon: f64,
    },
    /// Latitude is geographic but too close to a pole to project.
    #[error("latitude {lat} is outside the Web Mercator domain (±85.05112878)")]
    OutsideProjection {
        /// Supplied latitude.
        lat: f64,
    },
}

/// A validated WGS84 position.
///
/// # Examples
/// ```
/// use sitewise_core::GeoPoint;
///
/// # fn main() -> Result<(), sitewise_core::InvalidCoordinateError> {
/// let origin = GeoPoint::new(0.0, 0.0)?;
/// let planar = origin.to_planar();
/// assert_eq!(planar.x, 0.0);
/// assert!(planar.y.abs() < 1e-9);
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Validate a latitude/longitude pair.
    ///
    /// # Errors
    /// Returns [`InvalidCoordinateError`] for non-finite values, values
    /// outside the geographic range, or latitudes Web Mercator cannot
    /// represent.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinateError::NonFinite { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinateError::LatitudeOutOfRange { lat });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinateError::LongitudeOutOfRange { lon });
        }
        if lat.abs() > MAX_MERCATOR_LATITUDE {
            return Err(InvalidCoordinateError::OutsideProjection { lat });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(self) -> f64 {
        self.lon
    }

    /// Project into EPSG:3857 meters (`x` = easting, `y` = northing).
    #[must_use]
    pub fn to_planar(self) -> Coord<f64> {
        project(self.lon, self.lat)
    }
}

/// Spherical Web Mercator forward projection.
///
/// Callers must pass coordinates already validated by [`GeoPoint::new`].
#[expect(
    clippy::float_arithmetic,
    reason = "map projection is floating-point trigonometry"
)]
pub(crate) fn project(lon: f64, lat: f64) -> Coord<f64> {
    let x = WEB_MERCATOR_RADIUS * lon.to_radians();
    let y = WEB_MERCATOR_RADIUS
        * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
            .tan()
            .ln();
    Coord { x, y }
}

/// Planar Euclidean distance in meters.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "Euclidean distance")]
pub fn planar_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point values"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-3;

    #[rstest]
    #[case(0.0, 180.0, 20_037_508.342_789_244, 0.0)]
    #[case(0.0, -180.0, -20_037_508.342_789_244, 0.0)]
    #[case(MAX_MERCATOR_LATITUDE, 0.0, 0.0, 20_037_508.34)]
    // Cirebon, West Java.
    #[case(-6.971_841, 108.519_947, 12_080_385.24, -778_024.12)]
    fn projects_reference_points(
        #[case] lat: f64,
        #[case] lon: f64,
        #[case] x: f64,
        #[case] y: f64,
    ) {
        let planar = GeoPoint::new(lat, lon).expect("valid point").to_planar();
        assert!((planar.x - x).abs() < 1.0, "easting {} vs {x}", planar.x);
        assert!((planar.y - y).abs() < 1.0, "northing {} vs {y}", planar.y);
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn rejects_non_finite(#[case] lat: f64, #[case] lon: f64) {
        assert!(matches!(
            GeoPoint::new(lat, lon),
            Err(InvalidCoordinateError::NonFinite { .. })
        ));
    }

    #[rstest]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            GeoPoint::new(-90.5, 0.0),
            Err(InvalidCoordinateError::LatitudeOutOfRange { .. })
        ));
        assert!(matches!(
            GeoPoint::new(0.0, 180.5),
            Err(InvalidCoordinateError::LongitudeOutOfRange { .. })
        ));
        assert!(matches!(
            GeoPoint::new(89.0, 0.0),
            Err(InvalidCoordinateError::OutsideProjection { .. })
        ));
    }

    #[rstest]
    fn planar_distance_is_euclidean() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 300.0, y: 400.0 };
        assert!((planar_distance(a, b) - 500.0).abs() < TOLERANCE);
        assert!((planar_distance(b, a) - 500.0).abs() < TOLERANCE);
    }
}
