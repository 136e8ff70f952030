/// Geographic position in WGS84 degrees.
///
/// Construction through [`LonLat::try_new`] guarantees both components are
/// finite and inside their valid ranges.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordError {
    NonFinite,
    LongitudeOutOfRange(f64),
    LatitudeOutOfRange(f64),
}

impl std::fmt::Display for CoordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordError::NonFinite => write!(f, "coordinate is not a finite number"),
            CoordError::LongitudeOutOfRange(v) => {
                write!(f, "longitude {v} outside [-180, 180]")
            }
            CoordError::LatitudeOutOfRange(v) => write!(f, "latitude {v} outside [-90, 90]"),
        }
    }
}

impl std::error::Error for CoordError {}

impl LonLat {
    pub fn try_new(lon_deg: f64, lat_deg: f64) -> Result<Self, CoordError> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return Err(CoordError::NonFinite);
        }
        if !(-180.0..=180.0).contains(&lon_deg) {
            return Err(CoordError::LongitudeOutOfRange(lon_deg));
        }
        if !(-90.0..=90.0).contains(&lat_deg) {
            return Err(CoordError::LatitudeOutOfRange(lat_deg));
        }
        Ok(Self { lon_deg, lat_deg })
    }

    /// `[lat, lon]` order, as expected by most web map libraries.
    pub fn lat_lon(&self) -> [f64; 2] {
        [self.lat_deg, self.lon_deg]
    }
}

/// Map viewport: a center and a slippy-map zoom level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub center: LonLat,
    pub zoom: u8,
}

/// Continental zoom used before any query runs.
pub const CONTINENTAL_ZOOM: u8 = 5;
/// Close "city-block" zoom used when focusing a single feature.
pub const CITY_BLOCK_ZOOM: u8 = 13;

impl Viewport {
    pub fn new(center: LonLat, zoom: u8) -> Self {
        Self { center, zoom }
    }

    /// Initial view over the Indian subcontinent.
    pub fn initial() -> Self {
        Self {
            center: LonLat {
                lon_deg: 78.9629,
                lat_deg: 20.5937,
            },
            zoom: CONTINENTAL_ZOOM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoordError, LonLat, Viewport};

    #[test]
    fn accepts_range_edges() {
        assert!(LonLat::try_new(-180.0, -90.0).is_ok());
        assert!(LonLat::try_new(180.0, 90.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert_eq!(
            LonLat::try_new(180.5, 0.0),
            Err(CoordError::LongitudeOutOfRange(180.5))
        );
        assert_eq!(
            LonLat::try_new(0.0, -91.0),
            Err(CoordError::LatitudeOutOfRange(-91.0))
        );
        assert_eq!(LonLat::try_new(f64::NAN, 0.0), Err(CoordError::NonFinite));
        assert_eq!(
            LonLat::try_new(0.0, f64::INFINITY),
            Err(CoordError::NonFinite)
        );
    }

    #[test]
    fn initial_viewport_is_continental() {
        let v = Viewport::initial();
        assert_eq!(v.center.lat_lon(), [20.5937, 78.9629]);
        assert_eq!(v.zoom, 5);
    }
}
