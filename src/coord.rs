//! Geographic value types: single coordinates and the four-corner region.

use geo::Point;

use crate::error::{GridError, Result};

/// A geographic position in degrees.
///
/// No range checks happen here; values flow through the math untouched.
/// Range validation belongs to [`CornerSet::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Converts to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Converts back from a `geo` point.
    pub fn from_point(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }

    fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// The four corners of the region to subdivide.
///
/// The corners are expected to form a simple quadrilateral when walked
/// left edge, bottom edge, right edge, top edge. That is not checked: a
/// self-intersecting input still yields a mesh, with overlapping or
/// reversed cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSet {
    pub top_left: Coordinate,
    pub top_right: Coordinate,
    pub bottom_left: Coordinate,
    pub bottom_right: Coordinate,
}

impl CornerSet {
    /// Builds a corner set, rejecting non-finite or out-of-range corners.
    pub fn new(
        top_left: Coordinate,
        top_right: Coordinate,
        bottom_left: Coordinate,
        bottom_right: Coordinate,
    ) -> Result<Self> {
        for (label, corner) in [
            ("top-left", top_left),
            ("top-right", top_right),
            ("bottom-left", bottom_left),
            ("bottom-right", bottom_right),
        ] {
            if !corner.is_valid() {
                return Err(GridError::InvalidCoordinate {
                    label: label.to_string(),
                    latitude: corner.latitude,
                    longitude: corner.longitude,
                });
            }
        }

        Ok(Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        })
    }
}

impl Default for CornerSet {
    /// Corners of the surveyed site the map front end displays.
    fn default() -> Self {
        Self {
            top_left: Coordinate::new(24.049985023339868, 37.74100146276254),
            top_right: Coordinate::new(24.06134725897303, 37.74061987222393),
            bottom_left: Coordinate::new(24.049853721229447, 37.738066888652696),
            bottom_right: Coordinate::new(24.060932203545054, 37.737708882231665),
        }
    }
}
