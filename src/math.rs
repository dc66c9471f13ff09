//! Geodesic primitives, edge interpolation and raster coordinate helpers.
//!
//! Distances are haversine distances on the mean-radius sphere; bearings and
//! destinations follow rhumb lines (constant compass bearing) on the same
//! sphere, so walking `distance(a, b)` along `rhumb_bearing(a, b)` from `a`
//! ends next to `b`.

use geo::{Coord, HaversineDistance, RhumbBearing, RhumbDestination};

use crate::coord::Coordinate;
use crate::error::{GridError, Result};

/// Surface distance in meters between two coordinates.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    a.to_point().haversine_distance(&b.to_point())
}

/// Constant compass bearing in degrees, `[0, 360)`, of the rhumb line from `a` to `b`.
pub fn rhumb_bearing(a: Coordinate, b: Coordinate) -> f64 {
    a.to_point().rhumb_bearing(b.to_point())
}

/// Point reached after `distance_m` meters on the rhumb line leaving `origin` at `bearing_deg`.
pub fn destination_point(origin: Coordinate, distance_m: f64, bearing_deg: f64) -> Coordinate {
    Coordinate::from_point(origin.to_point().rhumb_destination(bearing_deg, distance_m))
}

/// Largest step count [`interpolate_edge`] accepts.
pub const MAX_EDGE_STEPS: usize = 999_999;

/// Splits the rhumb line from `start` to `end` into `steps` equal parts.
///
/// Returns `steps + 1` points. The first one is `start` itself; the last one
/// lands on `end` up to floating point error.
pub fn interpolate_edge(start: Coordinate, end: Coordinate, steps: usize) -> Result<Vec<Coordinate>> {
    if steps == 0 {
        return Err(GridError::InvalidConfiguration(
            "edge interpolation needs at least one step".to_string(),
        ));
    }
    if steps > MAX_EDGE_STEPS {
        return Err(GridError::InvalidConfiguration(format!(
            "edge interpolation supports at most {} steps, got {}",
            MAX_EDGE_STEPS, steps
        )));
    }

    let step_length = distance(start, end) / steps as f64;
    let bearing = rhumb_bearing(start, end);

    let mut points = Vec::with_capacity(steps + 1);
    points.push(start);
    points.extend((1..=steps).map(|i| destination_point(start, step_length * i as f64, bearing)));
    Ok(points)
}

/// Axis-aligned extent of planar geometry, in the geometry's own units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bbox {
    /// Creates a new bounding box.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box holding every coordinate, or `None` for an empty input.
    pub fn from_coords(coords: impl IntoIterator<Item = Coord<f64>>) -> Option<Self> {
        coords.into_iter().fold(None, |bbox, c| {
            Some(match bbox {
                None => Bbox::new(c.x, c.y, c.x, c.y),
                Some(b) => Bbox::new(
                    b.min_x.min(c.x),
                    b.min_y.min(c.y),
                    b.max_x.max(c.x),
                    b.max_y.max(c.y),
                ),
            })
        })
    }

    /// Grows the box by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Image dimensions (width, height) covering `bbox` at `resolution` units per pixel.
pub fn calculate_dimensions(bbox: &Bbox, resolution: f64) -> (u32, u32) {
    let width = (bbox.width() / resolution).ceil().max(1.0) as u32;
    let height = (bbox.height() / resolution).ceil().max(1.0) as u32;
    (width, height)
}

/// Maps a geometry coordinate to pixel space.
/// Y is flipped so that (0,0) is the top-left pixel.
pub fn world_to_screen(x: f64, y: f64, bbox: &Bbox, resolution: f64, height: u32) -> (f64, f64) {
    let px = (x - bbox.min_x) / resolution;
    let py = height as f64 - ((y - bbox.min_y) / resolution);
    (px, py)
}
