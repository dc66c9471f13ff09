//! GeoJSON output for grid cells, and reading it back as `geo` polygons.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::coord::Coordinate;
use crate::error::Result;
use crate::grid::Cell;

/// Order of the two values in every emitted position.
///
/// `LatLon` is what the map front end of this project is configured for and
/// is the default. `LonLat` is the order RFC 7946 prescribes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AxisOrder {
    #[default]
    LatLon,
    LonLat,
}

impl AxisOrder {
    /// Position array for a coordinate.
    pub fn position(self, coord: Coordinate) -> Vec<f64> {
        match self {
            AxisOrder::LatLon => vec![coord.latitude, coord.longitude],
            AxisOrder::LonLat => vec![coord.longitude, coord.latitude],
        }
    }
}

/// A feature collection tagged as a `geojson` map source.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonSource {
    pub data: FeatureCollection,
}

impl GeoJsonSource {
    pub fn new(data: FeatureCollection) -> Self {
        Self { data }
    }

    /// `{ "type": "geojson", "data": { "type": "FeatureCollection", ... } }`
    pub fn to_json(&self) -> Result<JsonValue> {
        let mut source = JsonObject::new();
        source.insert("type".to_string(), JsonValue::from("geojson"));
        source.insert("data".to_string(), serde_json::to_value(&self.data)?);
        Ok(JsonValue::Object(source))
    }
}

/// Closed ring of a cell: top-left, top-right, bottom-right, bottom-left, top-left.
fn cell_ring(cell: &Cell, axis: AxisOrder) -> Vec<Vec<f64>> {
    [
        cell.top_left,
        cell.top_right,
        cell.bottom_right,
        cell.bottom_left,
        cell.top_left,
    ]
    .into_iter()
    .map(|c| axis.position(c))
    .collect()
}

/// One polygon feature per cell, in the order the cells are given.
pub fn to_feature_collection(cells: &[Cell], axis: AxisOrder) -> FeatureCollection {
    let features = cells
        .iter()
        .map(|cell| {
            let mut properties = JsonObject::new();
            properties.insert("row".to_string(), JsonValue::from(cell.row));
            properties.insert("column".to_string(), JsonValue::from(cell.column));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Polygon(vec![cell_ring(cell, axis)]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Converts every polygonal feature to a `geo` multipolygon.
///
/// The first value of each position becomes `x`. Features without polygon
/// geometry are skipped.
pub fn polygons_from_collection(collection: &FeatureCollection) -> Vec<MultiPolygon<f64>> {
    collection
        .features
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
        .filter_map(geometry_to_multipolygon)
        .collect()
}

fn geometry_to_multipolygon(geom: &Geometry) -> Option<MultiPolygon<f64>> {
    match &geom.value {
        Value::Polygon(rings) => Some(MultiPolygon::new(vec![polygon_from_rings(rings)?])),
        Value::MultiPolygon(polygons) => {
            let polygons: Vec<Polygon<f64>> = polygons
                .iter()
                .filter_map(|rings| polygon_from_rings(rings))
                .collect();
            (!polygons.is_empty()).then(|| MultiPolygon::new(polygons))
        }
        _ => None,
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    let exterior = ring_to_linestring(exterior)?;
    let interiors = interiors.iter().filter_map(|r| ring_to_linestring(r)).collect();
    Some(Polygon::new(exterior, interiors))
}

fn ring_to_linestring(ring: &[Vec<f64>]) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = ring
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| Coord {
            x: position[0],
            y: position[1],
        })
        .collect();
    (!coords.is_empty()).then(|| LineString::from(coords))
}
