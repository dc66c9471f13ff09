//! The full grid pipeline: corners in, renderable geometry and center out.

use crate::coord::{Coordinate, CornerSet};
use crate::error::Result;
use crate::geojson::{to_feature_collection, AxisOrder, GeoJsonSource};
use crate::grid::{assemble_cells, build_mesh, center_of, Cell, GridConfig, Mesh};
use crate::logger;

/// Everything derived from one corner set and grid configuration.
///
/// Recomputed in full on every call; nothing is cached between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOverlay {
    pub mesh: Mesh,
    pub cells: Vec<Cell>,
    pub source: GeoJsonSource,
    pub center: Coordinate,
    pub axis: AxisOrder,
}

impl GridOverlay {
    pub fn compute(corners: &CornerSet, config: GridConfig, axis: AxisOrder) -> Result<Self> {
        let mesh = build_mesh(corners, config)?;
        let cells = assemble_cells(&mesh);
        let source = GeoJsonSource::new(to_feature_collection(&cells, axis));
        let center = center_of(&mesh);

        logger::debug(&format!(
            "Assembled {} cells ({} rows x {} columns), center at {}, {}",
            cells.len(),
            mesh.rows(),
            mesh.columns(),
            center.latitude,
            center.longitude
        ));

        Ok(Self {
            mesh,
            cells,
            source,
            center,
            axis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_default_site() {
        let overlay =
            GridOverlay::compute(&CornerSet::default(), GridConfig::default(), AxisOrder::LatLon)
                .unwrap();
        assert_eq!(overlay.cells.len(), 14 * 40);
        assert_eq!(overlay.source.data.features.len(), overlay.cells.len());
        assert_eq!(overlay.center, overlay.mesh[7][20]);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let corners = CornerSet::default();
        let config = GridConfig::new(3, 4).unwrap();
        let first = GridOverlay::compute(&corners, config, AxisOrder::LonLat).unwrap();
        let second = GridOverlay::compute(&corners, config, AxisOrder::LonLat).unwrap();
        assert_eq!(first, second);
    }
}
