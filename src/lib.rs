//! Rhumb-line grid overlay for four-corner regions.
//!
//! `GridOverlay::compute` turns four corners and a row/column count into a
//! mesh, its cells, a GeoJSON source and a center point. Surfaces in
//! [`surface`] and [`render`] consume that overlay.

pub mod cli;
pub mod coord;
pub mod error;
pub mod geojson;
pub mod grid;
pub mod logger;
pub mod math;
pub mod overlay;
pub mod render;
pub mod surface;

pub use coord::{Coordinate, CornerSet};
pub use error::{GridError, Result};
pub use geojson::{AxisOrder, GeoJsonSource};
pub use grid::{assemble_cells, build_mesh, center_of, Cell, GridConfig, Mesh};
pub use overlay::GridOverlay;
