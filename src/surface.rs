//! Hand-off of a computed grid to a map rendering surface.
//!
//! A surface only needs to accept geometry sources, layers drawn from them,
//! and an initial camera center. [`OverlaySession`] drives one surface
//! through a single attach: one source, a fill layer and an outline layer
//! depending on it, then the center. Nothing is presented unless the
//! session is finished; dropping it early just detaches.

use std::fs;
use std::path::{Path, PathBuf};

use geojson::{JsonObject, JsonValue};
use serde_json::json;

use crate::coord::Coordinate;
use crate::error::{GridError, Result};
use crate::geojson::{AxisOrder, GeoJsonSource};
use crate::logger;
use crate::overlay::GridOverlay;

pub const SOURCE_ID: &str = "grid";
pub const FILL_LAYER_ID: &str = "grid-fill";
pub const OUTLINE_LAYER_ID: &str = "grid-outline";

/// Widest outline, in pixels, the CLI accepts.
pub const MAX_STROKE_WIDTH: u32 = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Polygon interiors, RGBA.
    Fill { color: [u8; 4] },
    /// Polygon outlines, RGB and width in pixels.
    Line { color: [u8; 3], width: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    pub source: String,
    pub kind: LayerKind,
}

/// Paint settings and initial zoom used when attaching a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub fill: [u8; 4],
    pub stroke: [u8; 3],
    pub stroke_width: u32,
    pub zoom: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill: [0x00, 0x80, 0xff, 0x80],
            stroke: [0x00, 0x00, 0x00],
            stroke_width: 2,
            zoom: 16.0,
        }
    }
}

impl OverlayStyle {
    /// Fill layer then outline layer, both reading `source`.
    pub fn layers(&self, source: &str) -> [Layer; 2] {
        [
            Layer {
                id: FILL_LAYER_ID.to_string(),
                source: source.to_string(),
                kind: LayerKind::Fill { color: self.fill },
            },
            Layer {
                id: OUTLINE_LAYER_ID.to_string(),
                source: source.to_string(),
                kind: LayerKind::Line {
                    color: self.stroke,
                    width: self.stroke_width,
                },
            },
        ]
    }
}

/// Consumer side of the grid: anything able to display sources and layers.
pub trait RenderSurface {
    fn set_geometry(&mut self, source_id: &str, source: &GeoJsonSource) -> Result<()>;

    fn add_layer(&mut self, layer: &Layer) -> Result<()>;

    fn set_center(&mut self, center: Coordinate, zoom: f64) -> Result<()>;

    /// Makes the registered content visible (for file surfaces: writes it).
    fn present(&mut self) -> Result<()>;

    /// Drops everything registered on the surface.
    fn detach(&mut self);
}

/// One scoped attachment of a grid overlay to a surface.
pub struct OverlaySession<'a, S: RenderSurface> {
    surface: &'a mut S,
    attached: bool,
}

impl<'a, S: RenderSurface> OverlaySession<'a, S> {
    pub fn attach(surface: &'a mut S, overlay: &GridOverlay, style: &OverlayStyle) -> Result<Self> {
        let session = Self {
            surface,
            attached: true,
        };

        session.surface.set_geometry(SOURCE_ID, &overlay.source)?;
        for layer in style.layers(SOURCE_ID) {
            session.surface.add_layer(&layer)?;
        }
        session.surface.set_center(overlay.center, style.zoom)?;

        logger::debug(&format!(
            "Attached source '{}' with layers '{}' and '{}'",
            SOURCE_ID, FILL_LAYER_ID, OUTLINE_LAYER_ID
        ));
        Ok(session)
    }

    /// Presents the overlay, then detaches from the surface.
    pub fn finish(mut self) -> Result<()> {
        let presented = self.surface.present();
        self.surface.detach();
        self.attached = false;
        presented
    }
}

impl<S: RenderSurface> Drop for OverlaySession<'_, S> {
    fn drop(&mut self) {
        if self.attached {
            logger::warn("Overlay session ended without presenting; nothing was written");
            self.surface.detach();
        }
    }
}

fn css_color(rgb: &[u8]) -> String {
    format!("#{}", hex::encode(rgb))
}

/// Writes a map style document (`<name>.json`) describing the overlay.
pub struct StyleSurface {
    output_dir: PathBuf,
    name: String,
    axis: AxisOrder,
    sources: JsonObject,
    layers: Vec<JsonValue>,
    center: Option<(Coordinate, f64)>,
}

impl StyleSurface {
    pub fn new(output_dir: &Path, name: &str, axis: AxisOrder) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            name: name.to_string(),
            axis,
            sources: JsonObject::new(),
            layers: Vec::new(),
            center: None,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.name))
    }

    /// The style document for what is currently registered.
    pub fn document(&self) -> Result<JsonValue> {
        let (center, zoom) = self.center.ok_or_else(|| {
            GridError::SurfaceState("no center set on style surface".to_string())
        })?;

        Ok(json!({
            "version": 8,
            "name": self.name,
            "center": self.axis.position(center),
            "zoom": zoom,
            "sources": self.sources,
            "layers": self.layers,
        }))
    }
}

impl RenderSurface for StyleSurface {
    fn set_geometry(&mut self, source_id: &str, source: &GeoJsonSource) -> Result<()> {
        if self.sources.contains_key(source_id) {
            return Err(GridError::SurfaceState(format!(
                "source '{}' already registered",
                source_id
            )));
        }
        self.sources.insert(source_id.to_string(), source.to_json()?);
        Ok(())
    }

    fn add_layer(&mut self, layer: &Layer) -> Result<()> {
        if !self.sources.contains_key(&layer.source) {
            return Err(GridError::SurfaceState(format!(
                "layer '{}' references unknown source '{}'",
                layer.id, layer.source
            )));
        }
        if self.layers.iter().any(|l| l["id"] == layer.id.as_str()) {
            return Err(GridError::SurfaceState(format!(
                "layer '{}' already registered",
                layer.id
            )));
        }

        let (kind, paint) = match &layer.kind {
            LayerKind::Fill { color } => (
                "fill",
                json!({
                    "fill-color": css_color(&color[..3]),
                    "fill-opacity": (color[3] as f64 / 255.0 * 100.0).round() / 100.0,
                }),
            ),
            LayerKind::Line { color, width } => (
                "line",
                json!({
                    "line-color": css_color(color),
                    "line-width": width,
                }),
            ),
        };

        self.layers.push(json!({
            "id": layer.id,
            "type": kind,
            "source": layer.source,
            "layout": {},
            "paint": paint,
        }));
        Ok(())
    }

    fn set_center(&mut self, center: Coordinate, zoom: f64) -> Result<()> {
        self.center = Some((center, zoom));
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let document = self.document()?;
        let path = self.output_path();
        fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        logger::output(&path.display().to_string());
        Ok(())
    }

    fn detach(&mut self) {
        self.sources.clear();
        self.layers.clear();
        self.center = None;
    }
}

/// Writes the bare source document (`<name>.geojson`), ignoring layers.
pub struct GeoJsonFileSurface {
    output_dir: PathBuf,
    name: String,
    source: Option<GeoJsonSource>,
}

impl GeoJsonFileSurface {
    pub fn new(output_dir: &Path, name: &str) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            name: name.to_string(),
            source: None,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.geojson", self.name))
    }
}

impl RenderSurface for GeoJsonFileSurface {
    fn set_geometry(&mut self, _source_id: &str, source: &GeoJsonSource) -> Result<()> {
        if self.source.is_some() {
            return Err(GridError::SurfaceState(
                "geojson file surface holds a single source".to_string(),
            ));
        }
        self.source = Some(source.clone());
        Ok(())
    }

    fn add_layer(&mut self, layer: &Layer) -> Result<()> {
        logger::debug(&format!("Ignoring layer '{}' for geojson output", layer.id));
        Ok(())
    }

    fn set_center(&mut self, _center: Coordinate, _zoom: f64) -> Result<()> {
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let source = self.source.as_ref().ok_or_else(|| {
            GridError::SurfaceState("no geometry set on geojson file surface".to_string())
        })?;
        let path = self.output_path();
        fs::write(&path, serde_json::to_string_pretty(&source.to_json()?)?)?;
        logger::output(&path.display().to_string());
        Ok(())
    }

    fn detach(&mut self) {
        self.source = None;
    }
}
