//! Raster surface: draws the grid overlay into a PNG.
//!
//! Fill layers use an even-odd scanline fill, line layers a square-brush
//! Bresenham stroke. Pixel runs are computed for all polygons in parallel,
//! then alpha-blended into the image in order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use geo::{Coord, CoordsIter, MultiPolygon};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

pub mod edge;

use crate::coord::Coordinate;
use crate::error::{GridError, Result};
use crate::geojson::{polygons_from_collection, AxisOrder, GeoJsonSource};
use crate::logger;
use crate::math::{calculate_dimensions, world_to_screen, Bbox};
use crate::surface::{Layer, LayerKind, RenderSurface};
use edge::{EdgeTable, Span};

const MAX_DIMENSION: u32 = 20000;

/// Pixel raster laid over a geometry extent.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub bbox: Bbox,
    /// Geometry units per pixel.
    pub resolution: f64,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Fails with `ImageTooLarge` past `MAX_DIMENSION` pixels on either side.
    pub fn new(bbox: Bbox, resolution: f64) -> Result<Self> {
        if !(resolution > 0.0) {
            return Err(GridError::InvalidResolution(resolution));
        }

        let (width, height) = calculate_dimensions(&bbox, resolution);
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GridError::ImageTooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }

        Ok(Self {
            bbox,
            resolution,
            width,
            height,
        })
    }

    pub fn to_screen(&self, c: Coord<f64>) -> (f64, f64) {
        world_to_screen(c.x, c.y, &self.bbox, self.resolution, self.height)
    }
}

/// Porter-Duff "over" of `color` onto the pixel at (x, y).
fn blend_pixel(image: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    let dst = *image.get_pixel(x, y);
    let src_a = color.0[3] as f32 / 255.0;
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a == 0.0 {
        return;
    }

    let mut out = [0u8; 4];
    for channel in 0..3 {
        let src = color.0[channel] as f32;
        let back = dst.0[channel] as f32;
        out[channel] = ((src * src_a + back * dst_a * (1.0 - src_a)) / out_a).round() as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    image.put_pixel(x, y, Rgba(out));
}

/// Fills every multipolygon independently (even-odd within each one).
pub fn fill_polygons(image: &mut RgbaImage, viewport: &Viewport, polygons: &[MultiPolygon<f64>], color: [u8; 4]) {
    let spans: Vec<Span> = polygons
        .par_iter()
        .flat_map_iter(|mp| EdgeTable::from_multipolygon(mp, viewport).spans(viewport.width, viewport.height))
        .collect();

    let color = Rgba(color);
    for span in spans {
        for x in span.x_start..span.x_end {
            blend_pixel(image, x, span.y, color);
        }
    }
}

/// Strokes every ring of every polygon. A zero width draws nothing.
pub fn stroke_polygons(
    image: &mut RgbaImage,
    viewport: &Viewport,
    polygons: &[MultiPolygon<f64>],
    color: [u8; 3],
    width: u32,
) {
    if width == 0 {
        return;
    }

    let pixels: Vec<(u32, u32)> = polygons
        .par_iter()
        .flat_map_iter(|mp| {
            let mut pixels = Vec::new();
            for polygon in mp {
                for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                    let screen: Vec<(f64, f64)> = ring.coords().map(|c| viewport.to_screen(*c)).collect();
                    for segment in screen.windows(2) {
                        line_pixels(segment[0], segment[1], width, viewport, &mut pixels);
                    }
                }
            }
            pixels
        })
        .collect();

    let color = Rgba([color[0], color[1], color[2], 255]);
    for (x, y) in pixels {
        blend_pixel(image, x, y, color);
    }
}

/// Bresenham line from `from` to `to`, thickened with a square brush.
///
/// The brush is clipped to the viewport before it is walked.
fn line_pixels(from: (f64, f64), to: (f64, f64), width: u32, viewport: &Viewport, out: &mut Vec<(u32, u32)>) {
    let (mut x, mut y) = (from.0 as i32, from.1 as i32);
    let (x1, y1) = (to.0 as i32, to.1 as i32);

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let half = i64::from(width / 2);
    let (max_x, max_y) = (i64::from(viewport.width) - 1, i64::from(viewport.height) - 1);

    loop {
        let (cx, cy) = (i64::from(x), i64::from(y));
        for bx in (cx - half).max(0)..=(cx + half).min(max_x) {
            for by in (cy - half).max(0)..=(cy + half).min(max_y) {
                out.push((bx as u32, by as u32));
            }
        }

        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Renders registered sources and layers to `<name>.png` on present.
pub struct PngSurface {
    output_dir: PathBuf,
    name: String,
    resolution: f64,
    axis: AxisOrder,
    sources: HashMap<String, Vec<MultiPolygon<f64>>>,
    layers: Vec<Layer>,
    center: Option<Coordinate>,
}

impl PngSurface {
    pub fn new(output_dir: &Path, name: &str, resolution: f64, axis: AxisOrder) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            name: name.to_string(),
            resolution,
            axis,
            sources: HashMap::new(),
            layers: Vec::new(),
            center: None,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.png", self.name))
    }

    /// Rasterizes the current layers. The extent is the bounding box of all
    /// layer geometry, padded so outlines on the border stay visible.
    pub fn rasterize(&self) -> Result<RgbaImage> {
        if self.layers.is_empty() {
            return Err(GridError::SurfaceState("no layers to render".to_string()));
        }

        let bbox = Bbox::from_coords(
            self.layers
                .iter()
                .flat_map(|layer| &self.sources[&layer.source])
                .flat_map(|mp| mp.coords_iter()),
        )
        .ok_or_else(|| GridError::SurfaceState("layers have no geometry".to_string()))?;

        let max_stroke = self
            .layers
            .iter()
            .filter_map(|layer| match layer.kind {
                LayerKind::Line { width, .. } => Some(width),
                LayerKind::Fill { .. } => None,
            })
            .max()
            .unwrap_or(0);
        let padding = self.resolution * f64::from(max_stroke.saturating_add(2));
        let viewport = Viewport::new(bbox.expand(padding), self.resolution)?;
        logger::debug(&format!(
            "Rendering {}x{} pixels at {} units per pixel",
            viewport.width, viewport.height, viewport.resolution
        ));

        let mut image = RgbaImage::from_pixel(viewport.width, viewport.height, Rgba([0, 0, 0, 0]));
        for layer in &self.layers {
            let polygons = &self.sources[&layer.source];
            match layer.kind {
                LayerKind::Fill { color } => fill_polygons(&mut image, &viewport, polygons, color),
                LayerKind::Line { color, width } => {
                    stroke_polygons(&mut image, &viewport, polygons, color, width)
                }
            }
        }

        if let Some(center) = self.center {
            self.mark_center(&mut image, &viewport, center);
        }
        Ok(image)
    }

    /// Small cross at the camera center, in the color of the first visible outline.
    fn mark_center(&self, image: &mut RgbaImage, viewport: &Viewport, center: Coordinate) {
        let (color, width) = self
            .layers
            .iter()
            .find_map(|layer| match layer.kind {
                LayerKind::Line { color, width } if width > 0 => Some((color, width)),
                _ => None,
            })
            .unwrap_or(([0, 0, 0], 1));

        let position = self.axis.position(center);
        let (cx, cy) = viewport.to_screen(Coord {
            x: position[0],
            y: position[1],
        });
        let arm = 3.0 * f64::from(width) + 2.0;

        let mut pixels = Vec::new();
        line_pixels((cx - arm, cy), (cx + arm, cy), width, viewport, &mut pixels);
        line_pixels((cx, cy - arm), (cx, cy + arm), width, viewport, &mut pixels);
        let color = Rgba([color[0], color[1], color[2], 255]);
        for (x, y) in pixels {
            blend_pixel(image, x, y, color);
        }
    }
}

impl RenderSurface for PngSurface {
    fn set_geometry(&mut self, source_id: &str, source: &GeoJsonSource) -> Result<()> {
        if self.sources.contains_key(source_id) {
            return Err(GridError::SurfaceState(format!(
                "source '{}' already registered",
                source_id
            )));
        }
        let polygons = polygons_from_collection(&source.data);
        logger::debug(&format!("Source '{}': {} polygons", source_id, polygons.len()));
        self.sources.insert(source_id.to_string(), polygons);
        Ok(())
    }

    fn add_layer(&mut self, layer: &Layer) -> Result<()> {
        if !self.sources.contains_key(&layer.source) {
            return Err(GridError::SurfaceState(format!(
                "layer '{}' references unknown source '{}'",
                layer.id, layer.source
            )));
        }
        self.layers.push(layer.clone());
        Ok(())
    }

    fn set_center(&mut self, center: Coordinate, _zoom: f64) -> Result<()> {
        self.center = Some(center);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let image = self.rasterize()?;
        let path = self.output_path();
        image.save(&path)?;
        logger::output(&path.display().to_string());
        Ok(())
    }

    fn detach(&mut self) {
        self.sources.clear();
        self.layers.clear();
        self.center = None;
    }
}
