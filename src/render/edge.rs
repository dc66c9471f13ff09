//! Polygon edges in pixel space and the per-row edge table used for scanline fill.
//!
//! Rows are sampled at their centers (`y + 0.5`). An edge covers the rows whose
//! center lies in `[y_top, y_bottom)`, so a vertex shared by two edges is
//! crossed exactly once.

use geo::{LineString, MultiPolygon};

use super::Viewport;

/// A non-horizontal polygon edge, oriented top to bottom in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub y_top: f64,
    pub y_bottom: f64,
    pub x_top: f64,
    /// dx/dy
    pub inv_slope: f64,
}

impl Edge {
    /// `None` for horizontal segments; the scanline crossings handle them implicitly.
    pub fn new(p1: (f64, f64), p2: (f64, f64)) -> Option<Self> {
        if (p1.1 - p2.1).abs() < 1e-9 {
            return None;
        }

        let (top, bottom) = if p1.1 < p2.1 { (p1, p2) } else { (p2, p1) };
        Some(Edge {
            y_top: top.1,
            y_bottom: bottom.1,
            x_top: top.0,
            inv_slope: (bottom.0 - top.0) / (bottom.1 - top.1),
        })
    }

    /// First row whose center the edge reaches.
    pub fn first_row(&self) -> i32 {
        (self.y_top - 0.5).ceil() as i32
    }

    /// Last row whose center lies strictly above the bottom end.
    pub fn last_row(&self) -> i32 {
        (self.y_bottom - 0.5).ceil() as i32 - 1
    }

    pub fn x_at(&self, y: f64) -> f64 {
        self.x_top + (y - self.y_top) * self.inv_slope
    }
}

/// Run of filled pixels on row `y`, `x_end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: u32,
    pub x_start: u32,
    pub x_end: u32,
}

/// Edges bucketed by the first row they cover.
pub struct EdgeTable {
    y_min: i32,
    entries: Vec<Vec<Edge>>,
}

impl EdgeTable {
    /// Collects the edges of every ring (holes included) of `polygons`.
    pub fn from_multipolygon(polygons: &MultiPolygon<f64>, viewport: &Viewport) -> Self {
        let edges: Vec<Edge> = polygons
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .flat_map(|ring| ring_edges(ring, viewport))
            .collect();

        let y_min = edges.iter().map(Edge::first_row).min().unwrap_or(0);
        let y_max = edges.iter().map(Edge::first_row).max().unwrap_or(y_min - 1);

        let mut entries: Vec<Vec<Edge>> = (y_min..=y_max).map(|_| Vec::new()).collect();
        for edge in edges {
            entries[(edge.first_row() - y_min) as usize].push(edge);
        }

        EdgeTable { y_min, entries }
    }

    /// Even-odd fill spans clipped to a `width` x `height` image.
    pub fn spans(&self, width: u32, height: u32) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut active: Vec<&Edge> = Vec::new();
        let mut crossings: Vec<f64> = Vec::new();

        let mut y = self.y_min;
        while y < height as i32 {
            let offset = (y - self.y_min) as usize;
            if let Some(starting) = self.entries.get(offset) {
                active.extend(starting.iter());
            }
            active.retain(|edge| edge.last_row() >= y);

            if active.is_empty() && offset >= self.entries.len() {
                break;
            }

            if y >= 0 {
                let center = y as f64 + 0.5;
                crossings.clear();
                crossings.extend(active.iter().map(|edge| edge.x_at(center)));
                crossings.sort_by(|a, b| a.total_cmp(b));

                for pair in crossings.chunks_exact(2) {
                    let x_start = pixel_boundary(pair[0], width);
                    let x_end = pixel_boundary(pair[1], width);
                    if x_start < x_end {
                        spans.push(Span {
                            y: y as u32,
                            x_start,
                            x_end,
                        });
                    }
                }
            }
            y += 1;
        }

        spans
    }
}

/// Index of the first pixel whose center is at or right of `x`, clamped to the image.
fn pixel_boundary(x: f64, width: u32) -> u32 {
    (x - 0.5).ceil().clamp(0.0, width as f64) as u32
}

fn ring_edges(ring: &LineString<f64>, viewport: &Viewport) -> Vec<Edge> {
    let points: Vec<(f64, f64)> = ring.coords().map(|c| viewport.to_screen(*c)).collect();
    if points.len() < 3 {
        return Vec::new();
    }

    // Rings are normally closed already; wrap around in case one is not.
    (0..points.len())
        .filter_map(|i| Edge::new(points[i], points[(i + 1) % points.len()]))
        .collect()
}
