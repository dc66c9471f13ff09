//! Mesh construction over a four-corner region and cell assembly.
//!
//! The left and right rails are interpolated independently, then every pair
//! of rail points is joined by a horizontal rhumb line. Rows are therefore
//! not parallels of latitude when the region is skewed.

use std::ops::Index;

use crate::coord::{Coordinate, CornerSet};
use crate::error::{GridError, Result};
use crate::logger;
use crate::math::interpolate_edge;

/// Number of cell rows and columns to cut the region into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    rows: usize,
    columns: usize,
}

impl GridConfig {
    pub const DEFAULT_ROWS: i64 = 14;
    pub const DEFAULT_COLUMNS: i64 = 40;

    /// Upper bound on `(rows + 1) * (columns + 1)` mesh points.
    pub const MAX_MESH_POINTS: u64 = 1_000_000;

    /// Validates that both counts are strictly positive and that the mesh
    /// stays within [`Self::MAX_MESH_POINTS`].
    pub fn new(rows: i64, columns: i64) -> Result<Self> {
        if rows <= 0 {
            return Err(GridError::InvalidConfiguration(format!(
                "rows must be positive, got {}",
                rows
            )));
        }
        if columns <= 0 {
            return Err(GridError::InvalidConfiguration(format!(
                "columns must be positive, got {}",
                columns
            )));
        }
        let points = (rows as u64 + 1)
            .checked_mul(columns as u64 + 1)
            .filter(|&n| n <= Self::MAX_MESH_POINTS);
        if points.is_none() {
            return Err(GridError::InvalidConfiguration(format!(
                "{} x {} cells exceeds the limit of {} mesh points",
                rows,
                columns,
                Self::MAX_MESH_POINTS
            )));
        }
        Ok(Self {
            rows: rows as usize,
            columns: columns as usize,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: Self::DEFAULT_ROWS as usize,
            columns: Self::DEFAULT_COLUMNS as usize,
        }
    }
}

/// Lattice of `(rows + 1) x (columns + 1)` points.
///
/// Row 0 is the top edge, column 0 the left edge. `mesh[i][j]` indexes a
/// point directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    points: Vec<Vec<Coordinate>>,
}

impl Mesh {
    /// Wraps explicit point rows. Every row must have the same length and
    /// there must be at least two rows of at least two points.
    pub fn from_rows(points: Vec<Vec<Coordinate>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(GridError::InvalidConfiguration(format!(
                "a mesh needs at least 2 point rows, got {}",
                points.len()
            )));
        }
        let width = points[0].len();
        if width < 2 {
            return Err(GridError::InvalidConfiguration(format!(
                "a mesh needs at least 2 points per row, got {}",
                width
            )));
        }
        if let Some((i, row)) = points.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::InvalidConfiguration(format!(
                "mesh row {} has {} points, expected {}",
                i,
                row.len(),
                width
            )));
        }
        Ok(Self { points })
    }

    /// Number of cell rows (one less than point rows).
    pub fn rows(&self) -> usize {
        self.points.len() - 1
    }

    /// Number of cell columns (one less than points per row).
    pub fn columns(&self) -> usize {
        self.points[0].len() - 1
    }

    pub fn point_rows(&self) -> &[Vec<Coordinate>] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len() * self.points[0].len()
    }
}

impl Index<usize> for Mesh {
    type Output = [Coordinate];

    fn index(&self, row: usize) -> &[Coordinate] {
        &self.points[row]
    }
}

/// Interpolates the full mesh spanning `corners`.
pub fn build_mesh(corners: &CornerSet, config: GridConfig) -> Result<Mesh> {
    let left_rail = interpolate_edge(corners.top_left, corners.bottom_left, config.rows())?;
    let right_rail = interpolate_edge(corners.top_right, corners.bottom_right, config.rows())?;

    let points = left_rail
        .into_iter()
        .zip(right_rail)
        .map(|(left, right)| interpolate_edge(left, right, config.columns()))
        .collect::<Result<Vec<_>>>()?;

    let mesh = Mesh::from_rows(points)?;
    logger::debug(&format!(
        "Built mesh: {} x {} ({} points)",
        mesh.rows() + 1,
        mesh.columns() + 1,
        mesh.point_count()
    ));
    Ok(mesh)
}

/// One grid square, anchored at mesh point `(row, column)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub top_left: Coordinate,
    pub top_right: Coordinate,
    pub bottom_left: Coordinate,
    pub bottom_right: Coordinate,
}

/// Emits every cell of the mesh in row-major order, top to bottom, left to right.
///
/// Neighbouring cells share their mesh points, so edges line up exactly.
pub fn assemble_cells(mesh: &Mesh) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(mesh.rows() * mesh.columns());
    for (i, pair) in mesh.points.windows(2).enumerate() {
        let (upper, lower) = (&pair[0], &pair[1]);
        for j in 0..mesh.columns() {
            cells.push(Cell {
                row: i,
                column: j,
                top_left: upper[j],
                top_right: upper[j + 1],
                bottom_left: lower[j],
                bottom_right: lower[j + 1],
            });
        }
    }
    cells
}

/// Mesh point nearest the middle indices, used to place the initial view.
///
/// Half indices round away from zero, so a 3-row mesh picks point row 2.
pub fn center_of(mesh: &Mesh) -> Coordinate {
    let row = (mesh.rows() as f64 / 2.0).round() as usize;
    let column = (mesh.columns() as f64 / 2.0).round() as usize;
    mesh[row][column]
}
