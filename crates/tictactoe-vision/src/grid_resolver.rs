//! Lattice corners and cell rectangles from the clustered lines.

use nalgebra::Point2;
use tictactoe_core::{CellRect, Corner};

use crate::error::GeometryError;
use crate::line_clusterer::{LatticeLines, LINES_PER_AXIS};

/// Cell rectangles in camera order, `grid[row][col]`.
pub type CellGrid = [[CellRect; 3]; 3];

/// 4x4 intersections of the lattice lines; `corners[row][col]` lies on
/// horizontal line `row` and vertical line `col`.
pub fn lattice_corners(
    lines: &LatticeLines,
) -> Result<[[Corner; LINES_PER_AXIS]; LINES_PER_AXIS], GeometryError> {
    let mut corners = [[Corner {
        row: 0,
        col: 0,
        position: Point2::origin(),
    }; LINES_PER_AXIS]; LINES_PER_AXIS];
    for (row, h) in lines.horizontal.iter().enumerate() {
        for (col, v) in lines.vertical.iter().enumerate() {
            let position = h
                .intersect(v)
                .filter(|p| p.x.is_finite() && p.y.is_finite())
                .ok_or(GeometryError::ParallelLines { row, col })?;
            corners[row][col] = Corner { row, col, position };
        }
    }
    Ok(corners)
}

/// Cell rectangles from the lattice corners.
///
/// Cell `(r, c)` takes its left bound from corner `(r+1, c)`, its right
/// bound from `(r+1, c+1)`, its top from `(r, c+1)` and its bottom from
/// `(r+1, c+1)`. Inverted bounds are swapped.
pub fn compose_cells(
    corners: &[[Corner; LINES_PER_AXIS]; LINES_PER_AXIS],
) -> Result<CellGrid, GeometryError> {
    let px = |v: f32| v.round() as i32;
    let mut grid = [[CellRect::default(); 3]; 3];
    for (row, cells) in grid.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            let rect = CellRect::new(
                px(corners[row + 1][col].position.x),
                px(corners[row + 1][col + 1].position.x),
                px(corners[row][col + 1].position.y),
                px(corners[row + 1][col + 1].position.y),
            )
            .normalized();
            if rect.is_empty() {
                return Err(GeometryError::NonPhysicalCell { row, col, rect });
            }
            *cell = rect;
        }
    }
    Ok(grid)
}

/// Corners then cells, in region coordinates.
pub fn resolve_cells(lines: &LatticeLines) -> Result<CellGrid, GeometryError> {
    compose_cells(&lattice_corners(lines)?)
}

/// Shift every cell of `grid` by a region offset.
pub fn translate_grid(grid: &CellGrid, dx: i32, dy: i32) -> CellGrid {
    grid.map(|row| row.map(|cell| cell.translated(dx, dy)))
}
