// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Wafer grid overlay
//!
//! The grid is centered on the wafer origin and sized to reach the defect
//! furthest from it on each axis. Only cells inside the normalized radius are
//! created, which gives the overlay its round wafer footprint. Every rebuild
//! returns a fresh `GridOverlay`; callers replace the old one wholesale.

use std::collections::HashSet;

use crate::defect::{BoundingBox, DefectRecord};

/// Upper bound on cells per half-axis; coordinates beyond this are bad data
pub const MAX_GRID_EXTENT: i32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLabels {
    pub enabled: bool,
    /// Label every `stride`-th cell on both axes
    pub stride: i32,
}

impl Default for CellLabels {
    fn default() -> Self {
        Self {
            enabled: false,
            stride: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub i: i32,
    pub j: i32,
    pub center_x: f64,
    pub center_y: f64,
    pub overlaps: bool,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOverlay {
    pub cell_size: f64,
    pub max_i: i32,
    pub max_j: i32,
    pub cells: Vec<GridCell>,
}

/// Number of cells needed on one axis to reach the furthest coordinate
pub fn grid_extent(min: f64, max: f64, cell_size: f64) -> i32 {
    (min.abs().max(max.abs()) / cell_size).ceil() as i32
}

/// Normalized radial inclusion test. A zero-extent axis contributes nothing.
pub fn within_radius(i: i32, j: i32, max_i: i32, max_j: i32) -> bool {
    let ratio = |k: i32, max: i32| {
        if max == 0 {
            0.0
        } else {
            k as f64 / max as f64
        }
    };
    (ratio(i, max_i).powi(2) + ratio(j, max_j).powi(2)).sqrt() <= 1.0
}

/// Center of cell `k` along one axis
pub fn cell_center(k: i32, cell_size: f64) -> f64 {
    k as f64 * cell_size + cell_size / 2.0
}

/// Closed span `[lo, hi]` of cell `k` along one axis
pub fn cell_span(k: i32, cell_size: f64) -> (f64, f64) {
    let center = cell_center(k, cell_size);
    (center - cell_size / 2.0, center + cell_size / 2.0)
}

pub fn format_coordinate_label(x: f64, y: f64) -> String {
    format!("({x:.1}, {y:.1})")
}

/// Cell indices along one axis whose closed span contains `v`; a value on a
/// shared edge yields both neighbours.
fn axis_cells(v: f64, cell_size: f64) -> impl Iterator<Item = i32> {
    let base = (v / cell_size).floor() as i32;
    (base - 1..=base + 1).filter(move |&k| {
        let (lo, hi) = cell_span(k, cell_size);
        v >= lo && v <= hi
    })
}

impl GridOverlay {
    pub fn empty(cell_size: f64) -> Self {
        Self {
            cell_size,
            max_i: 0,
            max_j: 0,
            cells: Vec::new(),
        }
    }

    pub fn build(
        bounds: Option<&BoundingBox>,
        records: &[DefectRecord],
        cell_size: f64,
        labels: CellLabels,
    ) -> Self {
        let Some(bounds) = bounds else {
            return Self::empty(cell_size);
        };

        let max_i = grid_extent(bounds.min_x, bounds.max_x, cell_size);
        let max_j = grid_extent(bounds.min_y, bounds.max_y, cell_size);
        if max_i > MAX_GRID_EXTENT || max_j > MAX_GRID_EXTENT {
            log::warn!(
                "Grid extent {max_i}x{max_j} exceeds {MAX_GRID_EXTENT} cells, skipping overlay"
            );
            return Self::empty(cell_size);
        }

        let occupied: HashSet<(i32, i32)> = records
            .iter()
            .flat_map(|record| {
                axis_cells(record.x_mm, cell_size).flat_map(move |i| {
                    axis_cells(record.y_mm, cell_size).map(move |j| (i, j))
                })
            })
            .collect();

        let stride = labels.stride.max(1);
        let mut cells = Vec::new();
        for i in -max_i..=max_i {
            for j in -max_j..=max_j {
                if !within_radius(i, j, max_i, max_j) {
                    continue;
                }

                let center_x = cell_center(i, cell_size);
                let center_y = cell_center(j, cell_size);
                let label = (labels.enabled && i % stride == 0 && j % stride == 0)
                    .then(|| format_coordinate_label(center_x, center_y));

                cells.push(GridCell {
                    i,
                    j,
                    center_x,
                    center_y,
                    overlaps: occupied.contains(&(i, j)),
                    label,
                });
            }
        }

        log::debug!(
            "Rebuilt grid overlay: {} cells ({}x{} extent), {} with defects",
            cells.len(),
            max_i,
            max_j,
            cells.iter().filter(|cell| cell.overlaps).count()
        );

        Self {
            cell_size,
            max_i,
            max_j,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, i: i32, j: i32) -> Option<&GridCell> {
        self.cells.iter().find(|cell| cell.i == i && cell.j == j)
    }

    pub fn overlap_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.overlaps).count()
    }

    /// `(min_x, max_x, min_y, max_y)` of a cell
    pub fn cell_bounds(&self, cell: &GridCell) -> (f64, f64, f64, f64) {
        let (min_x, max_x) = cell_span(cell.i, self.cell_size);
        let (min_y, max_y) = cell_span(cell.j, self.cell_size);
        (min_x, max_x, min_y, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_extent() {
        assert_eq!(grid_extent(-12.0, 7.0, 5.0), 3);
        assert_eq!(grid_extent(0.0, 10.0, 5.0), 2);
        assert_eq!(grid_extent(0.0, 0.0, 5.0), 0);
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(0, 0, 3, 3));
        assert!(within_radius(3, 0, 3, 3));
        assert!(!within_radius(3, 3, 3, 3));
        assert!(within_radius(0, 2, 0, 2));
        assert!(!within_radius(0, 3, 0, 2));
    }

    #[test]
    fn test_axis_cells_on_edge() {
        let cells: Vec<i32> = axis_cells(5.0, 5.0).collect();
        assert_eq!(cells, vec![0, 1]);
        let cells: Vec<i32> = axis_cells(2.5, 5.0).collect();
        assert_eq!(cells, vec![0]);
        let cells: Vec<i32> = axis_cells(-0.1, 5.0).collect();
        assert_eq!(cells, vec![-1]);
    }

    #[test]
    fn test_format_coordinate_label() {
        assert_eq!(format_coordinate_label(2.5, -7.26), "(2.5, -7.3)");
    }
}
