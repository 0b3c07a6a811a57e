// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! The displayed wafer scene: both defect lists, the active one's grid
//! overlay and the camera looking at it.

use std::time::Instant;

use crate::config::ViewerConfig;
use crate::defect::{DatasetKind, DefectSet};
use crate::grid::{CellLabels, GridOverlay};
use crate::view::ViewController;

#[derive(Debug, Clone)]
pub struct WaferScene {
    config: ViewerConfig,
    surface: DefectSet,
    pl: DefectSet,
    active: DatasetKind,
    grid: GridOverlay,
    view: ViewController,
}

impl WaferScene {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            view: ViewController::new(&config),
            grid: GridOverlay::empty(config.cell_size),
            surface: DefectSet::empty(DatasetKind::Surface),
            pl: DefectSet::empty(DatasetKind::Pl),
            active: DatasetKind::Surface,
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn active(&self) -> DatasetKind {
        self.active
    }

    pub fn dataset(&self, kind: DatasetKind) -> &DefectSet {
        match kind {
            DatasetKind::Surface => &self.surface,
            DatasetKind::Pl => &self.pl,
        }
    }

    pub fn active_dataset(&self) -> &DefectSet {
        self.dataset(self.active)
    }

    pub fn grid(&self) -> &GridOverlay {
        &self.grid
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewController {
        &mut self.view
    }

    /// Replace the stored list of `set.kind`. Returns whether it is the
    /// displayed one, in which case the caller should show it again.
    pub fn store(&mut self, set: DefectSet) -> bool {
        let kind = set.kind;
        match kind {
            DatasetKind::Surface => self.surface = set,
            DatasetKind::Pl => self.pl = set,
        }
        kind == self.active
    }

    pub fn clear(&mut self, kind: DatasetKind) -> bool {
        self.store(DefectSet::empty(kind))
    }

    pub fn cell_labels(&self) -> CellLabels {
        CellLabels {
            enabled: self.config.show_cell_labels,
            stride: self.config.label_stride,
        }
    }

    pub fn set_cell_labels(&mut self, enabled: bool) {
        if self.config.show_cell_labels != enabled {
            self.config.show_cell_labels = enabled;
            self.rebuild_grid();
        }
    }

    /// Replace the grid overlay with one built for the active dataset
    pub fn rebuild_grid(&mut self) {
        let set = self.active_dataset();
        let grid = GridOverlay::build(
            set.bounds.as_ref(),
            &set.records,
            self.config.cell_size,
            self.cell_labels(),
        );
        self.grid = grid;
    }

    /// Make `kind` the displayed dataset: rebuild the grid, recompute zoom
    /// bounds and snap the camera to its centroid.
    pub fn show_dataset(&mut self, kind: DatasetKind, viewport_width: Option<f32>) {
        self.active = kind;
        self.rebuild_grid();
        let bounds = self.active_dataset().bounds;
        self.view.show_dataset(bounds.as_ref(), viewport_width);
    }

    pub fn reset_view(&mut self, now: Instant) -> bool {
        let bounds = self.active_dataset().bounds;
        self.view.reset_view(bounds.as_ref(), now)
    }

    /// Swap in new display constants. The camera starts over; the grid is
    /// rebuilt on the next `show_dataset`.
    pub fn apply_config(&mut self, config: ViewerConfig) -> bool {
        if config == self.config {
            return false;
        }
        log::info!("Applying viewer config overrides");
        self.view = ViewController::new(&config);
        self.config = config;
        true
    }
}
