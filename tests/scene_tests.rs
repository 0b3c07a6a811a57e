// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use egui::pos2;
use serde_json::json;
use std::time::{Duration, Instant};

use wafer_defect_viewer::defect::builder::DefectSetBuilder;
use wafer_defect_viewer::{
    CellLabels, ClassPalette, DatasetKind, DefectSet, GridOverlay, PanDirection, ViewerConfig,
    WaferScene,
};

const VIEWPORT_WIDTH: f32 = 1000.0;

fn create_set(kind: DatasetKind, data: serde_json::Value) -> DefectSet {
    DefectSetBuilder::new(ClassPalette::builtin().unwrap(), &ViewerConfig::default())
        .build(kind, &data)
        .unwrap()
}

fn surface_set() -> DefectSet {
    create_set(
        DatasetKind::Surface,
        json!([
            { "X(mm)": -40.0, "Y(mm)": -30.0, "Class": "Pit" },
            { "X(mm)": 60.0, "Y(mm)": 10.0, "Class": "Particle" }
        ]),
    )
}

fn pl_set() -> DefectSet {
    create_set(
        DatasetKind::Pl,
        json!([
            { "X(mm)": 2.0, "Y(mm)": 4.0, "Class": "PL_BPD" },
            { "X(mm)": 8.0, "Y(mm)": 12.0, "Class": "PL_BPD" }
        ]),
    )
}

fn expected_grid(set: &DefectSet) -> GridOverlay {
    GridOverlay::build(
        set.bounds.as_ref(),
        &set.records,
        ViewerConfig::default().cell_size,
        CellLabels::default(),
    )
}

fn create_scene() -> WaferScene {
    let mut scene = WaferScene::new(ViewerConfig::default());
    assert!(scene.store(surface_set()));
    assert!(!scene.store(pl_set()));
    scene.show_dataset(DatasetKind::Surface, Some(VIEWPORT_WIDTH));
    scene
}

#[test]
fn test_show_dataset_builds_grid_and_snaps_camera() {
    let scene = create_scene();

    assert_eq!(scene.active(), DatasetKind::Surface);
    assert_eq!(scene.grid(), &expected_grid(&surface_set()));
    assert_eq!(scene.view().center(), pos2(10.0, -10.0));
    assert_eq!(scene.view().bounds().max, 100.0);
}

#[test]
fn test_switch_replaces_grid_and_recenters() {
    let mut scene = create_scene();
    scene.view_mut().key_pan(PanDirection::Left);
    let t0 = Instant::now();
    scene.reset_view(t0);
    assert!(scene.view().is_animating());

    scene.show_dataset(DatasetKind::Pl, Some(VIEWPORT_WIDTH));

    assert_eq!(scene.active(), DatasetKind::Pl);
    assert_eq!(scene.grid(), &expected_grid(&pl_set()));
    assert_ne!(scene.grid().len(), expected_grid(&surface_set()).len());
    assert_eq!(scene.view().center(), pos2(5.0, 8.0));
    assert_eq!(scene.view().target(), pos2(5.0, 8.0));
    assert!(!scene.view().is_animating());

    // The cancelled reset must not pull the camera back later
    scene.view_mut().tick(t0 + Duration::from_millis(600));
    assert_eq!(scene.view().center(), pos2(5.0, 8.0));
}

#[test]
fn test_storing_hidden_list_keeps_view() {
    let mut scene = create_scene();
    scene.view_mut().key_pan(PanDirection::Up);
    let center = scene.view().center();
    let grid = scene.grid().clone();

    assert!(!scene.store(pl_set()));
    assert!(!scene.clear(DatasetKind::Pl));

    assert_eq!(scene.view().center(), center);
    assert_eq!(scene.grid(), &grid);
    assert!(scene.dataset(DatasetKind::Pl).is_empty());
}

#[test]
fn test_cell_label_toggle_rebuilds_grid() {
    let mut scene = create_scene();
    assert!(scene.grid().cells.iter().all(|cell| cell.label.is_none()));

    scene.set_cell_labels(true);
    assert_eq!(scene.grid().cell(0, 0).unwrap().label.as_deref(), Some("(2.5, 2.5)"));

    scene.set_cell_labels(false);
    assert!(scene.grid().cells.iter().all(|cell| cell.label.is_none()));
}

#[test]
fn test_reset_view_targets_active_dataset() {
    let mut scene = create_scene();
    scene.show_dataset(DatasetKind::Pl, Some(VIEWPORT_WIDTH));
    scene.view_mut().set_zoom(50.0);
    scene.view_mut().key_pan(PanDirection::Right);

    let t0 = Instant::now();
    assert!(scene.reset_view(t0));
    scene.view_mut().tick(t0 + Duration::from_millis(500));

    assert_eq!(scene.view().center(), pos2(5.0, 8.0));
    assert_eq!(scene.view().zoom(), 4.0);
}

#[test]
fn test_apply_config_restarts_camera() {
    let mut scene = create_scene();
    assert!(!scene.apply_config(ViewerConfig::default()));

    let config = ViewerConfig {
        cell_size: 10.0,
        ..ViewerConfig::default()
    };
    assert!(scene.apply_config(config));
    scene.show_dataset(DatasetKind::Surface, Some(VIEWPORT_WIDTH));

    assert_eq!(scene.grid().cell_size, 10.0);
    assert_eq!(scene.view().bounds().max, 50.0);
}
