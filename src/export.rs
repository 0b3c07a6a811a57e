// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use csv::Writer;
use serde::Serialize;
use std::fs::File;

use crate::defect::{DefectRecord, DefectSet};
use crate::grid::{GridCell, GridOverlay};

/// Same column layout as the imported defect lists
#[derive(Debug, Serialize)]
pub struct DefectCsvRecord {
    #[serde(rename = "X(mm)")]
    pub x_mm: f64,
    #[serde(rename = "Y(mm)")]
    pub y_mm: f64,
    #[serde(rename = "W(um)")]
    pub width_um: f64,
    #[serde(rename = "H(um)")]
    pub height_um: f64,
    #[serde(rename = "Class")]
    pub class: String,
}

#[derive(Debug, Serialize)]
pub struct GridCellCsvRecord {
    #[serde(rename = "I")]
    pub i: i32,
    #[serde(rename = "J")]
    pub j: i32,
    #[serde(rename = "CenterX")]
    pub center_x: f64,
    #[serde(rename = "CenterY")]
    pub center_y: f64,
    #[serde(rename = "Overlap")]
    pub overlap: bool,
}

fn defect_to_csv_record(record: &DefectRecord) -> DefectCsvRecord {
    DefectCsvRecord {
        x_mm: record.x_mm,
        y_mm: record.y_mm,
        width_um: record.width_um,
        height_um: record.height_um,
        class: record.class.clone(),
    }
}

fn cell_to_csv_record(cell: &GridCell) -> GridCellCsvRecord {
    GridCellCsvRecord {
        i: cell.i,
        j: cell.j,
        center_x: cell.center_x,
        center_y: cell.center_y,
        overlap: cell.overlaps,
    }
}

/// Export the accepted records of a defect set to CSV
pub fn export_defects_to_csv(
    defects: &DefectSet,
    file_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    for record in &defects.records {
        writer.serialize(defect_to_csv_record(record))?;
    }

    writer.flush()?;
    log::info!(
        "Exported {} {} defects to {file_path}",
        defects.len(),
        defects.kind
    );
    Ok(())
}

/// Export the grid overlay cells to CSV
pub fn export_grid_to_csv(
    grid: &GridOverlay,
    file_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    for cell in &grid.cells {
        writer.serialize(cell_to_csv_record(cell))?;
    }

    writer.flush()?;
    log::info!("Exported {} grid cells to {file_path}", grid.len());
    Ok(())
}
