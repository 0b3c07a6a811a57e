// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const FIELD_X: &str = "X(mm)";
pub const FIELD_Y: &str = "Y(mm)";
pub const FIELD_WIDTH: &str = "W(um)";
pub const FIELD_HEIGHT: &str = "H(um)";
pub const FIELD_CLASS: &str = "Class";

/// Label used when a record carries no class
pub const UNKNOWN_CLASS: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DatasetKind {
    Surface,
    Pl,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Surface, DatasetKind::Pl];

    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Surface => "surface",
            DatasetKind::Pl => "pl",
        }
    }

    /// Sheet title in the scanner export, also used as the button caption
    pub fn title(&self) -> &'static str {
        match self {
            DatasetKind::Surface => "Surface defect list",
            DatasetKind::Pl => "PL defect list",
        }
    }

    pub fn short_title(&self) -> &'static str {
        match self {
            DatasetKind::Surface => "Surface",
            DatasetKind::Pl => "PL",
        }
    }

    /// File stem written by the sheet extraction step
    pub fn file_stem(&self) -> &'static str {
        match self {
            DatasetKind::Surface => "surface",
            DatasetKind::Pl => "PL",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectRecord {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_um: f64,
    pub height_um: f64,
    pub class: String,
}

/// Axis-aligned box over defect positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn from_point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Tight box over `points`, `None` when there are none
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        let mut bounds = Self::from_point(x, y);
        for (x, y) in points {
            bounds.include(x, y);
        }
        Some(bounds)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Drawable marker for one defect, in scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefectRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color32,
}

#[derive(Debug, Clone)]
pub struct DefectSet {
    pub kind: DatasetKind,
    pub records: Vec<DefectRecord>,
    pub rects: Vec<DefectRect>,
    pub bounds: Option<BoundingBox>,
    /// Records dropped for lacking a position
    pub skipped: usize,
}

impl DefectSet {
    pub fn empty(kind: DatasetKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
            rects: Vec::new(),
            bounds: None,
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn center(&self) -> Option<(f64, f64)> {
        self.bounds.map(|bounds| bounds.center())
    }

    pub fn class_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.class.clone()).or_insert(0) += 1;
        }
        counts
    }
}

pub mod builder;
pub mod reader;
