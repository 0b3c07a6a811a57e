// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde_json::{Map, Value};

use super::{
    BoundingBox, DatasetKind, DefectRecord, DefectRect, DefectSet, FIELD_CLASS, FIELD_HEIGHT,
    FIELD_WIDTH, FIELD_X, FIELD_Y, UNKNOWN_CLASS,
};
use crate::config::ViewerConfig;
use crate::palette::ClassPalette;

/// Turns loosely typed defect records into drawable markers
#[derive(Debug, Clone)]
pub struct DefectSetBuilder {
    palette: ClassPalette,
    size_divisor: f64,
    min_marker_size: f64,
}

impl DefectSetBuilder {
    pub fn new(palette: ClassPalette, config: &ViewerConfig) -> Self {
        Self {
            palette,
            size_divisor: config.size_divisor,
            min_marker_size: config.min_marker_size,
        }
    }

    pub fn build(
        &self,
        kind: DatasetKind,
        data: &Value,
    ) -> Result<DefectSet, Box<dyn std::error::Error>> {
        let items = data
            .as_array()
            .ok_or_else(|| format!("{} data must be an array of records", kind.title()))?;

        let mut set = DefectSet::empty(kind);
        set.records.reserve(items.len());
        set.rects.reserve(items.len());

        for (index, item) in items.iter().enumerate() {
            let Some(object) = item.as_object() else {
                log::warn!("Skipping {kind} record #{index}: not an object");
                set.skipped += 1;
                continue;
            };

            let Some(record) = parse_record(object) else {
                log::warn!("Skipping incomplete {kind} record #{index}: {item}");
                set.skipped += 1;
                continue;
            };

            match set.bounds.as_mut() {
                Some(bounds) => bounds.include(record.x_mm, record.y_mm),
                None => set.bounds = Some(BoundingBox::from_point(record.x_mm, record.y_mm)),
            }

            set.rects.push(DefectRect {
                x: record.x_mm,
                y: record.y_mm,
                width: self.marker_size(record.width_um),
                height: self.marker_size(record.height_um),
                color: self.palette.color_for(&record.class),
            });
            set.records.push(record);
        }

        log::info!(
            "[INFO] {}: {} defects accepted, {} skipped, {} classes",
            kind.title(),
            set.len(),
            set.skipped,
            set.class_counts().len()
        );

        Ok(set)
    }

    /// µm to scene units; zero-area markers get the minimum visible size
    pub fn marker_size(&self, size_um: f64) -> f64 {
        let size = (size_um / self.size_divisor).abs();
        if size == 0.0 || !size.is_finite() {
            self.min_marker_size
        } else {
            size
        }
    }
}

fn parse_record(object: &Map<String, Value>) -> Option<DefectRecord> {
    let x = present_field(object, FIELD_X)?;
    let y = present_field(object, FIELD_Y)?;

    Some(DefectRecord {
        x_mm: value_as_f64(x),
        y_mm: value_as_f64(y),
        width_um: present_field(object, FIELD_WIDTH).map_or(0.0, value_as_f64),
        height_um: present_field(object, FIELD_HEIGHT).map_or(0.0, value_as_f64),
        class: present_field(object, FIELD_CLASS)
            .and_then(value_as_class)
            .unwrap_or_else(|| UNKNOWN_CLASS.to_string()),
    })
}

fn present_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

/// Numeric field value; anything unparsable reads as 0
fn value_as_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn value_as_class(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
