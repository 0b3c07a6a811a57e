// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::builder::DefectSetBuilder;
use super::{DatasetKind, DefectSet};

/// Reads extracted defect lists (JSON arrays or CSV tables)
pub struct DefectReader {
    builder: DefectSetBuilder,
}

impl DefectReader {
    pub fn new(builder: DefectSetBuilder) -> Self {
        Self { builder }
    }

    pub fn read<P: AsRef<Path>>(
        &self,
        path: P,
        kind: DatasetKind,
    ) -> Result<DefectSet, Box<dyn std::error::Error>> {
        let value = Self::read_value(&path)?;
        self.builder.build(kind, &value)
    }

    /// Load a defect list as loosely typed records.
    ///
    /// CSV rows become objects keyed by header; empty cells are left out so
    /// they read as missing fields.
    pub fn read_value<P: AsRef<Path>>(path: P) -> Result<Value, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        log::info!("[LOAD] Loading defect list: {}", path.display());

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => {
                let content = fs::read_to_string(path)?;
                log::info!("[FILE] Defect list size: {} bytes", content.len());
                serde_json::from_str::<Value>(&content)
                    .map_err(|e| format!("Failed to parse {}: {e}", path.display()).into())
            }
            "csv" => Self::read_csv(path),
            other => Err(format!("Unsupported defect list format '.{other}'").into()),
        }
    }

    fn read_csv(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut object = Map::new();
            for (header, cell) in headers.iter().zip(record.iter()) {
                let cell = cell.trim();
                if !cell.is_empty() {
                    object.insert(header.trim().to_string(), Value::String(cell.to_string()));
                }
            }
            rows.push(Value::Object(object));
        }

        log::info!("[FILE] Read {} CSV rows", rows.len());
        Ok(Value::Array(rows))
    }
}

/// Locate `<stem>.json` (preferred) or `<stem>.csv` for `kind` in a wafer folder.
/// The stem match ignores case.
pub fn find_dataset_file<P: AsRef<Path>>(dir: P, kind: DatasetKind) -> Option<PathBuf> {
    let entries = fs::read_dir(dir.as_ref()).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| stem.eq_ignore_ascii_case(kind.file_stem()))
        })
        .collect();

    candidates.sort();
    ["json", "csv"].iter().find_map(|wanted| {
        candidates
            .iter()
            .find(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
            })
            .cloned()
    })
}
