// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Defect class color palette
//!
//! Maps defect class labels to display colors. Every color string is validated
//! when the palette is built, so a malformed table entry is reported at startup
//! instead of being drawn with an arbitrary color.

use egui::Color32;
use std::collections::HashSet;

/// Built-in class table: label and `#RRGGBB` color, in legend order.
///
/// Several labels intentionally share a color (`MicroPipe`/`Downfall`,
/// `carrot`/`PL_BSF`, `triangle`/`scratch`).
pub const BUILTIN_CLASS_COLORS: &[(&str, &str)] = &[
    ("Unclassified", "#FF0000"),
    ("Particle", "#000000"),
    ("Pit", "#00FF00"),
    ("Bump", "#ADAF08"),
    ("MicroPipe", "#0000FF"),
    ("Line", "#00FFFF"),
    ("carrot", "#FF92F8"),
    ("triangle", "#5DD7F6"),
    ("Downfall", "#0000FF"),
    ("scratch", "#5DD7F6"),
    ("PL_Black", "#FF9A16"),
    ("PL_White", "#FF007B"),
    ("PL_BPD", "#38D1FF"),
    ("PL_SF", "#6D6DF2"),
    ("PL_BSF", "#FF92F8"),
];

/// Color used for any label missing from the palette
pub const UNKNOWN_CLASS_COLOR: &str = "#FF00FF";

/// Parse a strict `#RRGGBB` color string
pub fn parse_hex_color(text: &str) -> Result<Color32, Box<dyn std::error::Error>> {
    let hex = text
        .strip_prefix('#')
        .ok_or_else(|| format!("Color '{text}' must start with '#'"))?;

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Color '{text}' is not a #RRGGBB value").into());
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
    Ok(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format a color back into `#RRGGBB`
pub fn format_hex_color(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub class: String,
    pub color: Color32,
}

#[derive(Debug, Clone)]
pub struct ClassPalette {
    entries: Vec<PaletteEntry>,
    unknown: Color32,
}

impl ClassPalette {
    /// Build a palette from `(label, color)` pairs, rejecting malformed colors
    /// and repeated labels.
    pub fn from_table(
        table: &[(&str, &str)],
        unknown: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(table.len());

        for (class, color) in table {
            if !seen.insert(*class) {
                return Err(format!("Duplicate palette entry for class '{class}'").into());
            }
            let color = parse_hex_color(color)
                .map_err(|e| format!("Invalid color for class '{class}': {e}"))?;
            entries.push(PaletteEntry {
                class: class.to_string(),
                color,
            });
        }

        let unknown = parse_hex_color(unknown)
            .map_err(|e| format!("Invalid fallback class color: {e}"))?;

        log::debug!("Class palette ready with {} entries", entries.len());
        Ok(Self { entries, unknown })
    }

    pub fn builtin() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_table(BUILTIN_CLASS_COLORS, UNKNOWN_CLASS_COLOR)
    }

    /// Exact, case-sensitive lookup; unknown labels get the fallback color.
    pub fn color_for(&self, class: &str) -> Color32 {
        self.entries
            .iter()
            .find(|entry| entry.class == class)
            .map(|entry| entry.color)
            .unwrap_or(self.unknown)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.entries.iter().any(|entry| entry.class == class)
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn unknown_color(&self) -> Color32 {
        self.unknown
    }
}
