//! Wafer Defect Map Library
//!
//! This library provides loading, layout and view logic for visualizing wafer
//! surface and photoluminescence (PL) defect lists.

pub mod animation;
pub mod config;
pub mod defect;
pub mod export;
pub mod grid;
pub mod palette;
pub mod scene;
pub mod view;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use defect::{BoundingBox, DatasetKind, DefectRecord, DefectRect, DefectSet};
pub use grid::{CellLabels, GridCell, GridOverlay};
pub use palette::ClassPalette;
pub use scene::WaferScene;
pub use view::{InteractionMode, PanDirection, ViewController, ZoomBounds};
