// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

mod gui;

use eframe::egui;
use wafer_defect_viewer::ClassPalette;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A malformed class table must stop the viewer before any window opens
    let palette = ClassPalette::builtin()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wafer Defect Map Viewer",
        options,
        Box::new(|_cc| {
            Ok(Box::new(gui::WaferMapViewer::new(palette)))
        }),
    )?;
    Ok(())
}
