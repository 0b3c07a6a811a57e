// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use rfd::FileDialog;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use wafer_defect_viewer::defect::builder::DefectSetBuilder;
use wafer_defect_viewer::defect::reader::{find_dataset_file, DefectReader};
use wafer_defect_viewer::export;
use wafer_defect_viewer::palette::format_hex_color;
use wafer_defect_viewer::{
    ClassPalette, DatasetKind, DefectSet, InteractionMode, PanDirection, ViewerConfig, WaferScene,
};

const BACKGROUND_COLOR: egui::Color32 = egui::Color32::from_rgb(0xF5, 0xF5, 0xF5);
const GRID_BASE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x8C, 0xEF, 0xA1);
const GRID_BORDER_COLOR: egui::Color32 = egui::Color32::WHITE;
const LABEL_TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(0x33, 0x33, 0x33);
/// Defect marker opacity (80%)
const DEFECT_ALPHA: u8 = 204;

fn grid_overlap_color() -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(0xFF, 0x78, 0x78, 128)
}

/// File loading state
#[derive(Debug, Clone, Default)]
enum LoadingState {
    #[default]
    Idle,
    Loading {
        description: String,
        start_time: Instant,
        show_progress: bool,
    },
}

/// Result of a wafer folder load
#[derive(Debug)]
struct FolderLoad {
    dir: String,
    config: Result<ViewerConfig, String>,
    datasets: Vec<(DatasetKind, Result<DefectSet, String>, Option<String>)>,
}

/// File loading result message
#[derive(Debug)]
enum LoadingMessage {
    DatasetLoaded(DatasetKind, Box<Result<DefectSet, String>>, String), // Result and file path
    FolderLoaded(Box<FolderLoad>),
}

pub struct WaferMapViewer {
    palette: ClassPalette,
    scene: WaferScene,
    dataset_paths: BTreeMap<DatasetKind, String>,
    load_errors: BTreeMap<DatasetKind, String>,
    viewport_size: Option<egui::Vec2>,
    show_dataset_delay_frames: u8, // Delay the first show until the layout is stable
    show_legend: bool,
    show_details: bool,
    hover_world: Option<egui::Pos2>,
    error_message: Option<String>,
    success_message: Option<String>,
    // Async loading state
    loading_state: LoadingState,
    loading_receiver: Option<mpsc::Receiver<LoadingMessage>>,
}

impl WaferMapViewer {
    pub fn new(palette: ClassPalette) -> Self {
        Self {
            palette,
            scene: WaferScene::new(ViewerConfig::default()),
            dataset_paths: BTreeMap::new(),
            load_errors: BTreeMap::new(),
            viewport_size: None,
            show_dataset_delay_frames: 0,
            show_legend: true,
            show_details: false,
            hover_world: None,
            error_message: None,
            success_message: None,
            loading_state: LoadingState::Idle,
            loading_receiver: None,
        }
    }

    /// Store a loaded list; returns whether it is the displayed one
    fn store_dataset(&mut self, set: DefectSet, path: Option<String>) -> bool {
        let kind = set.kind;
        self.load_errors.remove(&kind);
        match path {
            Some(path) => {
                self.dataset_paths.insert(kind, path);
            }
            None => {
                self.dataset_paths.remove(&kind);
            }
        }
        self.scene.store(set)
    }

    fn fail_dataset(&mut self, kind: DatasetKind, error: String) -> bool {
        log::warn!("{} unavailable: {error}", kind.title());
        self.dataset_paths.remove(&kind);
        self.load_errors.insert(kind, error);
        self.scene.clear(kind)
    }

    fn show_dataset(&mut self, kind: DatasetKind) {
        self.scene
            .show_dataset(kind, self.viewport_size.map(|size| size.x));
    }

    fn reset_view(&mut self) {
        self.scene.reset_view(Instant::now());
    }

    fn make_reader(&self, config: &ViewerConfig) -> DefectReader {
        DefectReader::new(DefectSetBuilder::new(self.palette.clone(), config))
    }

    fn check_loading_progress(&mut self, ctx: &egui::Context) {
        // Check if we need to show progress bar (after 500ms)
        if let LoadingState::Loading {
            start_time,
            show_progress,
            ..
        } = &mut self.loading_state
        {
            if !*show_progress && start_time.elapsed() >= Duration::from_millis(500) {
                *show_progress = true;
                ctx.request_repaint();
            }
        }

        if let Some(receiver) = &self.loading_receiver {
            match receiver.try_recv() {
                Ok(message) => {
                    self.loading_state = LoadingState::Idle;
                    self.loading_receiver = None;

                    let reshow = match message {
                        LoadingMessage::DatasetLoaded(kind, result, path) => match *result {
                            Ok(set) => self.store_dataset(set, Some(path)),
                            Err(error) => {
                                self.error_message = Some(error.clone());
                                self.fail_dataset(kind, error)
                            }
                        },
                        LoadingMessage::FolderLoaded(folder) => {
                            self.load_folder_sync(*folder);
                            true
                        }
                    };
                    // Lists loaded in the background leave the displayed view alone
                    if reshow {
                        self.show_dataset_delay_frames = 3;
                    }
                    ctx.request_repaint();
                }
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.loading_state = LoadingState::Idle;
                    self.loading_receiver = None;
                    self.error_message = Some("File loading was interrupted".to_string());
                    ctx.request_repaint();
                }
            }
        }
    }

    fn load_folder_sync(&mut self, folder: FolderLoad) {
        match folder.config {
            Ok(config) => {
                self.scene.apply_config(config);
            }
            Err(error) => self.error_message = Some(error),
        }

        let mut failures = Vec::new();
        for (kind, result, path) in folder.datasets {
            match result {
                Ok(set) => {
                    self.store_dataset(set, path);
                }
                Err(error) => {
                    failures.push(error.clone());
                    self.fail_dataset(kind, error);
                }
            }
        }

        if !failures.is_empty() && self.error_message.is_none() {
            self.error_message = Some(failures.join("\n"));
        }
        log::info!(
            "Wafer folder {}: surface {} defects, PL {} defects",
            folder.dir,
            self.scene.dataset(DatasetKind::Surface).len(),
            self.scene.dataset(DatasetKind::Pl).len()
        );
    }

    fn start_loading(&mut self, description: String) -> mpsc::Sender<LoadingMessage> {
        self.loading_state = LoadingState::Loading {
            description,
            start_time: Instant::now(),
            show_progress: false,
        };
        let (tx, rx) = mpsc::channel();
        self.loading_receiver = Some(rx);
        tx
    }

    fn start_dataset_loading(&mut self, kind: DatasetKind, path: String) {
        let file_name = Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let reader = self.make_reader(self.scene.config());
        let tx = self.start_loading(format!("{}: {}", kind.title(), file_name));

        thread::spawn(move || {
            let result = reader
                .read(&path, kind)
                .map_err(|e| format!("Failed to load {}: {}", kind.title(), e));
            let _ = tx.send(LoadingMessage::DatasetLoaded(kind, Box::new(result), path));
        });
    }

    fn start_folder_loading(&mut self, dir: String) {
        let palette = self.palette.clone();
        let current = self.scene.config().clone();
        let tx = self.start_loading(format!("wafer folder {dir}"));

        thread::spawn(move || {
            let config = ViewerConfig::load_from_dir(&dir)
                .map_err(|e| format!("Invalid viewer config in {dir}: {e}"));
            let effective = config.as_ref().unwrap_or(&current).clone();
            let reader = DefectReader::new(DefectSetBuilder::new(palette, &effective));

            let datasets = DatasetKind::ALL
                .iter()
                .map(|&kind| match find_dataset_file(&dir, kind) {
                    Some(path) => {
                        let result = reader
                            .read(&path, kind)
                            .map_err(|e| format!("Failed to load {}: {}", kind.title(), e));
                        (kind, result, Some(path.to_string_lossy().to_string()))
                    }
                    None => (
                        kind,
                        Err(format!(
                            "No {}.json or {}.csv found in {}",
                            kind.file_stem(),
                            kind.file_stem(),
                            dir
                        )),
                        None,
                    ),
                })
                .collect();

            let _ = tx.send(LoadingMessage::FolderLoaded(Box::new(FolderLoad {
                dir,
                config,
                datasets,
            })));
        });
    }

    fn handle_export_defects_csv(&mut self) {
        let set = self.scene.active_dataset();
        if set.is_empty() {
            return;
        }
        let default_filename = format!("{}_defects.csv", set.kind.file_stem());
        let Some(file_path) = FileDialog::new()
            .set_file_name(&default_filename)
            .add_filter("CSV files", &["csv"])
            .save_file()
        else {
            return;
        };

        let count = set.len();
        match export::export_defects_to_csv(set, &file_path.to_string_lossy()) {
            Ok(()) => {
                self.success_message = Some(format!(
                    "Successfully exported {} defects to CSV file: {}",
                    count,
                    file_path.display()
                ));
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to export CSV: {}", e));
            }
        }
    }

    fn handle_export_grid_csv(&mut self) {
        let grid = self.scene.grid();
        if grid.is_empty() {
            return;
        }
        let default_filename = format!("{}_grid.csv", self.scene.active().file_stem());
        let Some(file_path) = FileDialog::new()
            .set_file_name(&default_filename)
            .add_filter("CSV files", &["csv"])
            .save_file()
        else {
            return;
        };

        let count = grid.len();
        match export::export_grid_to_csv(grid, &file_path.to_string_lossy()) {
            Ok(()) => {
                self.success_message = Some(format!(
                    "Successfully exported {} grid cells to CSV file: {}",
                    count,
                    file_path.display()
                ));
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to export CSV: {}", e));
            }
        }
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Wafer Folder").clicked() {
                    if let Some(dir) = FileDialog::new().pick_folder() {
                        self.start_folder_loading(dir.to_string_lossy().to_string());
                    }
                    ui.close_menu();
                }

                for kind in DatasetKind::ALL {
                    if ui.button(format!("Open {}", kind.title())).clicked() {
                        if let Some(path) = FileDialog::new()
                            .add_filter("Defect lists", &["json", "csv"])
                            .pick_file()
                        {
                            self.start_dataset_loading(kind, path.to_string_lossy().to_string());
                        }
                        ui.close_menu();
                    }
                }

                ui.separator();

                if ui
                    .add_enabled(
                        !self.scene.active_dataset().is_empty(),
                        egui::Button::new("Export Active Defects to CSV"),
                    )
                    .clicked()
                {
                    self.handle_export_defects_csv();
                    ui.close_menu();
                }

                if ui
                    .add_enabled(
                        !self.scene.grid().is_empty(),
                        egui::Button::new("Export Grid Map to CSV"),
                    )
                    .clicked()
                {
                    self.handle_export_grid_csv();
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Exit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                ui.checkbox(&mut self.show_legend, "Show Legend");
                ui.checkbox(&mut self.show_details, "Show Details");
                ui.separator();
                let mut show_labels = self.scene.config().show_cell_labels;
                if ui.checkbox(&mut show_labels, "Show Cell Labels").changed() {
                    self.scene.set_cell_labels(show_labels);
                }
            });
        });
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for kind in DatasetKind::ALL {
                if ui
                    .selectable_label(self.scene.active() == kind, kind.title())
                    .clicked()
                {
                    self.show_dataset(kind);
                }
            }

            ui.separator();

            if ui.button("Reset View (R)").clicked() {
                self.reset_view();
            }
        });
    }

    fn render_status_panel(&self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            ui.heading("Status");
            ui.label(format!(
                "Surface: {} defects | PL: {} defects",
                self.scene.dataset(DatasetKind::Surface).len(),
                self.scene.dataset(DatasetKind::Pl).len()
            ));

            for kind in DatasetKind::ALL {
                let set = self.scene.dataset(kind);
                if set.skipped > 0 {
                    ui.label(format!(
                        "{}: {} incomplete records skipped",
                        kind.short_title(),
                        set.skipped
                    ));
                }
                if let Some(path) = self.dataset_paths.get(&kind) {
                    ui.label(format!("{}: {}", kind.short_title(), path));
                }
                if let Some(error) = self.load_errors.get(&kind) {
                    ui.colored_label(egui::Color32::from_rgb(244, 67, 54), error);
                }
            }

            ui.separator();

            ui.label(format!("Showing: {}", self.scene.active().title()));
            if let Some(bounds) = &self.scene.active_dataset().bounds {
                ui.label(format!(
                    "Extent: {:.1} x {:.1} mm",
                    bounds.width(),
                    bounds.height()
                ));
            }
            let grid = self.scene.grid();
            ui.label(format!(
                "Grid: {} cells, {} with defects",
                grid.len(),
                grid.overlap_count()
            ));
            match self.hover_world {
                Some(pos) => ui.monospace(format!("Cursor: ({:.2}, {:.2}) mm", pos.x, pos.y)),
                None => ui.monospace("Cursor: -"),
            };

            ui.separator();

            ui.heading("Controls");
            ui.label("- Mouse wheel: zoom");
            ui.label("- Left drag: pan");
            ui.label("- Middle drag: zoom");
            ui.label("- W/A/S/D or arrow keys: pan");
            ui.label("- R: reset view");
        });
    }

    fn render_legend(&self, ui: &mut egui::Ui) {
        ui.heading("Legend");
        let swatch = |ui: &mut egui::Ui, color: egui::Color32, label: &str| {
            ui.horizontal(|ui| {
                let (rect, _) =
                    ui.allocate_exact_size(egui::Vec2::splat(12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 0.0, color);
                ui.painter().rect_stroke(
                    rect,
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::from_gray(0x99)),
                    egui::StrokeKind::Inside,
                );
                ui.label(label);
            })
            .response
            .on_hover_text(format_hex_color(color));
        };

        for entry in self.palette.entries() {
            swatch(ui, entry.color, &entry.class);
        }
        swatch(ui, self.palette.unknown_color(), "Other");
    }

    fn render_zoom_slider(&mut self, ui: &mut egui::Ui) {
        let bounds = self.scene.view().bounds();
        let mut level = self.scene.view().zoom();
        ui.horizontal(|ui| {
            ui.label(format!("Zoom: {:.2}x", level));
            if ui
                .add(egui::Slider::new(&mut level, bounds.min..=bounds.max).show_value(false))
                .changed()
            {
                self.scene.view_mut().reconcile_zoom(level);
            }
        });
    }

    fn render_details(&mut self, ctx: &egui::Context) {
        let set = self.scene.active_dataset();
        let counts = set.class_counts();
        let title = set.kind.title();
        let total = set.len();
        let palette = &self.palette;

        egui::Window::new("Defect Details")
            .open(&mut self.show_details)
            .resizable(true)
            .default_size([300.0, 300.0])
            .show(ctx, |ui| {
                ui.label(format!("{title}: {total} defects"));
                ui.separator();
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::exact(20.0)) // Color swatch
                    .column(Column::remainder().at_least(120.0)) // Class
                    .column(Column::exact(60.0)) // Count
                    .header(20.0, |mut header| {
                        header.col(|_ui| {});
                        header.col(|ui| {
                            ui.strong("Class");
                        });
                        header.col(|ui| {
                            ui.strong("Count");
                        });
                    })
                    .body(|mut body| {
                        for (class, count) in &counts {
                            body.row(18.0, |mut row| {
                                row.col(|ui| {
                                    let (rect, _) = ui.allocate_exact_size(
                                        egui::Vec2::splat(12.0),
                                        egui::Sense::hover(),
                                    );
                                    ui.painter().rect_filled(rect, 0.0, palette.color_for(class));
                                });
                                row.col(|ui| {
                                    if palette.contains(class) {
                                        ui.label(class);
                                    } else {
                                        ui.label(format!("{class} (other)"));
                                    }
                                });
                                row.col(|ui| {
                                    ui.monospace(count.to_string());
                                });
                            });
                        }
                    });
            });
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (pans, reset) = ctx.input(|i| {
            let mut pans = Vec::new();
            if i.key_pressed(egui::Key::W) || i.key_pressed(egui::Key::ArrowUp) {
                pans.push(PanDirection::Up);
            }
            if i.key_pressed(egui::Key::S) || i.key_pressed(egui::Key::ArrowDown) {
                pans.push(PanDirection::Down);
            }
            if i.key_pressed(egui::Key::A) || i.key_pressed(egui::Key::ArrowLeft) {
                pans.push(PanDirection::Left);
            }
            if i.key_pressed(egui::Key::D) || i.key_pressed(egui::Key::ArrowRight) {
                pans.push(PanDirection::Right);
            }
            (pans, i.key_pressed(egui::Key::R))
        });

        for direction in pans {
            self.scene.view_mut().key_pan(direction);
        }
        if reset {
            self.reset_view();
        }
    }

    fn render_visualization(&mut self, ui: &mut egui::Ui) {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, egui::Sense::click_and_drag());
        let rect = response.rect;

        // Zoom bounds follow the viewport width
        if self.viewport_size != Some(rect.size()) {
            self.viewport_size = Some(rect.size());
            self.scene.view_mut().update_bounds(rect.width());
        }

        if self.show_dataset_delay_frames > 0 {
            self.show_dataset_delay_frames -= 1;
            if self.show_dataset_delay_frames == 0 {
                self.show_dataset(self.scene.active());
            }
        }

        // Pan/zoom gestures
        let view = self.scene.view_mut();
        if response.drag_started_by(egui::PointerButton::Primary) {
            view.begin_pan();
        } else if response.drag_started_by(egui::PointerButton::Middle) {
            view.begin_zoom();
        }

        if response.dragged_by(egui::PointerButton::Primary)
            && view.mode() == InteractionMode::Panning
        {
            view.pan_by_screen_delta(response.drag_delta());
        } else if response.dragged_by(egui::PointerButton::Middle)
            && view.mode() == InteractionMode::Zooming
        {
            view.drag_zoom(response.drag_delta().y);
        }

        if response.drag_stopped() {
            view.end_gesture();
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
            view.wheel_zoom(scroll_delta);
        }

        self.handle_keyboard(ui.ctx());
        self.scene.view_mut().tick(Instant::now());

        let view = self.scene.view();
        if response.hovered() || view.mode() != InteractionMode::Idle {
            ui.ctx().set_cursor_icon(match view.mode() {
                InteractionMode::Idle => egui::CursorIcon::Grab,
                InteractionMode::Panning => egui::CursorIcon::Grabbing,
                InteractionMode::Zooming => egui::CursorIcon::ZoomIn,
            });
        }

        self.hover_world = response
            .hover_pos()
            .map(|pos| view.screen_to_world(pos, rect));

        let grid = self.scene.grid();
        let set = self.scene.active_dataset();

        painter.rect_filled(rect, 0.0, BACKGROUND_COLOR);

        let visible = view
            .visible_rect(rect.size())
            .expand(grid.cell_size as f32);
        let to_screen = |min_x: f64, max_x: f64, min_y: f64, max_y: f64| {
            let area = egui::Rect::from_min_max(
                egui::pos2(min_x as f32, min_y as f32),
                egui::pos2(max_x as f32, max_y as f32),
            );
            if !area.intersects(visible) {
                return None;
            }
            Some(egui::Rect::from_two_pos(
                view.world_to_screen(area.left_bottom(), rect),
                view.world_to_screen(area.right_top(), rect),
            ))
        };

        // Grid overlay under the defects
        let overlap_color = grid_overlap_color();
        for cell in &grid.cells {
            let (min_x, max_x, min_y, max_y) = grid.cell_bounds(cell);
            let Some(cell_rect) = to_screen(min_x, max_x, min_y, max_y) else {
                continue;
            };
            let fill = if cell.overlaps {
                overlap_color
            } else {
                GRID_BASE_COLOR
            };
            painter.rect_filled(cell_rect, 0.0, fill);
            painter.rect_stroke(
                cell_rect,
                0.0,
                egui::Stroke::new(1.0, GRID_BORDER_COLOR),
                egui::StrokeKind::Middle,
            );
        }

        // Defect markers
        for marker in &set.rects {
            let half_w = marker.width / 2.0;
            let half_h = marker.height / 2.0;
            let Some(marker_rect) = to_screen(
                marker.x - half_w,
                marker.x + half_w,
                marker.y - half_h,
                marker.y + half_h,
            ) else {
                continue;
            };
            // Keep tiny defects visible at low zoom
            let marker_rect = egui::Rect::from_center_size(
                marker_rect.center(),
                marker_rect.size().max(egui::Vec2::splat(1.0)),
            );
            let color = egui::Color32::from_rgba_unmultiplied(
                marker.color.r(),
                marker.color.g(),
                marker.color.b(),
                DEFECT_ALPHA,
            );
            painter.rect_filled(marker_rect, 0.0, color);
        }

        // Optional coordinate labels on top
        let font = egui::FontId::proportional(12.0);
        for cell in &grid.cells {
            let Some(label) = &cell.label else {
                continue;
            };
            let pos = view.world_to_screen(
                egui::pos2(cell.center_x as f32, cell.center_y as f32),
                rect,
            );
            if !rect.contains(pos) {
                continue;
            }
            let galley = painter.layout_no_wrap(label.clone(), font.clone(), LABEL_TEXT_COLOR);
            let text_rect = egui::Align2::CENTER_CENTER.anchor_size(pos, galley.size());
            painter.rect_filled(
                text_rect.expand2(egui::vec2(4.0, 1.0)),
                2.0,
                egui::Color32::from_rgba_unmultiplied(255, 255, 255, 178),
            );
            painter.galley(text_rect.min, galley, LABEL_TEXT_COLOR);
        }

        if set.is_empty() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No defects loaded. Use File > Open Wafer Folder.",
                egui::FontId::proportional(16.0),
                egui::Color32::GRAY,
            );
        }
    }
}

impl eframe::App for WaferMapViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check loading progress and handle async messages
        self.check_loading_progress(ctx);

        if let Some(error) = &self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(244, 67, 54), error);
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.allocate_space(egui::Vec2::new(ui.available_width() / 2.0 - 25.0, 0.0));
                        if ui.button("OK").clicked() {
                            self.error_message = None;
                        }
                    });
                });
        }

        if let Some(success) = &self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(76, 175, 80), success);
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.allocate_space(egui::Vec2::new(ui.available_width() / 2.0 - 25.0, 0.0));
                        if ui.button("OK").clicked() {
                            self.success_message = None;
                        }
                    });
                });
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.render_menu_bar(ui);
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        // Show progress bar if loading and show_progress is true
        if let LoadingState::Loading {
            description,
            start_time,
            show_progress,
        } = &self.loading_state
        {
            if *show_progress {
                egui::TopBottomPanel::top("loading_bar").show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(format!("Loading {}", description));
                        ui.label(format!("({:.1}s)", start_time.elapsed().as_secs_f32()));
                    });
                });
            }
        }

        egui::TopBottomPanel::bottom("zoom_panel").show(ctx, |ui| {
            self.render_zoom_slider(ui);
        });

        egui::SidePanel::left("status_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                self.render_status_panel(ui);
            });

        if self.show_legend {
            egui::SidePanel::right("legend_panel")
                .resizable(true)
                .default_width(160.0)
                .show(ctx, |ui| {
                    self.render_legend(ui);
                });
        }

        if self.show_details {
            self.render_details(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.render_visualization(ui);
            });

        // Redraw every frame, no dirty tracking
        ctx.request_repaint();
    }
}
