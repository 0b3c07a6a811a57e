// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Orthographic 2D camera over the wafer scene.
//!
//! The zoom level is the number of screen pixels per scene unit, so the
//! visible half extents are `viewport / (2 * zoom)`. Scene Y grows upwards,
//! screen Y grows downwards.

use egui::{pos2, vec2, Pos2, Rect, Vec2};
use std::time::{Duration, Instant};

use crate::animation::{AnimatedProperty, Animations, Tween};
use crate::config::ViewerConfig;
use crate::defect::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f32,
    pub max: f32,
}

impl ZoomBounds {
    /// Bounds for the displayed dataset: fixed minimum, maximum such that a
    /// single grid cell spans half the viewport width.
    pub fn for_viewport(viewport_width: f32, cell_size: f64, min_zoom: f32) -> Self {
        let max = viewport_width / (cell_size as f32 * 2.0);
        Self {
            min: min_zoom,
            max: if max.is_finite() { max.max(min_zoom) } else { min_zoom },
        }
    }

    pub fn clamp(&self, level: f32) -> f32 {
        if level.is_nan() {
            return self.min;
        }
        level.clamp(self.min, self.max)
    }

    pub fn contains(&self, level: f32) -> bool {
        level >= self.min && level <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning,
    Zooming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct ViewController {
    zoom: f32,
    bounds: ZoomBounds,
    center: Pos2,
    /// Pan pivot; follows the camera center in this 2D view
    target: Pos2,
    mode: InteractionMode,
    animations: Animations,
    cell_size: f64,
    reset_duration: Duration,
    key_pan_step: f32,
    zoom_epsilon: f32,
    wheel_zoom_factor: f32,
}

impl ViewController {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            zoom: config.min_zoom,
            bounds: ZoomBounds {
                min: config.min_zoom,
                max: config.min_zoom,
            },
            center: Pos2::ZERO,
            target: Pos2::ZERO,
            mode: InteractionMode::Idle,
            animations: Animations::new(),
            cell_size: config.cell_size,
            reset_duration: config.reset_duration(),
            key_pan_step: config.key_pan_step,
            zoom_epsilon: config.zoom_epsilon,
            wheel_zoom_factor: config.wheel_zoom_factor,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    pub fn center(&self) -> Pos2 {
        self.center
    }

    pub fn target(&self) -> Pos2 {
        self.target
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_animating(&self) -> bool {
        self.animations.is_active()
    }

    pub fn half_extents(&self, viewport: Vec2) -> Vec2 {
        viewport / (2.0 * self.zoom)
    }

    /// Scene-space rectangle currently visible in a viewport of this size
    pub fn visible_rect(&self, viewport: Vec2) -> Rect {
        let half = self.half_extents(viewport);
        Rect::from_min_max(self.center - half, self.center + half)
    }

    pub fn world_to_screen(&self, world: Pos2, screen: Rect) -> Pos2 {
        let offset = world - self.center;
        let origin = screen.center();
        pos2(origin.x + offset.x * self.zoom, origin.y - offset.y * self.zoom)
    }

    pub fn screen_to_world(&self, point: Pos2, screen: Rect) -> Pos2 {
        let offset = point - screen.center();
        pos2(
            self.center.x + offset.x / self.zoom,
            self.center.y - offset.y / self.zoom,
        )
    }

    /// Direct zoom change; cancels an in-flight zoom animation.
    pub fn set_zoom(&mut self, level: f32) -> f32 {
        self.animations.cancel(AnimatedProperty::Zoom);
        self.zoom = self.bounds.clamp(level);
        self.zoom
    }

    /// Apply a zoom level reported by the UI (slider) only when it moved by
    /// more than the epsilon, so the slider and the camera do not chase each
    /// other.
    pub fn reconcile_zoom(&mut self, observed: f32) -> bool {
        let clamped = self.bounds.clamp(observed);
        if (self.zoom - clamped).abs() > self.zoom_epsilon {
            self.set_zoom(clamped);
            true
        } else {
            false
        }
    }

    /// Relative gesture step. Every step is applied, however small.
    fn scale_zoom(&mut self, factor: f32) -> bool {
        let before = self.zoom;
        self.set_zoom(before * factor);
        self.zoom != before
    }

    /// Wheel step; positive `scroll` zooms in.
    pub fn wheel_zoom(&mut self, scroll: f32) -> bool {
        if scroll == 0.0 {
            return false;
        }
        let started = self.mode == InteractionMode::Idle;
        self.begin_zoom();
        let factor = if scroll > 0.0 {
            self.wheel_zoom_factor
        } else {
            1.0 / self.wheel_zoom_factor
        };
        let changed = self.scale_zoom(factor);
        if started {
            self.end_gesture();
        }
        changed
    }

    /// Middle-drag dolly: dragging up zooms in.
    pub fn drag_zoom(&mut self, delta_y: f32) -> bool {
        if delta_y == 0.0 {
            return false;
        }
        let factor = self.wheel_zoom_factor.powf(-delta_y / 10.0);
        self.scale_zoom(factor)
    }

    pub fn begin_pan(&mut self) {
        if self.mode == InteractionMode::Idle {
            self.mode = InteractionMode::Panning;
        }
    }

    pub fn begin_zoom(&mut self) {
        if self.mode == InteractionMode::Idle {
            self.mode = InteractionMode::Zooming;
        }
    }

    pub fn end_gesture(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    /// Drag by a screen-space delta; the scene follows the pointer.
    pub fn pan_by_screen_delta(&mut self, delta: Vec2) {
        let world = vec2(-delta.x / self.zoom, delta.y / self.zoom);
        self.move_by(world);
    }

    /// Keyboard pan, constant speed in screen space
    pub fn key_pan(&mut self, direction: PanDirection) {
        let step = self.key_pan_step / self.zoom;
        let world = match direction {
            PanDirection::Up => vec2(0.0, step),
            PanDirection::Down => vec2(0.0, -step),
            PanDirection::Left => vec2(-step, 0.0),
            PanDirection::Right => vec2(step, 0.0),
        };
        self.move_by(world);
    }

    fn move_by(&mut self, world: Vec2) {
        self.animations.cancel(AnimatedProperty::CameraX);
        self.animations.cancel(AnimatedProperty::CameraY);
        self.center += world;
        self.target += world;
    }

    /// Recompute zoom bounds for the viewport and clamp the current zoom.
    pub fn update_bounds(&mut self, viewport_width: f32) {
        self.bounds = ZoomBounds::for_viewport(viewport_width, self.cell_size, self.bounds.min);
        self.zoom = self.bounds.clamp(self.zoom);
    }

    /// Switch to a dataset: new zoom bounds, instant recentre, no animation.
    ///
    /// Without a viewport the bounds stay as they are; without a bounding box
    /// (empty dataset) the camera stays put.
    pub fn show_dataset(&mut self, bounds: Option<&BoundingBox>, viewport_width: Option<f32>) {
        self.animations.cancel_all();
        if let Some(width) = viewport_width {
            self.update_bounds(width);
        }
        if let Some(bounds) = bounds {
            let (x, y) = bounds.center();
            self.center = pos2(x as f32, y as f32);
            self.target = self.center;
        }
    }

    /// Ease camera and zoom back to the dataset centroid and minimum zoom.
    pub fn reset_view(&mut self, bounds: Option<&BoundingBox>, now: Instant) -> bool {
        let Some(bounds) = bounds else {
            return false;
        };
        let (x, y) = bounds.center();
        let duration = self.reset_duration;

        self.animations.start(
            AnimatedProperty::CameraX,
            Tween::new(self.center.x, x as f32, now, duration),
        );
        self.animations.start(
            AnimatedProperty::CameraY,
            Tween::new(self.center.y, y as f32, now, duration),
        );
        self.animations.start(
            AnimatedProperty::Zoom,
            Tween::new(self.zoom, self.bounds.min, now, duration),
        );
        true
    }

    /// Advance animations; returns whether any are still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        for (property, value) in self.animations.tick(now) {
            match property {
                AnimatedProperty::CameraX => {
                    self.center.x = value;
                    self.target.x = value;
                }
                AnimatedProperty::CameraY => {
                    self.center.y = value;
                    self.target.y = value;
                }
                AnimatedProperty::Zoom => self.zoom = self.bounds.clamp(value),
            }
        }
        self.animations.is_active()
    }
}
