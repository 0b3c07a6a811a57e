// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use egui::{pos2, vec2};
use std::time::{Duration, Instant};

use wafer_defect_viewer::{
    BoundingBox, InteractionMode, PanDirection, ViewController, ViewerConfig,
};

const VIEWPORT_WIDTH: f32 = 1000.0;

fn create_view() -> ViewController {
    let mut view = ViewController::new(&ViewerConfig::default());
    view.update_bounds(VIEWPORT_WIDTH);
    view
}

fn wafer_bounds() -> BoundingBox {
    BoundingBox {
        min_x: -40.0,
        max_x: 60.0,
        min_y: -30.0,
        max_y: 10.0,
    }
}

#[test]
fn test_zoom_bounds_follow_viewport() {
    let view = create_view();
    let bounds = view.bounds();
    assert_eq!(bounds.min, 4.0);
    assert_eq!(bounds.max, 100.0); // 1000 / (5 * 2)
}

#[test]
fn test_show_dataset_snaps_without_animation() {
    let mut view = create_view();
    view.set_zoom(25.0);

    view.show_dataset(Some(&wafer_bounds()), Some(VIEWPORT_WIDTH));

    assert_eq!(view.center(), pos2(10.0, -10.0));
    assert_eq!(view.target(), pos2(10.0, -10.0));
    assert_eq!(view.zoom(), 25.0);
    assert!(!view.is_animating());
}

#[test]
fn test_show_dataset_clamps_zoom_to_new_viewport() {
    let mut view = create_view();
    view.set_zoom(90.0);

    view.show_dataset(Some(&wafer_bounds()), Some(400.0));

    assert_eq!(view.bounds().max, 40.0);
    assert_eq!(view.zoom(), 40.0);
}

#[test]
fn test_show_empty_dataset_keeps_camera() {
    let mut view = create_view();
    view.key_pan(PanDirection::Right);
    let before = view.center();

    view.show_dataset(None, Some(VIEWPORT_WIDTH));

    assert_eq!(view.center(), before);
}

#[test]
fn test_reset_view_lands_on_centroid_and_min_zoom() {
    let bounds = wafer_bounds();
    let t0 = Instant::now();

    for (zoom, pans) in [(4.0, 0), (37.5, 3), (100.0, 11)] {
        let mut view = create_view();
        view.set_zoom(zoom);
        for _ in 0..pans {
            view.key_pan(PanDirection::Up);
            view.key_pan(PanDirection::Left);
        }

        assert!(view.reset_view(Some(&bounds), t0));
        assert!(view.tick(t0 + Duration::from_millis(100)));
        assert!(view.tick(t0 + Duration::from_millis(400)));
        assert!(!view.tick(t0 + Duration::from_millis(500)));

        assert_eq!(view.zoom(), 4.0);
        assert_eq!(view.center(), pos2(10.0, -10.0));
        assert_eq!(view.target(), pos2(10.0, -10.0));
    }
}

#[test]
fn test_reset_view_eases_out() {
    let mut view = create_view();
    view.set_zoom(84.0);
    let t0 = Instant::now();
    view.reset_view(
        Some(&BoundingBox::from_point(0.0, 0.0)),
        t0,
    );

    // Halfway through, ease-out has covered three quarters of the way
    view.tick(t0 + Duration::from_millis(250));
    assert_eq!(view.zoom(), 24.0);
}

#[test]
fn test_reset_view_without_dataset_is_noop() {
    let mut view = create_view();
    view.set_zoom(12.0);
    assert!(!view.reset_view(None, Instant::now()));
    assert!(!view.is_animating());
    assert_eq!(view.zoom(), 12.0);
}

#[test]
fn test_second_reset_replaces_first() {
    let mut view = create_view();
    let t0 = Instant::now();
    view.reset_view(Some(&BoundingBox::from_point(50.0, 50.0)), t0);
    view.tick(t0 + Duration::from_millis(200));
    view.reset_view(
        Some(&BoundingBox::from_point(-5.0, 5.0)),
        t0 + Duration::from_millis(200),
    );

    view.tick(t0 + Duration::from_millis(800));
    assert_eq!(view.center(), pos2(-5.0, 5.0));
    assert!(!view.is_animating());
}

#[test]
fn test_slider_cancels_zoom_animation() {
    let mut view = create_view();
    view.set_zoom(50.0);
    let t0 = Instant::now();
    view.reset_view(Some(&wafer_bounds()), t0);

    view.set_zoom(30.0);
    view.tick(t0 + Duration::from_millis(600));

    assert_eq!(view.zoom(), 30.0);
    assert_eq!(view.center(), pos2(10.0, -10.0));
}

#[test]
fn test_zoom_never_leaves_bounds() {
    let mut view = create_view();
    let t0 = Instant::now();

    for level in [-3.0, 0.0, 2.0, 4.0, 55.5, 100.0, 250.0, f32::NAN] {
        view.set_zoom(level);
        assert!(view.bounds().contains(view.zoom()), "slider {level}");
    }

    for _ in 0..200 {
        view.wheel_zoom(1.0);
        assert!(view.bounds().contains(view.zoom()));
    }
    assert_eq!(view.zoom(), 100.0);

    for _ in 0..200 {
        view.wheel_zoom(-1.0);
        assert!(view.bounds().contains(view.zoom()));
    }
    assert_eq!(view.zoom(), 4.0);

    view.set_zoom(70.0);
    view.reset_view(Some(&wafer_bounds()), t0);
    for ms in (0..=600).step_by(16) {
        view.tick(t0 + Duration::from_millis(ms));
        assert!(view.bounds().contains(view.zoom()));
    }
}

#[test]
fn test_key_pan_is_constant_in_screen_space() {
    let mut view = create_view();

    view.set_zoom(4.0);
    view.key_pan(PanDirection::Right);
    assert_eq!(view.center(), pos2(5.0, 0.0));

    view.set_zoom(20.0);
    view.key_pan(PanDirection::Down);
    assert_eq!(view.center(), pos2(5.0, -1.0));
    assert_eq!(view.target(), view.center());
}

#[test]
fn test_drag_pan_follows_pointer() {
    let mut view = create_view();
    view.set_zoom(10.0);

    view.begin_pan();
    assert_eq!(view.mode(), InteractionMode::Panning);
    view.pan_by_screen_delta(vec2(50.0, 20.0));
    view.end_gesture();

    assert_eq!(view.mode(), InteractionMode::Idle);
    assert_eq!(view.center(), pos2(-5.0, 2.0));
}

#[test]
fn test_wheel_zoom_returns_to_idle() {
    let mut view = create_view();
    assert!(view.wheel_zoom(1.0));
    assert_eq!(view.mode(), InteractionMode::Idle);

    view.begin_pan();
    view.wheel_zoom(1.0);
    assert_eq!(view.mode(), InteractionMode::Panning);
}

#[test]
fn test_middle_drag_zoom_mode() {
    let mut view = create_view();
    view.set_zoom(10.0);

    view.begin_zoom();
    assert_eq!(view.mode(), InteractionMode::Zooming);
    assert!(view.drag_zoom(-30.0));
    assert!(view.zoom() > 10.0);
    view.end_gesture();
    assert_eq!(view.mode(), InteractionMode::Idle);
}

#[test]
fn test_slow_drag_zoom_accumulates() {
    let mut slow = create_view();
    for _ in 0..200 {
        slow.begin_zoom();
        slow.drag_zoom(-0.2);
        slow.end_gesture();
    }

    let mut fast = create_view();
    fast.drag_zoom(-40.0);

    assert!(slow.zoom() > 5.0);
    assert!((slow.zoom() - fast.zoom()).abs() < 1e-3);
}

#[test]
fn test_wheel_zoom_works_at_low_min_zoom() {
    let config = ViewerConfig::from_json_str(r#"{ "min_zoom": 0.05 }"#).unwrap();
    let mut view = ViewController::new(&config);
    view.update_bounds(VIEWPORT_WIDTH);
    assert_eq!(view.zoom(), 0.05);

    for _ in 0..20 {
        assert!(view.wheel_zoom(1.0));
    }
    let expected = 0.05 * 1.1f32.powi(20);
    assert!((view.zoom() - expected).abs() < 1e-3, "zoom {}", view.zoom());
}

#[test]
fn test_slider_ignores_sub_epsilon_changes() {
    let mut view = create_view();
    view.set_zoom(10.0);

    assert!(!view.reconcile_zoom(10.004));
    assert_eq!(view.zoom(), 10.0);
    assert!(view.reconcile_zoom(10.5));
    assert_eq!(view.zoom(), 10.5);
}
