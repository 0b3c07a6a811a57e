// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Property tweens advanced from the frame callback.
//!
//! Each tween is keyed by the property it drives. Starting a tween on a
//! property replaces (cancels) whatever was running on it.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimatedProperty {
    CameraX,
    CameraY,
    Zoom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub start: f32,
    pub end: f32,
    pub started_at: Instant,
    pub duration: Duration,
}

impl Tween {
    pub fn new(start: f32, end: f32, started_at: Instant, duration: Duration) -> Self {
        Self {
            start,
            end,
            started_at,
            duration,
        }
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            // exact landing, no float drift
            return self.end;
        }
        self.start + (self.end - self.start) * ease_out_quad(progress)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Animations {
    tweens: BTreeMap<AnimatedProperty, Tween>,
}

impl Animations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, property: AnimatedProperty, tween: Tween) {
        if self.tweens.insert(property, tween).is_some() {
            log::debug!("Cancelled in-flight {property:?} animation");
        }
    }

    pub fn cancel(&mut self, property: AnimatedProperty) {
        if self.tweens.remove(&property).is_some() {
            log::debug!("Cancelled {property:?} animation");
        }
    }

    pub fn cancel_all(&mut self) {
        self.tweens.clear();
    }

    pub fn is_running(&self, property: AnimatedProperty) -> bool {
        self.tweens.contains_key(&property)
    }

    pub fn is_active(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Current value of every running tween; finished tweens report their end
    /// value once and are dropped.
    pub fn tick(&mut self, now: Instant) -> Vec<(AnimatedProperty, f32)> {
        let values = self
            .tweens
            .iter()
            .map(|(property, tween)| (*property, tween.value_at(now)))
            .collect();
        self.tweens.retain(|_, tween| !tween.is_finished(now));
        values
    }
}
