use crate::constants::{CAMERA_Z, POINTER_RANGE, RESIZE_THROTTLE_MS};
use crate::scheduler::elapsed_between;
use glam::Vec3;
use instant::Instant;
use std::time::Duration;

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Backing-store size for a given pixel ratio.
    #[inline]
    pub fn physical(&self, pixel_ratio: f32) -> (u32, u32) {
        let r = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        (
            ((self.width as f32 * r) as u32).max(1),
            ((self.height as f32 * r) as u32).max(1),
        )
    }
}

/// Centered, scaled mapping of a cursor position to a camera target.
#[inline]
pub fn pointer_target(x: f32, y: f32, viewport: Viewport) -> Vec3 {
    let nx = (x / viewport.width as f32) * 2.0 - 1.0;
    let ny = (y / viewport.height as f32) * 2.0 - 1.0;
    let cap = |v: f32| {
        if v.is_finite() {
            (v * POINTER_RANGE).clamp(-POINTER_RANGE, POINTER_RANGE)
        } else {
            0.0
        }
    };
    Vec3::new(cap(nx), -cap(ny), CAMERA_Z)
}

/// Pointer and viewport state written by the delegated window listeners and
/// read by the frame tick.
#[derive(Clone, Debug)]
pub struct InputTracker {
    viewport: Viewport,
    target: Vec3,
    pending_resize: Option<Viewport>,
    last_resize_at: Option<Instant>,
    throttle: Duration,
}

impl InputTracker {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            target: Vec3::new(0.0, 0.0, CAMERA_Z),
            pending_resize: None,
            last_resize_at: None,
            throttle: Duration::from_millis(RESIZE_THROTTLE_MS),
        }
    }

    /// Maps against the newest known size, even if its resize is still
    /// waiting on the throttle.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let viewport = self.pending_resize.unwrap_or(self.viewport);
        self.target = pointer_target(x, y, viewport);
    }

    /// Record a new viewport size; applied by [`InputTracker::poll_resize`].
    pub fn resized(&mut self, width: u32, height: u32) {
        self.pending_resize = Some(Viewport::new(width, height));
    }

    /// Apply the latest pending resize unless one was applied less than the
    /// throttle interval ago. The pending size is kept until it can be applied.
    pub fn poll_resize(&mut self, now: Instant) -> Option<Viewport> {
        let pending = self.pending_resize?;
        if let Some(last) = self.last_resize_at {
            if elapsed_between(last, now) < self.throttle {
                return None;
            }
        }
        self.pending_resize = None;
        self.last_resize_at = Some(now);
        if pending == self.viewport {
            return None;
        }
        self.viewport = pending;
        Some(pending)
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending_resize.is_some()
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }
}
