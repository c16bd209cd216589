//! # Visibility Window
//!
//! In close-proximity (first-person) navigation only cells within a square
//! window around the camera are handed to the renderer. The window is
//! recentered on a fixed wall-clock interval rather than every frame. In
//! overview navigation the filter is disabled and every cell is eligible.

use std::time::{Duration, Instant};

use cgmath::Vector3;

/// Half-size of the window, in cells, along each floor axis.
pub const WINDOW_RADIUS_CELLS: f32 = 24.0;

/// Minimum time between two recenterings.
pub const RECENTER_INTERVAL: Duration = Duration::from_millis(250);

/// World-space extent of the window on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

pub fn window(camera_pos: Vector3<f32>, gap_x: f32, gap_z: f32, radius_cells: f32) -> WindowBounds {
    let reach_x = radius_cells * gap_x;
    let reach_z = radius_cells * gap_z;
    WindowBounds {
        min_x: camera_pos.x - reach_x,
        max_x: camera_pos.x + reach_x,
        min_z: camera_pos.z - reach_z,
        max_z: camera_pos.z + reach_z,
    }
}

/// `None` bounds means the filter is disabled.
pub fn in_window(x: f32, z: f32, bounds: Option<&WindowBounds>) -> bool {
    match bounds {
        None => true,
        Some(b) => x >= b.min_x && x <= b.max_x && z >= b.min_z && z <= b.max_z,
    }
}

/// Throttled window tracker.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    enabled: bool,
    bounds: Option<WindowBounds>,
    last_recenter: Option<Instant>,
    interval: Duration,
    radius_cells: f32,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityFilter {
    pub fn new() -> Self {
        Self {
            enabled: false,
            bounds: None,
            last_recenter: None,
            interval: RECENTER_INTERVAL,
            radius_cells: WINDOW_RADIUS_CELLS,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enabling forces a recenter on the next update.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        self.bounds = None;
        self.last_recenter = None;
        log::debug!("visibility window {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Recenters around `camera_pos` if the interval has elapsed.
    /// Returns whether the window moved.
    pub fn update(
        &mut self,
        now: Instant,
        camera_pos: Vector3<f32>,
        gap_x: f32,
        gap_z: f32,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let due = self
            .last_recenter
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if !due {
            return false;
        }
        self.bounds = Some(window(camera_pos, gap_x, gap_z, self.radius_cells));
        self.last_recenter = Some(now);
        true
    }

    /// Current window, `None` while disabled.
    pub fn bounds(&self) -> Option<WindowBounds> {
        if self.enabled {
            self.bounds
        } else {
            None
        }
    }

    pub fn is_visible(&self, position: Vector3<f32>) -> bool {
        in_window(position.x, position.z, self.bounds().as_ref())
    }
}
