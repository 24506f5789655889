//! Horizontal zoom and scroll of the timeline view.

use serde::{Deserialize, Serialize};
use splice_core::TimeRange;

use crate::config::EditorConfig;

/// Zoom (pixels per second) and horizontal scroll state.
///
/// Every setter re-clamps `scroll_left` against the current content length,
/// so the view can never scroll past the end of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub pixels_per_second: f64,
    pub scroll_left: f64,
    /// Width of the hosting container in pixels.
    pub viewport_width: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Viewport {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            pixels_per_second: config.default_zoom.clamp(config.min_zoom, config.max_zoom),
            scroll_left: 0.0,
            viewport_width: 0.0,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
        }
    }

    /// Furthest the view may scroll for a timeline of `duration` seconds.
    pub fn max_scroll(&self, duration: f64) -> f64 {
        (duration * self.pixels_per_second - self.viewport_width).max(0.0)
    }

    fn clamp_scroll(&mut self, duration: f64) {
        let max = self.max_scroll(duration);
        self.scroll_left = if self.scroll_left.is_nan() {
            0.0
        } else {
            self.scroll_left.clamp(0.0, max)
        };
    }

    /// Set the zoom, clamped to `[min_zoom, max_zoom]`. Returns the applied value.
    pub fn set_zoom(&mut self, pixels_per_second: f64, duration: f64) -> f64 {
        if pixels_per_second.is_nan() {
            return self.pixels_per_second;
        }
        self.pixels_per_second = pixels_per_second.clamp(self.min_zoom, self.max_zoom);
        self.clamp_scroll(duration);
        self.pixels_per_second
    }

    pub fn zoom_in(&mut self, duration: f64) -> f64 {
        self.set_zoom(self.pixels_per_second * self.zoom_step, duration)
    }

    pub fn zoom_out(&mut self, duration: f64) -> f64 {
        self.set_zoom(self.pixels_per_second / self.zoom_step, duration)
    }

    /// Set the scroll offset, clamped to `[0, max_scroll]`.
    pub fn set_scroll_left(&mut self, scroll_left: f64, duration: f64) -> f64 {
        self.scroll_left = scroll_left;
        self.clamp_scroll(duration);
        self.scroll_left
    }

    pub fn set_viewport_width(&mut self, width: f64, duration: f64) {
        self.viewport_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.clamp_scroll(duration);
    }

    /// Content-space x coordinate of a timeline time (scroll not applied).
    pub fn time_to_pixels(&self, time: f64) -> f64 {
        time * self.pixels_per_second
    }

    /// Timeline time at a content-space x coordinate.
    pub fn pixels_to_time(&self, x: f64) -> f64 {
        x / self.pixels_per_second
    }

    /// Span of time currently visible in the container.
    pub fn visible_range(&self) -> TimeRange {
        TimeRange::new(
            self.pixels_to_time(self.scroll_left),
            self.pixels_to_time(self.viewport_width),
        )
    }

    /// Scroll the minimum amount needed to bring `time` into view.
    pub fn scroll_to_time(&mut self, time: f64, duration: f64) -> f64 {
        let x = self.time_to_pixels(time);
        if x < self.scroll_left {
            self.scroll_left = x;
        } else if x > self.scroll_left + self.viewport_width {
            self.scroll_left = x - self.viewport_width;
        }
        self.clamp_scroll(duration);
        self.scroll_left
    }

    /// Choose the zoom that shows `duration` seconds across the container
    /// and scroll back to the start.
    pub fn zoom_to_fit(&mut self, duration: f64) -> f64 {
        if duration > 0.0 && self.viewport_width > 0.0 {
            self.set_zoom(self.viewport_width / duration, duration);
        }
        self.scroll_left = 0.0;
        self.pixels_per_second
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
