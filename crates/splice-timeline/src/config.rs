//! Editor configuration.
//!
//! Every field has a default, so a host may supply a partial JSON document
//! and only override what it cares about.

use serde::{Deserialize, Serialize};
use splice_core::{FrameRate, SpliceError};

use crate::track::TrackKind;

/// Tunables for an [`EditorStore`](crate::EditorStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
    /// Snap distance in screen pixels, converted to time by the zoom level.
    pub snap_threshold_px: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Pixels per second for new viewports.
    pub default_zoom: f64,
    /// Multiplier applied by zoom in / zoom out.
    pub zoom_step: f64,
    pub video_track_height: f32,
    pub audio_track_height: f32,
    pub image_track_height: f32,
    pub default_project_duration: f64,
    pub default_frame_rate: FrameRate,
    pub default_sample_rate: u32,
    /// Length given to still images dropped onto the timeline.
    pub default_image_duration: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            snap_threshold_px: 10.0,
            min_zoom: 10.0,
            max_zoom: 500.0,
            default_zoom: 100.0,
            zoom_step: 1.25,
            video_track_height: 80.0,
            audio_track_height: 60.0,
            image_track_height: 80.0,
            default_project_duration: 60.0,
            default_frame_rate: FrameRate::FPS_30,
            default_sample_rate: 48_000,
            default_image_duration: 5.0,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> splice_core::Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SpliceError::Config(format!("Invalid editor config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would break the engine's clamping rules.
    pub fn validate(&self) -> splice_core::Result<()> {
        if self.history_depth == 0 {
            return Err(SpliceError::Config("history_depth must be at least 1".into()));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(SpliceError::Config(format!(
                "zoom bounds [{}, {}] are not a positive range",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step > 1.0) {
            return Err(SpliceError::Config("zoom_step must be greater than 1".into()));
        }
        if !self.default_frame_rate.is_valid() {
            return Err(SpliceError::Config("default_frame_rate must be positive".into()));
        }
        if !(self.snap_threshold_px >= 0.0) {
            return Err(SpliceError::Config("snap_threshold_px must not be negative".into()));
        }
        if !(self.default_image_duration > 0.0) {
            return Err(SpliceError::Config(
                "default_image_duration must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Initial lane height for a new track of `kind`.
    pub fn track_height(&self, kind: TrackKind) -> f32 {
        match kind {
            TrackKind::Video => self.video_track_height,
            TrackKind::Audio => self.audio_track_height,
            TrackKind::Image => self.image_track_height,
        }
    }
}
