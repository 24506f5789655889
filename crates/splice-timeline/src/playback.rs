//! Transport state: play/pause, playhead, loop region.
//!
//! Nothing here owns a timer. The host calls [`PlaybackState::next_tick`] (or
//! `EditorStore::advance_playback`) once per frame and seeks to the result.

use serde::{Deserialize, Serialize};
use splice_core::{FrameRate, MIN_CLIP_DURATION, TIME_EPSILON};

use crate::edit::EditError;

/// Result of advancing the playhead by one host tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Where the playhead should be after this tick.
    pub position: f64,
    /// The tick crossed the loop end and jumped back to the loop start.
    pub wrapped: bool,
    /// The tick hit the end of the timeline; playback should stop.
    pub reached_end: bool,
}

/// Playback state for the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Current playhead position in seconds, always within `[0, duration]`.
    pub playhead_position: f64,
    pub loop_enabled: bool,
    pub loop_start: f64,
    pub loop_end: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackState {
    /// Stopped at time zero with no loop region.
    pub fn new() -> Self {
        Self {
            is_playing: false,
            playhead_position: 0.0,
            loop_enabled: false,
            loop_start: 0.0,
            loop_end: 0.0,
        }
    }

    pub fn play(&mut self) {
        self.is_playing = true;
        tracing::debug!(time = self.playhead_position, "Playback started");
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
        tracing::debug!(time = self.playhead_position, "Playback paused");
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Stop and rewind to zero.
    pub fn stop(&mut self) {
        self.is_playing = false;
        self.playhead_position = 0.0;
        tracing::debug!("Playback stopped");
    }

    /// Not playing and parked at zero.
    pub fn is_stopped(&self) -> bool {
        !self.is_playing && self.playhead_position == 0.0
    }

    /// Move the playhead, clamped into `[0, duration]`. Returns the new position.
    pub fn seek(&mut self, time: f64, duration: f64) -> f64 {
        self.playhead_position = clamp_to(time, duration);
        self.playhead_position
    }

    pub fn seek_relative(&mut self, delta: f64, duration: f64) -> f64 {
        self.seek(self.playhead_position + delta, duration)
    }

    /// Step by whole frames (negative steps go backwards).
    pub fn step_frame(&mut self, frames: i32, frame_rate: FrameRate, duration: f64) -> f64 {
        let delta = f64::from(frames) * frame_rate.frame_duration_secs();
        self.seek_relative(delta, duration)
    }

    /// Set the loop region and enable looping. Bounds are ordered and clamped
    /// into the timeline; a region shorter than `MIN_CLIP_DURATION` is refused.
    pub fn set_loop_region(&mut self, start: f64, end: f64, duration: f64) -> Result<(), EditError> {
        let (a, b) = (clamp_to(start, duration), clamp_to(end, duration));
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        if end - start < MIN_CLIP_DURATION {
            return Err(EditError::RangeTooShort { start, end });
        }
        self.loop_start = start;
        self.loop_end = end;
        self.loop_enabled = true;
        tracing::debug!(start, end, "Loop region set");
        Ok(())
    }

    /// Flip looping on or off. Returns the new state.
    pub fn toggle_loop(&mut self) -> bool {
        self.loop_enabled = !self.loop_enabled;
        tracing::debug!(loop_enabled = self.loop_enabled, "Loop toggled");
        self.loop_enabled
    }

    pub fn clear_loop_region(&mut self) {
        self.loop_enabled = false;
        self.loop_start = 0.0;
        self.loop_end = 0.0;
    }

    /// Whether a usable loop region is set and enabled.
    pub fn has_active_loop(&self) -> bool {
        self.loop_enabled && self.loop_end - self.loop_start >= MIN_CLIP_DURATION
    }

    /// Pull the loop region back inside a (possibly shorter) timeline.
    pub(crate) fn clamp_to_duration(&mut self, duration: f64) {
        self.playhead_position = clamp_to(self.playhead_position, duration);
        self.loop_start = clamp_to(self.loop_start, duration);
        self.loop_end = clamp_to(self.loop_end, duration);
    }

    /// Compute where the playhead lands after `delta` seconds of playback.
    ///
    /// With an active loop, crossing `loop_end` from inside the region jumps
    /// back to `loop_start`. Otherwise the position stops at `duration`.
    /// Pure: the state is not modified.
    pub fn next_tick(&self, delta: f64, duration: f64) -> TickOutcome {
        let current = self.playhead_position;
        let next = current + delta.max(0.0);

        if self.has_active_loop()
            && current < self.loop_end - TIME_EPSILON
            && next >= self.loop_end - TIME_EPSILON
        {
            return TickOutcome {
                position: self.loop_start,
                wrapped: true,
                reached_end: false,
            };
        }

        let position = clamp_to(next, duration);
        TickOutcome {
            position,
            wrapped: false,
            reached_end: position >= duration - TIME_EPSILON,
        }
    }
}

fn clamp_to(time: f64, duration: f64) -> f64 {
    splice_core::sanitize_time(time).min(duration.max(0.0))
}
