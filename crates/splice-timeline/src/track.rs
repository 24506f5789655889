//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use splice_core::{TimeRange, TIME_EPSILON};
use std::fmt;
use uuid::Uuid;

use crate::clip::Clip;

/// Smallest height a track lane may be given, in pixels.
pub const MIN_TRACK_HEIGHT: f32 = 20.0;

/// Kind of track. Clips may only live on a track of their own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Image,
}

impl TrackKind {
    /// Display label used for auto-generated track names.
    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
            TrackKind::Image => "Image",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A track containing non-overlapping clips, ordered by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track kind
    #[serde(rename = "type")]
    pub kind: TrackKind,
    /// Track name
    pub name: String,
    /// Lane height in pixels
    pub height: f32,
    pub muted: bool,
    pub solo: bool,
    /// Is track locked (prevent edits)
    pub locked: bool,
    pub visible: bool,
    pub clips: Vec<Clip>,
}

impl Track {
    /// Create an empty, unlocked, visible track.
    pub fn new(kind: TrackKind, name: impl Into<String>, height: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            height: height.max(MIN_TRACK_HEIGHT),
            muted: false,
            solo: false,
            locked: false,
            visible: true,
            clips: Vec::new(),
        }
    }

    /// Create a new video track.
    pub fn new_video(name: impl Into<String>) -> Self {
        Self::new(TrackKind::Video, name, 80.0)
    }

    /// Create a new audio track.
    pub fn new_audio(name: impl Into<String>) -> Self {
        Self::new(TrackKind::Audio, name, 60.0)
    }

    /// Create a new image track.
    pub fn new_image(name: impl Into<String>) -> Self {
        Self::new(TrackKind::Image, name, 80.0)
    }

    /// End of the last clip, or zero for an empty track.
    pub fn end_time(&self) -> f64 {
        self.clips.iter().map(Clip::end_time).fold(0.0, f64::max)
    }

    /// Find a clip by UUID. Returns (index, &Clip).
    pub fn find_clip(&self, id: Uuid) -> Option<(usize, &Clip)> {
        self.clips.iter().enumerate().find(|(_, clip)| clip.id == id)
    }

    /// Find a clip mutably by UUID. Returns (index, &mut Clip).
    pub fn find_clip_mut(&mut self, id: Uuid) -> Option<(usize, &mut Clip)> {
        self.clips
            .iter_mut()
            .enumerate()
            .find(|(_, clip)| clip.id == id)
    }

    /// First clip overlapping `range`, ignoring `exclude`.
    pub fn first_overlap(&self, range: TimeRange, exclude: Option<Uuid>) -> Option<&Clip> {
        self.clips
            .iter()
            .filter(|clip| Some(clip.id) != exclude)
            .find(|clip| clip.range().overlaps(range))
    }

    /// End of the nearest clip that ends at or before `time`, or zero.
    pub fn previous_end(&self, time: f64, exclude: Option<Uuid>) -> f64 {
        self.clips
            .iter()
            .filter(|clip| Some(clip.id) != exclude)
            .map(Clip::end_time)
            .filter(|end| *end <= time + TIME_EPSILON)
            .fold(0.0, f64::max)
    }

    /// Start of the nearest clip that starts at or after `time`.
    pub fn next_start(&self, time: f64, exclude: Option<Uuid>) -> Option<f64> {
        self.clips
            .iter()
            .filter(|clip| Some(clip.id) != exclude)
            .map(|clip| clip.start_time)
            .filter(|start| *start + TIME_EPSILON >= time)
            .reduce(f64::min)
    }

    /// Insert a clip keeping the list ordered by start time.
    pub fn insert_clip(&mut self, clip: Clip) {
        let index = self
            .clips
            .partition_point(|existing| existing.start_time <= clip.start_time);
        self.clips.insert(index, clip);
    }

    /// Remove a clip by UUID. Returns the removed clip.
    pub fn remove_clip(&mut self, id: Uuid) -> Option<Clip> {
        let (index, _) = self.find_clip(id)?;
        Some(self.clips.remove(index))
    }

    /// Restore start-time ordering after a clip was moved in place.
    pub fn sort_clips(&mut self) {
        self.clips
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    }

    /// Number of clips in this track.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }
}

/// Field merge for [`Track`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackUpdate {
    pub name: Option<String>,
    pub height: Option<f32>,
    pub muted: Option<bool>,
    pub solo: Option<bool>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
}

impl TrackUpdate {
    pub(crate) fn apply(&self, track: &mut Track) {
        if let Some(name) = &self.name {
            track.name = name.clone();
        }
        if let Some(height) = self.height.filter(|h| h.is_finite()) {
            track.height = height.max(MIN_TRACK_HEIGHT);
        }
        if let Some(muted) = self.muted {
            track.muted = muted;
        }
        if let Some(solo) = self.solo {
            track.solo = solo;
        }
        if let Some(locked) = self.locked {
            track.locked = locked;
        }
        if let Some(visible) = self.visible {
            track.visible = visible;
        }
    }
}
