//! Project and marker types, plus the read-only query surface.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use splice_core::{FrameRate, SpliceError, TIME_EPSILON};
use uuid::Uuid;

use crate::clip::Clip;
use crate::track::Track;

/// A named point on the timeline ruler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    pub time: f64,
    pub name: String,
    pub color: String,
}

/// A clip together with the track it sits on.
#[derive(Debug, Clone, Copy)]
pub struct ClipHit<'a> {
    pub track: &'a Track,
    pub clip: &'a Clip,
}

/// A project: one timeline of ordered tracks plus its markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Timeline length in seconds; the playhead never leaves `[0, duration]`.
    pub duration: f64,
    pub frame_rate: FrameRate,
    pub sample_rate: u32,
    /// Tracks in display order (top first)
    pub tracks: Vec<Track>,
    pub markers: Vec<Marker>,
    /// Unix milliseconds
    pub created_at: u64,
    /// Unix milliseconds, bumped on every committed edit
    pub updated_at: u64,
}

impl Project {
    /// Create a new empty project with 60 seconds at 30 fps, 48 kHz.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, 60.0, FrameRate::FPS_30, 48_000)
    }

    /// Create a new empty project with explicit timing settings.
    pub fn with_settings(
        name: impl Into<String>,
        duration: f64,
        frame_rate: FrameRate,
        sample_rate: u32,
    ) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            duration: splice_core::sanitize_time(duration),
            frame_rate,
            sample_rate,
            tracks: Vec::new(),
            markers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn track(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: Uuid) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn track_index(&self, id: Uuid) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Locate a clip anywhere in the project.
    pub fn find_clip(&self, clip_id: Uuid) -> Option<ClipHit<'_>> {
        self.tracks.iter().find_map(|track| {
            track
                .find_clip(clip_id)
                .map(|(_, clip)| ClipHit { track, clip })
        })
    }

    pub fn clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.find_clip(clip_id).map(|hit| hit.clip)
    }

    /// Every clip whose range contains `time`, in track order.
    pub fn clips_at_time(&self, time: f64) -> SmallVec<[ClipHit<'_>; 4]> {
        self.tracks
            .iter()
            .flat_map(|track| {
                track
                    .clips
                    .iter()
                    .filter(move |clip| clip.range().contains(time))
                    .map(move |clip| ClipHit { track, clip })
            })
            .collect()
    }

    /// Iterate over every clip in the project.
    pub fn all_clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }

    /// End of the last clip on any track.
    pub fn content_end(&self) -> f64 {
        self.tracks.iter().map(Track::end_time).fold(0.0, f64::max)
    }

    pub fn marker(&self, id: Uuid) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Grow `duration` so it covers all clip content. Never shrinks.
    pub(crate) fn fit_duration_to_content(&mut self) {
        self.duration = self.duration.max(self.content_end());
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
    }

    /// Serialize to the camelCase JSON document shape.
    pub fn to_json(&self) -> splice_core::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SpliceError::Serialization(format!("Failed to serialize project: {}", e)))
    }

    /// Parse a JSON document and check its invariants before handing it out.
    pub fn from_json(json: &str) -> splice_core::Result<Self> {
        let project: Self = serde_json::from_str(json)
            .map_err(|e| SpliceError::Serialization(format!("Invalid project document: {}", e)))?;
        project.validate()?;
        Ok(project)
    }

    /// Check every structural invariant. Used when a project is handed in from
    /// outside (e.g., after deserialization).
    pub fn validate(&self) -> splice_core::Result<()> {
        if !self.frame_rate.is_valid() {
            return Err(SpliceError::InvalidProject(format!(
                "frame rate {}/{} is not positive",
                self.frame_rate.numerator, self.frame_rate.denominator
            )));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(SpliceError::InvalidProject(format!(
                "duration {} is not a valid length",
                self.duration
            )));
        }
        for track in &self.tracks {
            for clip in &track.clips {
                if clip.kind.track_kind() != track.kind {
                    return Err(SpliceError::InvalidProject(format!(
                        "{} clip {} sits on {} track {}",
                        clip.kind.track_kind(),
                        clip.id,
                        track.kind,
                        track.id
                    )));
                }
                let window_ok = clip.start_time >= 0.0
                    && clip.duration > 0.0
                    && clip.in_point >= 0.0
                    && clip.in_point < clip.out_point
                    && clip.out_point <= clip.source_limit() + TIME_EPSILON
                    && ((clip.out_point - clip.in_point) - clip.duration).abs() < 1e-6;
                if !window_ok {
                    return Err(SpliceError::InvalidProject(format!(
                        "clip {} has an invalid time window",
                        clip.id
                    )));
                }
            }
            for (i, a) in track.clips.iter().enumerate() {
                if let Some(b) = track.clips[i + 1..]
                    .iter()
                    .find(|b| a.range().overlaps(b.range()))
                {
                    return Err(SpliceError::InvalidProject(format!(
                        "clips {} and {} overlap on track {}",
                        a.id, b.id, track.id
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}

/// Current wall-clock time in unix milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
