//! Clip types for the timeline.

use serde::{Deserialize, Serialize};
use splice_core::{sanitize_duration, sanitize_time, SpliceError, MIN_CLIP_DURATION};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::track::TrackKind;

// ── Transitions ─────────────────────────────────────────────────

/// How two adjacent clips blend across their shared boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Cut,
    Crossfade,
    Dissolve,
}

/// A configured blend on one edge of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    /// Full length of the blend window, centered on the clip boundary.
    pub duration: f64,
}

impl Transition {
    /// Create a transition. Negative durations are floored at zero.
    pub fn new(kind: TransitionKind, duration: f64) -> Self {
        Self {
            kind,
            duration: sanitize_time(duration),
        }
    }
}

/// Which edge of a clip a transition is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionEdge {
    In,
    Out,
}

/// Transitions attached to the start (`in`) and end (`out`) of a clip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipTransitions {
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub incoming: Option<Transition>,
    #[serde(rename = "out", default, skip_serializing_if = "Option::is_none")]
    pub outgoing: Option<Transition>,
}

impl ClipTransitions {
    pub fn get(&self, edge: TransitionEdge) -> Option<Transition> {
        match edge {
            TransitionEdge::In => self.incoming,
            TransitionEdge::Out => self.outgoing,
        }
    }

    pub fn set(&mut self, edge: TransitionEdge, transition: Option<Transition>) {
        match edge {
            TransitionEdge::In => self.incoming = transition,
            TransitionEdge::Out => self.outgoing = transition,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.incoming.is_none() && self.outgoing.is_none()
    }
}

// ── Clip kind ───────────────────────────────────────────────────

/// Media type of a clip together with the fields only that type carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipKind {
    Video {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        opacity: Option<f64>,
    },
    Audio {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        volume: Option<f64>,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        opacity: Option<f64>,
    },
}

impl ClipKind {
    pub const VIDEO: Self = Self::Video { opacity: None };
    pub const AUDIO: Self = Self::Audio { volume: None };
    pub const IMAGE: Self = Self::Image { opacity: None };

    /// Default kind for clips living on a track of `kind`.
    pub fn for_track(kind: TrackKind) -> Self {
        match kind {
            TrackKind::Video => Self::VIDEO,
            TrackKind::Audio => Self::AUDIO,
            TrackKind::Image => Self::IMAGE,
        }
    }

    /// The track kind this clip may be placed on.
    pub fn track_kind(&self) -> TrackKind {
        match self {
            Self::Video { .. } => TrackKind::Video,
            Self::Audio { .. } => TrackKind::Audio,
            Self::Image { .. } => TrackKind::Image,
        }
    }

    /// Opacity for visual clips; always `None` for audio.
    pub fn opacity(&self) -> Option<f64> {
        match self {
            Self::Video { opacity } | Self::Image { opacity } => *opacity,
            Self::Audio { .. } => None,
        }
    }

    /// Volume for audio clips; always `None` for video and images.
    pub fn volume(&self) -> Option<f64> {
        match self {
            Self::Audio { volume } => *volume,
            Self::Video { .. } | Self::Image { .. } => None,
        }
    }

    /// Set opacity, clamped to [0, 1]. Ignored for audio clips.
    pub fn set_opacity(&mut self, value: f64) -> bool {
        match self {
            Self::Video { opacity } | Self::Image { opacity } => {
                *opacity = Some(clamp_unit(value));
                true
            }
            Self::Audio { .. } => false,
        }
    }

    /// Set volume, clamped to [0, 1]. Ignored for visual clips.
    pub fn set_volume(&mut self, value: f64) -> bool {
        match self {
            Self::Audio { volume } => {
                *volume = Some(clamp_unit(value));
                true
            }
            Self::Video { .. } | Self::Image { .. } => false,
        }
    }

    fn sanitized(self) -> Self {
        match self {
            Self::Video { opacity } => Self::Video {
                opacity: opacity.map(clamp_unit),
            },
            Self::Audio { volume } => Self::Audio {
                volume: volume.map(clamp_unit),
            },
            Self::Image { opacity } => Self::Image {
                opacity: opacity.map(clamp_unit),
            },
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn clamp_fade(fade: Option<f64>, duration: f64) -> Option<f64> {
    fade.filter(|f| *f > 0.0).map(|f| f.min(duration))
}

// ── Clip ────────────────────────────────────────────────────────

/// A clip on the timeline.
///
/// The visible range `[start_time, start_time + duration)` maps onto the
/// source segment `[in_point, out_point)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    #[serde(flatten)]
    pub kind: ClipKind,
    /// Reference to the source asset
    pub source_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Clip name (displayed in UI)
    pub name: String,
    pub start_time: f64,
    pub duration: f64,
    pub in_point: f64,
    pub out_point: f64,
    /// Length of the underlying media
    pub source_duration: f64,
    /// Playback speed (1.0 = normal)
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "ClipTransitions::is_empty")]
    pub transitions: ClipTransitions,
}

impl Clip {
    /// Materialize a draft with a fresh id.
    pub fn from_draft(draft: ClipDraft) -> Self {
        Self::with_id(Uuid::new_v4(), draft)
    }

    pub(crate) fn with_id(id: Uuid, draft: ClipDraft) -> Self {
        let ClipDraft {
            kind,
            source_ref,
            source_url,
            name,
            start_time,
            duration,
            in_point,
            out_point,
            source_duration,
            speed,
            fade_in,
            fade_out,
            color,
            locked,
            transitions,
        } = draft;
        Self {
            id,
            kind,
            source_ref,
            source_url,
            name,
            start_time,
            duration,
            in_point,
            out_point,
            source_duration,
            speed,
            fade_in,
            fade_out,
            color,
            locked,
            transitions,
        }
    }

    /// Everything but the id.
    pub fn to_draft(&self) -> ClipDraft {
        ClipDraft {
            kind: self.kind,
            source_ref: self.source_ref.clone(),
            source_url: self.source_url.clone(),
            name: self.name.clone(),
            start_time: self.start_time,
            duration: self.duration,
            in_point: self.in_point,
            out_point: self.out_point,
            source_duration: self.source_duration,
            speed: self.speed,
            fade_in: self.fade_in,
            fade_out: self.fade_out,
            color: self.color.clone(),
            locked: self.locked,
            transitions: self.transitions,
        }
    }

    /// End time on the timeline (exclusive).
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Timeline range occupied by this clip.
    #[inline]
    pub fn range(&self) -> splice_core::TimeRange {
        splice_core::TimeRange::new(self.start_time, self.duration)
    }

    /// Upper bound for `out_point`. Still images can be held indefinitely.
    pub fn source_limit(&self) -> f64 {
        match self.kind {
            ClipKind::Image { .. } => f64::INFINITY,
            _ => self.source_duration,
        }
    }

    pub fn opacity(&self) -> Option<f64> {
        self.kind.opacity()
    }

    pub fn volume(&self) -> Option<f64> {
        self.kind.volume()
    }

    /// Re-derive `out_point` from `in_point + duration` and grow the
    /// recorded source length of stills to cover it.
    pub(crate) fn sync_out_point(&mut self) {
        self.out_point = self.in_point + self.duration;
        if matches!(self.kind, ClipKind::Image { .. }) && self.out_point > self.source_duration {
            self.source_duration = self.out_point;
        }
        self.fade_in = clamp_fade(self.fade_in, self.duration);
        self.fade_out = clamp_fade(self.fade_out, self.duration);
    }
}

// ── Clip draft ──────────────────────────────────────────────────

/// All clip fields except the id: the input to `add_clip` and the payload
/// stored on the clipboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipDraft {
    #[serde(flatten)]
    pub kind: ClipKind,
    pub source_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub name: String,
    pub start_time: f64,
    pub duration: f64,
    pub in_point: f64,
    pub out_point: f64,
    pub source_duration: f64,
    pub speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "ClipTransitions::is_empty")]
    pub transitions: ClipTransitions,
}

impl ClipDraft {
    /// A draft covering the whole source, which is assumed to be exactly
    /// `duration` long.
    pub fn new(kind: ClipKind, source_ref: impl Into<String>, start_time: f64, duration: f64) -> Self {
        let source_ref = source_ref.into();
        Self {
            kind,
            name: source_ref.clone(),
            source_ref,
            source_url: None,
            start_time,
            duration,
            in_point: 0.0,
            out_point: duration,
            source_duration: duration,
            speed: 1.0,
            fade_in: None,
            fade_out: None,
            color: None,
            locked: false,
            transitions: ClipTransitions::default(),
        }
    }

    pub fn video(source_ref: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self::new(ClipKind::VIDEO, source_ref, start_time, duration)
    }

    pub fn audio(source_ref: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self::new(ClipKind::AUDIO, source_ref, start_time, duration)
    }

    pub fn image(source_ref: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self::new(ClipKind::IMAGE, source_ref, start_time, duration)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Place the visible window at `in_point` inside a source of the given length.
    pub fn with_source(mut self, in_point: f64, source_duration: f64) -> Self {
        self.in_point = in_point;
        self.out_point = in_point + self.duration;
        self.source_duration = source_duration;
        self
    }

    pub fn with_fades(mut self, fade_in: Option<f64>, fade_out: Option<f64>) -> Self {
        self.fade_in = fade_in;
        self.fade_out = fade_out;
        self
    }

    pub fn with_transitions(mut self, transitions: ClipTransitions) -> Self {
        self.transitions = transitions;
        self
    }

    /// Build a draft from an asset handed over by the media browser.
    ///
    /// The clip kind follows the MIME prefix of `content_type`. Stills use
    /// the configured default duration; time-based media need a measured one.
    pub fn from_asset(
        asset: &AssetDescriptor,
        start_time: f64,
        config: &EditorConfig,
    ) -> splice_core::Result<Self> {
        let mime = asset.content_type.to_ascii_lowercase();
        let kind = if mime.starts_with("video/") {
            ClipKind::VIDEO
        } else if mime.starts_with("audio/") {
            ClipKind::AUDIO
        } else if mime.starts_with("image/") {
            ClipKind::IMAGE
        } else {
            return Err(SpliceError::UnsupportedMedia(format!(
                "{} has unsupported content type {:?}",
                asset.name, asset.content_type
            )));
        };

        let duration = match kind {
            ClipKind::Image { .. } => config.default_image_duration,
            _ => match asset.measured_duration {
                Some(d) if d.is_finite() && d > 0.0 => d,
                _ => {
                    return Err(SpliceError::UnsupportedMedia(format!(
                        "{} has no measured duration",
                        asset.name
                    )))
                }
            },
        };

        let mut draft = Self::new(kind, asset.name.clone(), start_time, duration);
        draft.source_url = Some(asset.url.clone());
        Ok(draft)
    }

    /// Clamp every numeric field into its valid range.
    ///
    /// Start times are floored at zero, durations at `MIN_CLIP_DURATION`, and
    /// the in/out window is fitted inside the source. A missing or
    /// non-positive source length is taken to be exactly the requested window.
    pub(crate) fn normalized(mut self) -> Self {
        self.kind = self.kind.sanitized();
        self.start_time = sanitize_time(self.start_time);
        self.duration = sanitize_duration(self.duration);
        self.in_point = sanitize_time(self.in_point);

        let is_still = matches!(self.kind, ClipKind::Image { .. });
        let known_source = self.source_duration.is_finite() && self.source_duration > 0.0;
        if is_still || !known_source {
            self.source_duration = self
                .source_duration
                .max(self.in_point + self.duration)
                .max(MIN_CLIP_DURATION);
            if !self.source_duration.is_finite() {
                self.source_duration = self.in_point + self.duration;
            }
        } else {
            self.source_duration = self.source_duration.max(MIN_CLIP_DURATION);
            self.in_point = self.in_point.min(self.source_duration - MIN_CLIP_DURATION);
            self.duration = self
                .duration
                .min(self.source_duration - self.in_point)
                .max(MIN_CLIP_DURATION);
        }
        self.out_point = self.in_point + self.duration;

        if !(self.speed.is_finite() && self.speed > 0.0) {
            self.speed = 1.0;
        }
        self.fade_in = clamp_fade(self.fade_in, self.duration);
        self.fade_out = clamp_fade(self.fade_out, self.duration);
        for edge in [TransitionEdge::In, TransitionEdge::Out] {
            if let Some(t) = self.transitions.get(edge) {
                self.transitions
                    .set(edge, Some(Transition::new(t.kind, t.duration)));
            }
        }
        self
    }
}

/// Field merge for [`Clip`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipUpdate {
    pub name: Option<String>,
    /// An empty string clears the color.
    pub color: Option<String>,
    pub speed: Option<f64>,
    pub locked: Option<bool>,
    /// Zero or less removes the fade.
    pub fade_in: Option<f64>,
    pub fade_out: Option<f64>,
    pub opacity: Option<f64>,
    pub volume: Option<f64>,
}

impl ClipUpdate {
    pub(crate) fn apply(&self, clip: &mut Clip) {
        if let Some(name) = &self.name {
            clip.name = name.clone();
        }
        if let Some(color) = &self.color {
            clip.color = (!color.is_empty()).then(|| color.clone());
        }
        if let Some(speed) = self.speed.filter(|s| s.is_finite() && *s > 0.0) {
            clip.speed = speed;
        }
        if let Some(locked) = self.locked {
            clip.locked = locked;
        }
        if let Some(fade) = self.fade_in {
            clip.fade_in = clamp_fade(Some(fade), clip.duration);
        }
        if let Some(fade) = self.fade_out {
            clip.fade_out = clamp_fade(Some(fade), clip.duration);
        }
        if let Some(opacity) = self.opacity {
            clip.kind.set_opacity(opacity);
        }
        if let Some(volume) = self.volume {
            clip.kind.set_volume(volume);
        }
    }
}

/// Media descriptor handed over by the asset browser once probing is done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    pub name: String,
    pub content_type: String,
    pub url: String,
    /// Probed media length in seconds, if the media is time-based.
    #[serde(default)]
    pub measured_duration: Option<f64>,
}
