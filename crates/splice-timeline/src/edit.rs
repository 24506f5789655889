//! Edit operations on a [`Project`].
//!
//! Every operation validates first and mutates second: an `Err` return
//! guarantees the project is exactly as it was. Numeric input is clamped
//! rather than rejected so that interactive drags stay forgiving.

use splice_core::{sanitize_time, TimeRange, MIN_CLIP_DURATION, TIME_EPSILON};
use thiserror::Error;
use uuid::Uuid;

use crate::clip::{Clip, ClipDraft, ClipUpdate, Transition, TransitionEdge};
use crate::project::{Marker, Project};
use crate::track::{Track, TrackKind, TrackUpdate};

/// Why an edit was refused. The project is untouched whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("track {0} not found")]
    TrackNotFound(Uuid),

    #[error("clip {0} not found")]
    ClipNotFound(Uuid),

    #[error("marker {0} not found")]
    MarkerNotFound(Uuid),

    #[error("track {0} is locked")]
    TrackLocked(Uuid),

    #[error("clip {0} is locked")]
    ClipLocked(Uuid),

    #[error("{clip} clip cannot be placed on a {track} track")]
    TypeMismatch { clip: TrackKind, track: TrackKind },

    #[error("range {start:.3}s..{end:.3}s overlaps clip {other}")]
    Overlap { start: f64, end: f64, other: Uuid },

    #[error("split point {at:.3}s is not inside clip {clip}")]
    SplitOutsideClip { clip: Uuid, at: f64 },

    #[error("range {start:.3}s..{end:.3}s is shorter than the minimum duration")]
    RangeTooShort { start: f64, end: f64 },

    #[error("nothing to paste")]
    NothingToPaste,

    #[error("unsupported media: {0}")]
    UnsupportedMedia(String),
}

fn overlap_error(range: TimeRange, other: &Clip) -> EditError {
    EditError::Overlap {
        start: range.start,
        end: range.end(),
        other: other.id,
    }
}

// ── Lookup helpers ──────────────────────────────────────────────

impl Project {
    fn track_or_err(&self, track_id: Uuid) -> Result<&Track, EditError> {
        self.track(track_id)
            .ok_or(EditError::TrackNotFound(track_id))
    }

    /// A track that exists and accepts edits.
    fn editable_track(&self, track_id: Uuid) -> Result<&Track, EditError> {
        let track = self.track_or_err(track_id)?;
        if track.locked {
            return Err(EditError::TrackLocked(track_id));
        }
        Ok(track)
    }

    /// A clip whose geometry may change: its track is unlocked and it is
    /// not locked itself.
    fn editable_clip(&self, track_id: Uuid, clip_id: Uuid) -> Result<(&Track, &Clip), EditError> {
        let track = self.editable_track(track_id)?;
        let (_, clip) = track
            .find_clip(clip_id)
            .ok_or(EditError::ClipNotFound(clip_id))?;
        if clip.locked {
            return Err(EditError::ClipLocked(clip_id));
        }
        Ok((track, clip))
    }

    /// Apply `f` to a clip that has already been validated.
    fn with_clip_mut(&mut self, track_id: Uuid, clip_id: Uuid, f: impl FnOnce(&mut Clip)) {
        if let Some((_, clip)) = self
            .track_mut(track_id)
            .and_then(|track| track.find_clip_mut(clip_id))
        {
            f(clip);
        }
    }

    fn finish_edit(&mut self) {
        self.fit_duration_to_content();
        self.touch();
    }
}

// ── Track operations ────────────────────────────────────────────

impl Project {
    /// Append a track. Without an explicit name it is called "{Type} {n}",
    /// where n is one more than the number of existing tracks of that kind.
    pub fn add_track(&mut self, kind: TrackKind, name: Option<&str>, height: f32) -> Uuid {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                let n = self.tracks.iter().filter(|t| t.kind == kind).count() + 1;
                format!("{} {}", kind.label(), n)
            }
        };
        let track = Track::new(kind, name, height);
        let id = track.id;
        self.tracks.push(track);
        self.touch();
        id
    }

    /// Remove a track together with all of its clips.
    pub fn remove_track(&mut self, track_id: Uuid) -> Result<Track, EditError> {
        let index = self
            .track_index(track_id)
            .ok_or(EditError::TrackNotFound(track_id))?;
        let removed = self.tracks.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Move a track to `new_index`, clamped into the valid range.
    /// Returns the index the track ended up at.
    pub fn reorder_track(&mut self, track_id: Uuid, new_index: usize) -> Result<usize, EditError> {
        let index = self
            .track_index(track_id)
            .ok_or(EditError::TrackNotFound(track_id))?;
        let target = new_index.min(self.tracks.len() - 1);
        if target != index {
            let track = self.tracks.remove(index);
            self.tracks.insert(target, track);
            self.touch();
        }
        Ok(target)
    }

    /// Merge the given fields into a track.
    pub fn update_track(&mut self, track_id: Uuid, update: &TrackUpdate) -> Result<(), EditError> {
        let track = self
            .track_mut(track_id)
            .ok_or(EditError::TrackNotFound(track_id))?;
        update.apply(track);
        self.touch();
        Ok(())
    }
}

// ── Clip operations ─────────────────────────────────────────────

impl Project {
    /// Place a new clip on a track.
    ///
    /// Fails if the track is locked, the clip kind does not match the
    /// track, or the clip's range overlaps an existing clip.
    pub fn add_clip(&mut self, track_id: Uuid, draft: ClipDraft) -> Result<Uuid, EditError> {
        let draft = draft.normalized();
        let track = self.editable_track(track_id)?;
        if draft.kind.track_kind() != track.kind {
            return Err(EditError::TypeMismatch {
                clip: draft.kind.track_kind(),
                track: track.kind,
            });
        }
        let range = TimeRange::new(draft.start_time, draft.duration);
        if let Some(other) = track.first_overlap(range, None) {
            return Err(overlap_error(range, other));
        }

        let clip = Clip::from_draft(draft);
        let id = clip.id;
        if let Some(track) = self.track_mut(track_id) {
            track.insert_clip(clip);
        }
        self.finish_edit();
        Ok(id)
    }

    /// Delete a clip.
    pub fn remove_clip(&mut self, track_id: Uuid, clip_id: Uuid) -> Result<Clip, EditError> {
        self.editable_clip(track_id, clip_id)?;
        let removed = self
            .track_mut(track_id)
            .and_then(|track| track.remove_clip(clip_id))
            .ok_or(EditError::ClipNotFound(clip_id))?;
        self.touch();
        Ok(removed)
    }

    /// Relocate a clip to `new_start` on `to_track` (which may be the same track).
    ///
    /// Refused when the destination kind differs, either track is locked, or
    /// the destination range overlaps another clip.
    pub fn move_clip(
        &mut self,
        from_track: Uuid,
        clip_id: Uuid,
        to_track: Uuid,
        new_start: f64,
    ) -> Result<(), EditError> {
        let (_, clip) = self.editable_clip(from_track, clip_id)?;
        let clip_kind = clip.kind.track_kind();
        let duration = clip.duration;

        let target = self.editable_track(to_track)?;
        if clip_kind != target.kind {
            return Err(EditError::TypeMismatch {
                clip: clip_kind,
                track: target.kind,
            });
        }
        let new_start = sanitize_time(new_start);
        let range = TimeRange::new(new_start, duration);
        if let Some(other) = target.first_overlap(range, Some(clip_id)) {
            return Err(overlap_error(range, other));
        }

        if from_track == to_track {
            if let Some(track) = self.track_mut(from_track) {
                if let Some((_, clip)) = track.find_clip_mut(clip_id) {
                    clip.start_time = new_start;
                }
                track.sort_clips();
            }
        } else {
            let moved = self
                .track_mut(from_track)
                .and_then(|track| track.remove_clip(clip_id));
            if let (Some(mut clip), Some(track)) = (moved, self.track_mut(to_track)) {
                clip.start_time = new_start;
                track.insert_clip(clip);
            }
        }
        self.finish_edit();
        Ok(())
    }

    /// Move a clip's left edge. `start_time` and `in_point` shift by the same
    /// delta and the duration absorbs it, so the out point stays put.
    ///
    /// The new start is clamped so the clip keeps at least
    /// `MIN_CLIP_DURATION`, the in point never goes negative, and the edge
    /// never crosses the previous clip on the track.
    pub fn trim_clip_start(
        &mut self,
        track_id: Uuid,
        clip_id: Uuid,
        new_start: f64,
    ) -> Result<(), EditError> {
        let (track, clip) = self.editable_clip(track_id, clip_id)?;
        let min_start = (clip.start_time - clip.in_point)
            .max(track.previous_end(clip.start_time, Some(clip_id)))
            .max(0.0);
        let max_start = clip.end_time() - MIN_CLIP_DURATION;
        let new_start = if new_start.is_nan() {
            clip.start_time
        } else {
            new_start.max(min_start).min(max_start)
        };

        self.with_clip_mut(track_id, clip_id, |clip| {
            let delta = new_start - clip.start_time;
            clip.start_time = new_start;
            clip.in_point = (clip.in_point + delta).max(0.0);
            clip.duration = clip.out_point - clip.in_point;
            clip.fade_in = clip.fade_in.map(|f| f.min(clip.duration));
            clip.fade_out = clip.fade_out.map(|f| f.min(clip.duration));
        });
        if let Some(track) = self.track_mut(track_id) {
            track.sort_clips();
        }
        self.finish_edit();
        Ok(())
    }

    /// Move a clip's right edge to `new_end`.
    ///
    /// Clamped so the clip keeps at least `MIN_CLIP_DURATION`, the out point
    /// stays within the source, and the edge never crosses the next clip.
    pub fn trim_clip_end(
        &mut self,
        track_id: Uuid,
        clip_id: Uuid,
        new_end: f64,
    ) -> Result<(), EditError> {
        let (track, clip) = self.editable_clip(track_id, clip_id)?;
        let source_end = clip.start_time + (clip.source_limit() - clip.in_point);
        let next_start = track
            .next_start(clip.end_time(), Some(clip_id))
            .unwrap_or(f64::INFINITY);
        let min_end = clip.start_time + MIN_CLIP_DURATION;
        let max_end = source_end.min(next_start).max(min_end);
        let new_end = if new_end.is_nan() {
            clip.end_time()
        } else {
            new_end.max(min_end).min(max_end)
        };

        self.with_clip_mut(track_id, clip_id, |clip| {
            clip.duration = new_end - clip.start_time;
            clip.sync_out_point();
        });
        self.finish_edit();
        Ok(())
    }

    /// Cut a clip in two at timeline time `at`.
    ///
    /// The original keeps the left part (and its fade-in / in-transition);
    /// the new clip covers `[at, original end)` with its in point advanced by
    /// the same amount and inherits the fade-out / out-transition. Both parts
    /// must be at least `MIN_CLIP_DURATION` long.
    pub fn split_clip(&mut self, track_id: Uuid, clip_id: Uuid, at: f64) -> Result<Uuid, EditError> {
        let (_, clip) = self.editable_clip(track_id, clip_id)?;
        let inside = at - clip.start_time >= MIN_CLIP_DURATION - TIME_EPSILON
            && clip.end_time() - at >= MIN_CLIP_DURATION - TIME_EPSILON;
        if !inside {
            return Err(EditError::SplitOutsideClip { clip: clip_id, at });
        }

        let offset = at - clip.start_time;
        let mut right = clip.to_draft();
        right.start_time = at;
        right.in_point = clip.in_point + offset;
        right.duration = clip.end_time() - at;
        right.out_point = clip.out_point;
        right.fade_in = None;
        right.fade_out = right.fade_out.map(|f| f.min(right.duration));
        right.transitions.incoming = None;
        let right = Clip::from_draft(right);
        let right_id = right.id;

        self.with_clip_mut(track_id, clip_id, |left| {
            left.duration = offset;
            left.out_point = left.in_point + offset;
            left.fade_out = None;
            left.transitions.outgoing = None;
            left.fade_in = left.fade_in.map(|f| f.min(left.duration));
        });
        if let Some(track) = self.track_mut(track_id) {
            track.insert_clip(right);
        }
        self.touch();
        Ok(right_id)
    }

    /// Insert a copy of a clip immediately after it. The copy starts unlocked.
    pub fn duplicate_clip(&mut self, track_id: Uuid, clip_id: Uuid) -> Result<Uuid, EditError> {
        let track = self.editable_track(track_id)?;
        let (_, clip) = track
            .find_clip(clip_id)
            .ok_or(EditError::ClipNotFound(clip_id))?;
        let mut draft = clip.to_draft();
        draft.start_time = clip.end_time();
        draft.locked = false;
        let range = TimeRange::new(draft.start_time, draft.duration);
        if let Some(other) = track.first_overlap(range, None) {
            return Err(overlap_error(range, other));
        }

        let copy = Clip::from_draft(draft);
        let id = copy.id;
        if let Some(track) = self.track_mut(track_id) {
            track.insert_clip(copy);
        }
        self.finish_edit();
        Ok(id)
    }

    /// Merge the given fields into a clip. Allowed on locked clips (so they
    /// can be unlocked) but not on locked tracks.
    pub fn update_clip(
        &mut self,
        track_id: Uuid,
        clip_id: Uuid,
        update: &ClipUpdate,
    ) -> Result<(), EditError> {
        self.editable_track(track_id)?
            .find_clip(clip_id)
            .ok_or(EditError::ClipNotFound(clip_id))?;
        self.with_clip_mut(track_id, clip_id, |clip| update.apply(clip));
        self.touch();
        Ok(())
    }

    /// Attach (or with `None`, remove) a transition on one edge of a clip.
    pub fn set_clip_transition(
        &mut self,
        track_id: Uuid,
        clip_id: Uuid,
        edge: TransitionEdge,
        transition: Option<Transition>,
    ) -> Result<(), EditError> {
        self.editable_clip(track_id, clip_id)?;
        let transition = transition.map(|t| Transition::new(t.kind, t.duration));
        self.with_clip_mut(track_id, clip_id, |clip| {
            clip.transitions.set(edge, transition);
        });
        self.touch();
        Ok(())
    }
}

// ── Markers and project length ─────────────────────────────────

impl Project {
    /// Add a marker; its time is clamped into `[0, duration]`.
    pub fn add_marker(&mut self, time: f64, name: impl Into<String>, color: impl Into<String>) -> Uuid {
        let marker = Marker {
            id: Uuid::new_v4(),
            time: sanitize_time(time).min(self.duration),
            name: name.into(),
            color: color.into(),
        };
        let id = marker.id;
        let index = self.markers.partition_point(|m| m.time <= marker.time);
        self.markers.insert(index, marker);
        self.touch();
        id
    }

    pub fn remove_marker(&mut self, marker_id: Uuid) -> Result<Marker, EditError> {
        let index = self
            .markers
            .iter()
            .position(|m| m.id == marker_id)
            .ok_or(EditError::MarkerNotFound(marker_id))?;
        let removed = self.markers.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Move a marker; its time is clamped into `[0, duration]`.
    pub fn move_marker(&mut self, marker_id: Uuid, time: f64) -> Result<(), EditError> {
        let time = sanitize_time(time).min(self.duration);
        let marker = self
            .markers
            .iter_mut()
            .find(|m| m.id == marker_id)
            .ok_or(EditError::MarkerNotFound(marker_id))?;
        marker.time = time;
        self.markers.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.touch();
        Ok(())
    }

    /// Set the timeline length. It never drops below the end of the content.
    /// Markers past the new end are pulled back onto it.
    pub fn set_duration(&mut self, duration: f64) -> f64 {
        self.duration = sanitize_time(duration).max(self.content_end());
        let end = self.duration;
        for marker in &mut self.markers {
            marker.time = marker.time.min(end);
        }
        self.touch();
        self.duration
    }
}
