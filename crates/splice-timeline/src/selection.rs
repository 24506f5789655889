//! Clip, track and time-range selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use splice_core::TimeRange;
use uuid::Uuid;

use crate::project::Project;

/// What the user currently has selected. Captured in every history snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    selected_clip_ids: BTreeSet<Uuid>,
    selected_track_id: Option<Uuid>,
    time_range: Option<TimeRange>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a clip. Without `additive`, the previous clip selection is replaced.
    pub fn select_clip(&mut self, clip_id: Uuid, additive: bool) {
        if !additive {
            self.selected_clip_ids.clear();
        }
        self.selected_clip_ids.insert(clip_id);
    }

    pub fn deselect_clip(&mut self, clip_id: Uuid) -> bool {
        self.selected_clip_ids.remove(&clip_id)
    }

    /// Replace the clip selection with exactly `ids`.
    pub fn set_clips(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.selected_clip_ids = ids.into_iter().collect();
    }

    /// Select every clip in the project.
    pub fn select_all_clips(&mut self, project: &Project) {
        self.set_clips(project.all_clips().map(|c| c.id));
    }

    pub fn select_track(&mut self, track_id: Option<Uuid>) {
        self.selected_track_id = track_id;
    }

    /// Set (or with `None`, clear) the time-range selection. Bounds may come
    /// in either order.
    pub fn set_time_selection(&mut self, range: Option<(f64, f64)>) {
        self.time_range = range.map(|(a, b)| TimeRange::from_start_end(a, b));
    }

    /// Clear clips, track and time range.
    pub fn clear(&mut self) {
        self.selected_clip_ids.clear();
        self.selected_track_id = None;
        self.time_range = None;
    }

    pub fn selected_clip_ids(&self) -> &BTreeSet<Uuid> {
        &self.selected_clip_ids
    }

    pub fn selected_track_id(&self) -> Option<Uuid> {
        self.selected_track_id
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        self.time_range
    }

    pub fn is_clip_selected(&self, clip_id: Uuid) -> bool {
        self.selected_clip_ids.contains(&clip_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_clip_ids.is_empty()
            && self.selected_track_id.is_none()
            && self.time_range.is_none()
    }

    /// Drop references to clips and tracks that no longer exist.
    pub fn retain_existing(&mut self, project: &Project) {
        self.selected_clip_ids
            .retain(|id| project.find_clip(*id).is_some());
        if let Some(track_id) = self.selected_track_id {
            if project.track(track_id).is_none() {
                self.selected_track_id = None;
            }
        }
    }
}
