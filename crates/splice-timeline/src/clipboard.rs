//! Copy, cut and paste of clips.
//!
//! A cut only marks its clips; they are removed when the paste lands, so a
//! cut that is never pasted changes nothing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::ClipDraft;
use crate::edit::EditError;
use crate::project::Project;
use crate::track::TrackKind;

/// One copied clip, positioned relative to the earliest clip of the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardEntry {
    pub draft: ClipDraft,
    pub track_kind: TrackKind,
    pub relative_start_time: f64,
    /// Track the clip was copied from; preferred as the paste target.
    pub source_track_id: Uuid,
    pub source_clip_id: Uuid,
}

/// A clip recorded by a cut, removed once the paste succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutSource {
    pub track_id: Uuid,
    pub clip_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clipboard {
    entries: Vec<ClipboardEntry>,
    cut_sources: Vec<CutSource>,
    is_cut: bool,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ClipboardEntry] {
        &self.entries
    }

    pub fn has_clips(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn is_cut(&self) -> bool {
        self.is_cut
    }

    pub fn cut_sources(&self) -> &[CutSource] {
        &self.cut_sources
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cut_sources.clear();
        self.is_cut = false;
    }

    /// Replace the contents with copies of the given clips. Unknown ids are
    /// skipped; if none of them exist the clipboard is left alone. Copies
    /// are stored unlocked. Returns the number of clips copied.
    pub fn copy<'a>(&mut self, project: &Project, clip_ids: impl IntoIterator<Item = &'a Uuid>) -> usize {
        let mut hits: Vec<_> = clip_ids
            .into_iter()
            .filter_map(|id| project.find_clip(*id))
            .collect();
        if hits.is_empty() {
            return 0;
        }
        hits.sort_by(|a, b| a.clip.start_time.total_cmp(&b.clip.start_time));
        let origin = hits[0].clip.start_time;

        self.entries = hits
            .iter()
            .map(|hit| {
                let mut draft = hit.clip.to_draft();
                draft.locked = false;
                ClipboardEntry {
                    draft,
                    track_kind: hit.track.kind,
                    relative_start_time: hit.clip.start_time - origin,
                    source_track_id: hit.track.id,
                    source_clip_id: hit.clip.id,
                }
            })
            .collect();
        self.cut_sources.clear();
        self.is_cut = false;
        tracing::debug!(count = self.entries.len(), "Clips copied");
        self.entries.len()
    }

    /// Like [`copy`](Self::copy), but also records the originals for removal
    /// on the next paste. Locked clips and clips on locked tracks cannot be
    /// removed, so they are left out of the cut entirely.
    pub fn cut<'a>(&mut self, project: &Project, clip_ids: impl IntoIterator<Item = &'a Uuid>) -> usize {
        let movable: Vec<Uuid> = clip_ids
            .into_iter()
            .filter(|id| {
                project
                    .find_clip(**id)
                    .is_some_and(|hit| !hit.clip.locked && !hit.track.locked)
            })
            .copied()
            .collect();
        let count = self.copy(project, &movable);
        if count == 0 {
            return 0;
        }
        self.cut_sources = self
            .entries
            .iter()
            .map(|entry| CutSource {
                track_id: entry.source_track_id,
                clip_id: entry.source_clip_id,
            })
            .collect();
        self.is_cut = true;
        count
    }

    /// Paste every entry at `playhead + relative_start_time`.
    ///
    /// Each entry goes to its source track if that still exists, is unlocked
    /// and has the right kind; otherwise to `selected_track` if it fits;
    /// otherwise to the first unlocked track of the right kind. Entries that
    /// cannot be placed are skipped. For a cut, the originals are removed
    /// first so they do not block their own paste; an original whose entry
    /// is skipped, or that got locked since the cut, stays where it was.
    ///
    /// All or nothing: if no entry lands, `project` is untouched and
    /// `NothingToPaste` is returned. Returns the ids of the new clips.
    pub fn paste(
        &mut self,
        project: &mut Project,
        playhead: f64,
        selected_track: Option<Uuid>,
    ) -> Result<Vec<Uuid>, EditError> {
        if self.entries.is_empty() {
            return Err(EditError::NothingToPaste);
        }

        // Cut originals that stay in place; their entries are not pasted.
        let mut kept: HashSet<Uuid> = self
            .cut_sources
            .iter()
            .filter(|source| {
                project.track(source.track_id).is_some_and(|track| {
                    track.locked
                        || track
                            .find_clip(source.clip_id)
                            .is_some_and(|(_, clip)| clip.locked)
                })
            })
            .map(|source| source.clip_id)
            .collect();

        // Keeping an original only adds obstacles, so each round can only
        // skip more entries and this settles within `entries.len()` rounds.
        loop {
            let mut working = project.clone();
            if self.is_cut {
                for source in self.cut_sources.iter().filter(|s| !kept.contains(&s.clip_id)) {
                    if let Err(err) = working.remove_clip(source.track_id, source.clip_id) {
                        tracing::debug!(%err, "Cut source already gone");
                    }
                }
            }

            let attempts: Vec<&ClipboardEntry> = self
                .entries
                .iter()
                .filter(|e| !kept.contains(&e.source_clip_id))
                .collect();
            let mut pasted = Vec::with_capacity(attempts.len());
            let mut newly_kept = false;
            for entry in attempts {
                if let Some(id) = place_entry(&mut working, entry, playhead, selected_track) {
                    pasted.push(id);
                } else if self.is_cut
                    && self.cut_sources.iter().any(|s| s.clip_id == entry.source_clip_id)
                {
                    kept.insert(entry.source_clip_id);
                    newly_kept = true;
                }
            }
            if newly_kept {
                continue;
            }

            if pasted.is_empty() {
                return Err(EditError::NothingToPaste);
            }
            *project = working;
            if self.is_cut {
                self.cut_sources.clear();
                self.is_cut = false;
            }
            tracing::debug!(count = pasted.len(), kept = kept.len(), "Clips pasted");
            return Ok(pasted);
        }
    }
}

fn place_entry(
    project: &mut Project,
    entry: &ClipboardEntry,
    playhead: f64,
    selected_track: Option<Uuid>,
) -> Option<Uuid> {
    let Some(track_id) = paste_target(project, entry, selected_track) else {
        tracing::debug!(kind = %entry.track_kind, "No track to paste onto");
        return None;
    };
    let mut draft = entry.draft.clone();
    draft.start_time = playhead + entry.relative_start_time;
    match project.add_clip(track_id, draft) {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::debug!(%err, "Clipboard entry skipped");
            None
        }
    }
}

fn paste_target(project: &Project, entry: &ClipboardEntry, selected_track: Option<Uuid>) -> Option<Uuid> {
    let fits = |id: Uuid| {
        project
            .track(id)
            .is_some_and(|t| !t.locked && t.kind == entry.track_kind)
    };
    if fits(entry.source_track_id) {
        return Some(entry.source_track_id);
    }
    if let Some(id) = selected_track.filter(|id| fits(*id)) {
        return Some(id);
    }
    project
        .tracks
        .iter()
        .find(|t| !t.locked && t.kind == entry.track_kind)
        .map(|t| t.id)
}
