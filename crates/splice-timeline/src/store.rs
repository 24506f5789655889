//! The editor store: one value owning the project and all editing state.
//!
//! Every method that changes the project snapshots project and selection
//! first and records a history entry only if the edit succeeds. During a drag (`begin_drag` .. `end_drag`) the
//! edits are applied as a live preview and recorded as a single entry.

use splice_core::{FrameRate, SpliceError};
use uuid::Uuid;

use crate::clip::{AssetDescriptor, Clip, ClipDraft, ClipUpdate, Transition, TransitionEdge};
use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::edit::EditError;
use crate::history::HistoryManager;
use crate::playback::{PlaybackState, TickOutcome};
use crate::project::{ClipHit, Project};
use crate::selection::Selection;
use crate::snapping::SnappingEngine;
use crate::track::{Track, TrackKind, TrackUpdate};
use crate::viewport::Viewport;
use smallvec::SmallVec;

/// State captured by each history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub project: Project,
    pub selection: Selection,
}

/// Owns a project together with its playback, viewport, selection,
/// clipboard and undo history.
#[derive(Debug, Clone)]
pub struct EditorStore {
    config: EditorConfig,
    project: Project,
    playback: PlaybackState,
    viewport: Viewport,
    selection: Selection,
    clipboard: Clipboard,
    history: HistoryManager<Snapshot>,
    snapping: SnappingEngine,
    /// Set once an edit succeeds inside the open drag.
    drag_dirty: bool,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorStore {
    /// A store with default settings and an empty project.
    pub fn new() -> Self {
        Self::build(EditorConfig::default())
    }

    /// A store using `config`, which is validated first.
    pub fn with_config(config: EditorConfig) -> splice_core::Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EditorConfig) -> Self {
        let project = Self::blank_project("Untitled Project", &config);
        Self {
            playback: PlaybackState::new(),
            viewport: Viewport::new(&config),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            history: HistoryManager::new(config.history_depth),
            snapping: SnappingEngine::new(config.snap_threshold_px),
            drag_dirty: false,
            project,
            config,
        }
    }

    fn blank_project(name: &str, config: &EditorConfig) -> Project {
        Project::with_settings(
            name,
            config.default_project_duration,
            config.default_frame_rate,
            config.default_sample_rate,
        )
    }

    // ── Project lifecycle ───────────────────────────────────────

    /// Replace the current project with a fresh empty one.
    pub fn create_project(&mut self, name: &str) -> Uuid {
        let project = Self::blank_project(name, &self.config);
        let id = project.id;
        self.replace_project(project);
        id
    }

    /// Replace the current project with one supplied from outside.
    /// The project is validated first; an invalid one leaves the store as is.
    pub fn load_project(&mut self, project: Project) -> splice_core::Result<()> {
        project.validate()?;
        self.replace_project(project);
        Ok(())
    }

    /// Change frame rate and sample rate. Not an undoable edit.
    pub fn set_project_settings(&mut self, frame_rate: FrameRate, sample_rate: u32) -> splice_core::Result<()> {
        if !frame_rate.is_valid() {
            return Err(SpliceError::InvalidProject(format!(
                "frame rate {} is not positive",
                frame_rate
            )));
        }
        self.project.frame_rate = frame_rate;
        self.project.sample_rate = sample_rate;
        Ok(())
    }

    fn replace_project(&mut self, project: Project) {
        tracing::debug!(id = %project.id, name = %project.name, "Project opened");
        self.project = project;
        self.playback = PlaybackState::new();
        self.viewport.set_scroll_left(0.0, self.project.duration);
        self.selection.clear();
        self.clipboard.clear();
        self.history.clear();
        self.drag_dirty = false;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn history(&self) -> &HistoryManager<Snapshot> {
        &self.history
    }

    pub fn snapping(&self) -> &SnappingEngine {
        &self.snapping
    }

    /// Snap toggles and distance can be changed freely by the host.
    pub fn snapping_mut(&mut self) -> &mut SnappingEngine {
        &mut self.snapping
    }

    // ── Commit plumbing ─────────────────────────────────────────

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            project: self.project.clone(),
            selection: self.selection.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.project = snapshot.project;
        self.selection = snapshot.selection;
        self.settle();
    }

    /// Re-establish cross-component invariants after the project changed.
    fn settle(&mut self) {
        self.selection.retain_existing(&self.project);
        self.playback.clamp_to_duration(self.project.duration);
        self.viewport
            .set_scroll_left(self.viewport.scroll_left, self.project.duration);
    }

    /// Snapshot for a new history entry, or `None` while a drag is open
    /// (the drag already holds its starting state).
    fn before_edit(&self) -> Option<Snapshot> {
        (!self.history.is_batching()).then(|| self.snapshot())
    }

    fn record(&mut self, label: &str, before: Option<Snapshot>) {
        match before {
            Some(before) => self.history.push(label, before),
            None => self.drag_dirty = true,
        }
        self.settle();
        tracing::debug!(label, "Edit committed");
    }

    /// Run `edit` as one undoable action.
    fn commit<T>(
        &mut self,
        label: &str,
        edit: impl FnOnce(&mut Self) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let before = self.before_edit();
        match edit(self) {
            Ok(value) => {
                self.record(label, before);
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(label, %err, "Edit rejected");
                Err(err)
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn get_track_by_id(&self, track_id: Uuid) -> Option<&Track> {
        self.project.track(track_id)
    }

    pub fn get_clip_by_id(&self, clip_id: Uuid) -> Option<&Clip> {
        self.project.clip(clip_id)
    }

    pub fn find_clip(&self, clip_id: Uuid) -> Option<ClipHit<'_>> {
        self.project.find_clip(clip_id)
    }

    pub fn get_clips_at_time(&self, time: f64) -> SmallVec<[ClipHit<'_>; 4]> {
        self.project.clips_at_time(time)
    }

    // ── Tracks ──────────────────────────────────────────────────

    /// Append a track; see [`Project::add_track`] for naming.
    pub fn add_track(&mut self, kind: TrackKind, name: Option<&str>) -> Uuid {
        let height = self.config.track_height(kind);
        let before = self.before_edit();
        let id = self.project.add_track(kind, name, height);
        self.record("Add track", before);
        id
    }

    pub fn remove_track(&mut self, track_id: Uuid) -> Result<(), EditError> {
        self.commit("Remove track", |s| s.project.remove_track(track_id).map(drop))
    }

    pub fn reorder_track(&mut self, track_id: Uuid, new_index: usize) -> Result<usize, EditError> {
        self.commit("Reorder track", |s| s.project.reorder_track(track_id, new_index))
    }

    pub fn update_track(&mut self, track_id: Uuid, update: &TrackUpdate) -> Result<(), EditError> {
        self.commit("Update track", |s| s.project.update_track(track_id, update))
    }

    fn toggle_track(
        &mut self,
        track_id: Uuid,
        label: &str,
        flip: impl FnOnce(&Track) -> TrackUpdate,
    ) -> bool {
        let Some(track) = self.project.track(track_id) else {
            return false;
        };
        let update = flip(track);
        self.commit(label, |s| s.project.update_track(track_id, &update))
            .is_ok()
    }

    pub fn toggle_track_mute(&mut self, track_id: Uuid) -> bool {
        self.toggle_track(track_id, "Toggle mute", |t| TrackUpdate {
            muted: Some(!t.muted),
            ..Default::default()
        })
    }

    pub fn toggle_track_solo(&mut self, track_id: Uuid) -> bool {
        self.toggle_track(track_id, "Toggle solo", |t| TrackUpdate {
            solo: Some(!t.solo),
            ..Default::default()
        })
    }

    pub fn toggle_track_lock(&mut self, track_id: Uuid) -> bool {
        self.toggle_track(track_id, "Toggle lock", |t| TrackUpdate {
            locked: Some(!t.locked),
            ..Default::default()
        })
    }

    pub fn toggle_track_visibility(&mut self, track_id: Uuid) -> bool {
        self.toggle_track(track_id, "Toggle visibility", |t| TrackUpdate {
            visible: Some(!t.visible),
            ..Default::default()
        })
    }

    // ── Clips ───────────────────────────────────────────────────

    pub fn add_clip(&mut self, track_id: Uuid, draft: ClipDraft) -> Result<Uuid, EditError> {
        self.commit("Add clip", |s| s.project.add_clip(track_id, draft))
    }

    /// Build a clip from a probed asset and place it on `track_id`.
    pub fn add_asset_clip(
        &mut self,
        track_id: Uuid,
        asset: &AssetDescriptor,
        start_time: f64,
    ) -> Result<Uuid, EditError> {
        let draft = ClipDraft::from_asset(asset, start_time, &self.config)
            .map_err(|e| EditError::UnsupportedMedia(e.to_string()))?;
        self.add_clip(track_id, draft)
    }

    pub fn remove_clip(&mut self, track_id: Uuid, clip_id: Uuid) -> Result<(), EditError> {
        self.commit("Delete clip", |s| s.project.remove_clip(track_id, clip_id).map(drop))
    }

    /// Delete every selected clip that can be removed, as one step.
    /// Returns how many were deleted.
    pub fn remove_selected_clips(&mut self) -> usize {
        let targets: Vec<(Uuid, Uuid)> = self
            .selection
            .selected_clip_ids()
            .iter()
            .filter_map(|id| self.project.find_clip(*id))
            .map(|hit| (hit.track.id, hit.clip.id))
            .collect();

        let before = self.before_edit();
        let mut removed = 0;
        for (track_id, clip_id) in targets {
            match self.project.remove_clip(track_id, clip_id) {
                Ok(_) => removed += 1,
                Err(err) => tracing::debug!(%err, "Selected clip kept"),
            }
        }
        if removed > 0 {
            self.record("Delete clips", before);
        }
        removed
    }

    pub fn move_clip(
        &mut self,
        from_track: Uuid,
        clip_id: Uuid,
        to_track: Uuid,
        new_start: f64,
    ) -> Result<(), EditError> {
        self.commit("Move clip", |s| {
            s.project.move_clip(from_track, clip_id, to_track, new_start)
        })
    }

    pub fn trim_clip_start(&mut self, track_id: Uuid, clip_id: Uuid, new_start: f64) -> Result<(), EditError> {
        self.commit("Trim clip", |s| s.project.trim_clip_start(track_id, clip_id, new_start))
    }

    pub fn trim_clip_end(&mut self, track_id: Uuid, clip_id: Uuid, new_end: f64) -> Result<(), EditError> {
        self.commit("Trim clip", |s| s.project.trim_clip_end(track_id, clip_id, new_end))
    }

    pub fn split_clip(&mut self, track_id: Uuid, clip_id: Uuid, at: f64) -> Result<Uuid, EditError> {
        self.commit("Split clip", |s| s.project.split_clip(track_id, clip_id, at))
    }

    /// Duplicate a clip right after itself and select the copy.
    pub fn duplicate_clip(&mut self, track_id: Uuid, clip_id: Uuid) -> Result<Uuid, EditError> {
        self.commit("Duplicate clip", |s| {
            let id = s.project.duplicate_clip(track_id, clip_id)?;
            s.selection.select_clip(id, false);
            Ok(id)
        })
    }

    pub fn update_clip(&mut self, track_id: Uuid, clip_id: Uuid, update: &ClipUpdate) -> Result<(), EditError> {
        self.commit("Update clip", |s| s.project.update_clip(track_id, clip_id, update))
    }

    pub fn set_clip_transition(
        &mut self,
        track_id: Uuid,
        clip_id: Uuid,
        edge: TransitionEdge,
        transition: Option<Transition>,
    ) -> Result<(), EditError> {
        self.commit("Set transition", |s| {
            s.project.set_clip_transition(track_id, clip_id, edge, transition)
        })
    }

    // ── Markers and duration ────────────────────────────────────

    pub fn add_marker(&mut self, time: f64, name: &str, color: &str) -> Uuid {
        let before = self.before_edit();
        let id = self.project.add_marker(time, name, color);
        self.record("Add marker", before);
        id
    }

    pub fn remove_marker(&mut self, marker_id: Uuid) -> Result<(), EditError> {
        self.commit("Remove marker", |s| s.project.remove_marker(marker_id).map(drop))
    }

    pub fn move_marker(&mut self, marker_id: Uuid, time: f64) -> Result<(), EditError> {
        self.commit("Move marker", |s| s.project.move_marker(marker_id, time))
    }

    /// Set the timeline length (never below the end of the content).
    pub fn set_project_duration(&mut self, duration: f64) -> f64 {
        let before = self.before_edit();
        let applied = self.project.set_duration(duration);
        self.record("Set duration", before);
        applied
    }

    // ── Snapping ────────────────────────────────────────────────

    /// Snap a candidate time against frames, clip edges, the playhead and
    /// (optionally) markers, using the current zoom for the threshold.
    pub fn get_snapped_time(&self, candidate: f64, exclude_clip: Option<Uuid>) -> f64 {
        self.snapping.snap_time(
            candidate,
            &self.project,
            self.playback.playhead_position,
            self.viewport.pixels_per_second,
            exclude_clip,
        )
    }

    /// Snap a dragged clip by its leading edge, falling back to its trailing edge.
    pub fn snap_clip_start(&self, start: f64, duration: f64, exclude_clip: Option<Uuid>) -> f64 {
        self.snapping.snap_clip_start(
            start,
            duration,
            &self.project,
            self.playback.playhead_position,
            self.viewport.pixels_per_second,
            exclude_clip,
        )
    }

    // ── Playback ────────────────────────────────────────────────

    pub fn play(&mut self) {
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle_playback(&mut self) {
        self.playback.toggle_playback();
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    /// Move the playhead, clamped into `[0, duration]`.
    pub fn seek(&mut self, time: f64) -> f64 {
        self.playback.seek(time, self.project.duration)
    }

    pub fn seek_relative(&mut self, delta: f64) -> f64 {
        self.playback.seek_relative(delta, self.project.duration)
    }

    /// Step the playhead by whole frames at the project frame rate.
    pub fn step_frame(&mut self, frames: i32) -> f64 {
        self.playback
            .step_frame(frames, self.project.frame_rate, self.project.duration)
    }

    pub fn set_loop_region(&mut self, start: f64, end: f64) -> Result<(), EditError> {
        self.playback
            .set_loop_region(start, end, self.project.duration)
    }

    pub fn toggle_loop(&mut self) -> bool {
        self.playback.toggle_loop()
    }

    pub fn clear_loop_region(&mut self) {
        self.playback.clear_loop_region();
    }

    /// Per-frame driver for the host's playback loop: advances the playhead
    /// by `delta` seconds, wrapping at the loop end and pausing at the end
    /// of the timeline. Does nothing while paused.
    pub fn advance_playback(&mut self, delta: f64) -> TickOutcome {
        if !self.playback.is_playing {
            return TickOutcome {
                position: self.playback.playhead_position,
                wrapped: false,
                reached_end: false,
            };
        }
        let outcome = self.playback.next_tick(delta, self.project.duration);
        self.seek(outcome.position);
        if outcome.reached_end {
            self.playback.pause();
        }
        outcome
    }

    // ── Viewport ────────────────────────────────────────────────

    pub fn set_zoom(&mut self, pixels_per_second: f64) -> f64 {
        self.viewport.set_zoom(pixels_per_second, self.project.duration)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.viewport.zoom_in(self.project.duration)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.viewport.zoom_out(self.project.duration)
    }

    pub fn set_scroll_left(&mut self, scroll_left: f64) -> f64 {
        self.viewport.set_scroll_left(scroll_left, self.project.duration)
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport.set_viewport_width(width, self.project.duration);
    }

    pub fn scroll_to_time(&mut self, time: f64) -> f64 {
        self.viewport.scroll_to_time(time, self.project.duration)
    }

    /// Fit the whole project into the container width.
    pub fn zoom_to_fit(&mut self) -> f64 {
        self.viewport.zoom_to_fit(self.project.duration)
    }

    pub fn time_to_pixels(&self, time: f64) -> f64 {
        self.viewport.time_to_pixels(time)
    }

    pub fn pixels_to_time(&self, x: f64) -> f64 {
        self.viewport.pixels_to_time(x)
    }

    // ── Selection ───────────────────────────────────────────────

    /// Select an existing clip. Returns `false` for unknown ids.
    pub fn select_clip(&mut self, clip_id: Uuid, additive: bool) -> bool {
        if self.project.find_clip(clip_id).is_none() {
            return false;
        }
        self.selection.select_clip(clip_id, additive);
        true
    }

    pub fn deselect_clip(&mut self, clip_id: Uuid) -> bool {
        self.selection.deselect_clip(clip_id)
    }

    pub fn select_all_clips(&mut self) {
        self.selection.select_all_clips(&self.project);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select a track (or none). Returns `false` for unknown ids.
    pub fn select_track(&mut self, track_id: Option<Uuid>) -> bool {
        if track_id.is_some_and(|id| self.project.track(id).is_none()) {
            return false;
        }
        self.selection.select_track(track_id);
        true
    }

    pub fn set_time_selection(&mut self, range: Option<(f64, f64)>) {
        self.selection.set_time_selection(range);
    }

    // ── Clipboard ───────────────────────────────────────────────

    pub fn copy_selected_clips(&mut self) -> usize {
        self.clipboard
            .copy(&self.project, self.selection.selected_clip_ids())
    }

    /// Cut is deferred: the clips stay until the next paste lands.
    pub fn cut_selected_clips(&mut self) -> usize {
        self.clipboard
            .cut(&self.project, self.selection.selected_clip_ids())
    }

    /// Paste at the playhead and select the pasted clips.
    pub fn paste_clips(&mut self) -> Result<Vec<Uuid>, EditError> {
        self.commit("Paste", |s| {
            let ids = s.clipboard.paste(
                &mut s.project,
                s.playback.playhead_position,
                s.selection.selected_track_id(),
            )?;
            s.selection.set_clips(ids.iter().copied());
            Ok(ids)
        })
    }

    pub fn has_clips(&self) -> bool {
        self.clipboard.has_clips()
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard.clear();
    }

    // ── History ─────────────────────────────────────────────────

    /// Undo the last action. An open drag is closed (and recorded if it
    /// changed anything) first, so its preview edits are what gets undone.
    pub fn undo(&mut self) -> bool {
        self.close_open_drag();
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.close_open_drag();
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    fn close_open_drag(&mut self) {
        if self.history.is_batching() {
            tracing::debug!("Closing open drag before undo/redo");
            self.end_drag();
        }
        self.drag_dirty = false;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    /// Start an interactive drag. Edits until `end_drag` are a live preview
    /// and become one history entry. Returns `false` if a drag is already open.
    pub fn begin_drag(&mut self, label: &str) -> bool {
        let before = self.snapshot();
        let started = self.history.begin_batch(label, before);
        if started {
            self.drag_dirty = false;
        }
        started
    }

    /// Finish the drag. Returns whether a history entry was recorded
    /// (a drag that changed nothing records none).
    pub fn end_drag(&mut self) -> bool {
        let changed = std::mem::take(&mut self.drag_dirty);
        self.history.end_batch(changed)
    }

    /// Abort the drag and restore the state from before it began.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag_dirty = false;
        match self.history.cancel_batch() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.history.is_batching()
    }
}
