//! Integration tests for copy / cut / paste through the store.

use splice_timeline::{ClipDraft, ClipUpdate, EditError, EditorStore, TrackKind};
use uuid::Uuid;

fn store_with_clip_at(start: f64) -> (EditorStore, Uuid, Uuid) {
    crate::init_tracing();
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    let clip = store
        .add_clip(track, ClipDraft::video("media/a.mp4", start, 2.0))
        .unwrap();
    (store, track, clip)
}

#[test]
fn cut_then_paste_at_playhead_moves_clip() {
    let (mut store, track, clip) = store_with_clip_at(5.0);
    store.select_clip(clip, false);
    assert_eq!(store.cut_selected_clips(), 1);
    // Cut is deferred
    assert!(store.get_clip_by_id(clip).is_some());

    store.seek(10.0);
    let pasted = store.paste_clips().unwrap();

    let clips = &store.get_track_by_id(track).unwrap().clips;
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].start_time, 10.0);
    assert!(store.get_clip_by_id(clip).is_none());
    assert_eq!(
        store.selection().selected_clip_ids().iter().copied().collect::<Vec<_>>(),
        pasted
    );
    assert!(!store.clipboard().is_cut());
}

#[test]
fn cut_paste_is_a_single_undo_step() {
    let (mut store, track, clip) = store_with_clip_at(5.0);
    store.select_clip(clip, false);
    store.cut_selected_clips();
    store.seek(10.0);
    store.paste_clips().unwrap();
    assert_eq!(store.undo_label(), Some("Paste"));

    store.undo();
    let clips = &store.get_track_by_id(track).unwrap().clips;
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].id, clip);
    assert_eq!(clips[0].start_time, 5.0);
}

#[test]
fn copy_paste_keeps_relative_layout_across_tracks() {
    let (mut store, video, a) = store_with_clip_at(1.0);
    let audio = store.add_track(TrackKind::Audio, None);
    let b = store.add_clip(audio, ClipDraft::audio("m.wav", 4.0, 1.0)).unwrap();
    store.select_clip(a, false);
    store.select_clip(b, true);
    assert_eq!(store.copy_selected_clips(), 2);

    store.seek(20.0);
    let pasted = store.paste_clips().unwrap();
    assert_eq!(pasted.len(), 2);

    let starts: Vec<(Uuid, f64)> = pasted
        .iter()
        .map(|id| {
            let hit = store.find_clip(*id).unwrap();
            (hit.track.id, hit.clip.start_time)
        })
        .collect();
    assert!(starts.contains(&(video, 20.0)));
    assert!(starts.contains(&(audio, 23.0)));
    // Originals untouched by a copy
    assert!(store.get_clip_by_id(a).is_some());
    assert!(store.get_clip_by_id(b).is_some());
}

#[test]
fn overlapping_entries_are_skipped_individually() {
    let (mut store, track, a) = store_with_clip_at(0.0);
    let b = store.add_clip(track, ClipDraft::video("b.mp4", 3.0, 2.0)).unwrap();
    store.add_clip(track, ClipDraft::video("wall.mp4", 13.0, 5.0)).unwrap();
    store.select_clip(a, false);
    store.select_clip(b, true);
    store.copy_selected_clips();

    // a lands at 10..12, b would land at 13..15 on top of the wall
    store.seek(10.0);
    let pasted = store.paste_clips().unwrap();
    assert_eq!(pasted.len(), 1);
    assert_eq!(store.get_clip_by_id(pasted[0]).unwrap().start_time, 10.0);
}

#[test]
fn paste_with_nothing_placeable_changes_nothing() {
    let (mut store, _, clip) = store_with_clip_at(5.0);
    store.select_clip(clip, false);
    store.copy_selected_clips();
    store.seek(5.5);
    let before = store.project().clone();
    let depth = store.history().undo_count();

    assert_eq!(store.paste_clips(), Err(EditError::NothingToPaste));
    assert_eq!(store.project(), &before);
    assert_eq!(store.history().undo_count(), depth);
}

#[test]
fn empty_clipboard_paste_is_noop() {
    let (mut store, _, _) = store_with_clip_at(0.0);
    assert!(!store.has_clips());
    assert_eq!(store.paste_clips(), Err(EditError::NothingToPaste));
    store.select_all_clips();
    store.copy_selected_clips();
    assert!(store.has_clips());
    store.clear_clipboard();
    assert!(!store.has_clips());
}

#[test]
fn paste_goes_to_selected_track_when_source_is_gone() {
    let (mut store, first, clip) = store_with_clip_at(0.0);
    let second = store.add_track(TrackKind::Video, None);
    store.select_clip(clip, false);
    store.copy_selected_clips();
    store.remove_track(first).unwrap();

    store.select_track(Some(second));
    let pasted = store.paste_clips().unwrap();
    assert_eq!(store.find_clip(pasted[0]).unwrap().track.id, second);
}

#[test]
fn locked_clip_cannot_be_cut() {
    let (mut store, track, clip) = store_with_clip_at(5.0);
    store
        .update_clip(track, clip, &ClipUpdate { locked: Some(true), ..Default::default() })
        .unwrap();
    store.select_clip(clip, false);
    assert_eq!(store.cut_selected_clips(), 0);
    assert!(!store.clipboard().is_cut());

    // A copy of it pastes unlocked
    assert_eq!(store.copy_selected_clips(), 1);
    store.seek(10.0);
    let pasted = store.paste_clips().unwrap();
    assert_eq!(store.get_track_by_id(track).unwrap().clips.len(), 2);
    assert!(store.get_clip_by_id(clip).unwrap().locked);
    assert!(!store.get_clip_by_id(pasted[0]).unwrap().locked);
}
