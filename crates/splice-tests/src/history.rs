//! Integration tests for undo/redo and drag batching.

use splice_timeline::{ClipDraft, EditorConfig, EditorStore, Project, TrackKind};

#[test]
fn undo_redo_walks_through_every_step() {
    crate::init_tracing();
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    let clip = store.add_clip(track, ClipDraft::video("a.mp4", 0.0, 10.0)).unwrap();
    store.trim_clip_start(track, clip, 2.0).unwrap();
    let second = store.split_clip(track, clip, 6.0).unwrap();

    assert_eq!(store.undo_label(), Some("Split clip"));
    assert!(store.undo());
    assert!(store.get_clip_by_id(second).is_none());
    assert_eq!(store.get_clip_by_id(clip).unwrap().duration, 8.0);

    assert!(store.undo());
    assert_eq!(store.get_clip_by_id(clip).unwrap().start_time, 0.0);
    assert_eq!(store.redo_label(), Some("Trim clip"));

    assert!(store.redo());
    assert!(store.redo());
    assert!(store.get_clip_by_id(second).is_some());
    assert!(!store.redo());
}

#[test]
fn new_edit_discards_redo() {
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Audio, None);
    store.add_clip(track, ClipDraft::audio("a.wav", 0.0, 1.0)).unwrap();
    store.undo();
    assert!(store.can_redo());
    store.add_track(TrackKind::Audio, None);
    assert!(!store.can_redo());
}

#[test]
fn history_depth_is_capped() {
    let config = EditorConfig {
        history_depth: 5,
        ..EditorConfig::default()
    };
    let mut store = EditorStore::with_config(config).unwrap();
    for _ in 0..12 {
        store.add_track(TrackKind::Video, None);
    }
    assert_eq!(store.history().undo_count(), 5);
    while store.undo() {}
    assert_eq!(store.project().tracks.len(), 7);
}

#[test]
fn drag_preview_commits_once_on_release() {
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    let clip = store.add_clip(track, ClipDraft::video("a.mp4", 0.0, 4.0)).unwrap();
    let depth = store.history().undo_count();

    store.begin_drag("Move clip");
    for step in 1..=20 {
        let x = store.snap_clip_start(f64::from(step) * 0.5, 4.0, Some(clip));
        store.move_clip(track, clip, track, x).unwrap();
    }
    store.end_drag();

    assert_eq!(store.history().undo_count(), depth + 1);
    assert_eq!(store.undo_label(), Some("Move clip"));
    assert!(store.get_clip_by_id(clip).unwrap().start_time > 9.0);
    store.undo();
    assert_eq!(store.get_clip_by_id(clip).unwrap().start_time, 0.0);
}

#[test]
fn undo_during_drag_reverts_the_drag() {
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    let clip = store.add_clip(track, ClipDraft::video("a.mp4", 0.0, 4.0)).unwrap();

    store.begin_drag("Move clip");
    store.move_clip(track, clip, track, 3.0).unwrap();
    assert!(store.undo());
    assert!(!store.is_dragging());
    assert_eq!(store.get_clip_by_id(clip).unwrap().start_time, 0.0);
    assert_eq!(store.redo_label(), Some("Move clip"));

    // The next undo goes back to before the clip was added
    assert!(store.undo());
    assert!(store.get_clip_by_id(clip).is_none());
}

#[test]
fn undo_during_drag_with_empty_history() {
    let mut project = Project::new("Loaded");
    let track = project.add_track(TrackKind::Video, None, 80.0);
    let clip = project.add_clip(track, ClipDraft::video("a.mp4", 0.0, 4.0)).unwrap();
    let mut store = EditorStore::new();
    store.load_project(project).unwrap();
    assert!(!store.can_undo());

    store.begin_drag("Move clip");
    store.move_clip(track, clip, track, 3.0).unwrap();
    assert!(store.undo());
    assert!(!store.is_dragging());
    assert_eq!(store.get_clip_by_id(clip).unwrap().start_time, 0.0);
    assert!(store.redo());
    assert_eq!(store.get_clip_by_id(clip).unwrap().start_time, 3.0);
}

#[test]
fn nested_begin_drag_is_refused() {
    let mut store = EditorStore::new();
    assert!(store.begin_drag("Trim clip"));
    assert!(!store.begin_drag("Move clip"));
    assert!(!store.end_drag());
    assert!(!store.can_undo());
}
