//! Integration tests for transport, looping, snapping and viewport state.

use splice_core::FrameRate;
use splice_timeline::{ClipDraft, EditorStore, TrackKind};

/// Simulate the host's per-frame callback at 60 Hz for `seconds`.
fn run_ticks(store: &mut EditorStore, seconds: f64) -> usize {
    let dt = 1.0 / 60.0;
    let mut wraps = 0;
    for _ in 0..(seconds * 60.0).round() as usize {
        if store.advance_playback(dt).wrapped {
            wraps += 1;
        }
    }
    wraps
}

#[test]
fn seek_is_clamped_and_idempotent() {
    crate::init_tracing();
    let mut store = EditorStore::new();
    assert_eq!(store.seek(-1.0), 0.0);
    assert_eq!(store.seek(1e9), 60.0);
    let t = store.seek(12.34);
    assert_eq!(store.seek(t), t);
}

#[test]
fn stop_rewinds() {
    let mut store = EditorStore::new();
    store.seek(5.0);
    store.play();
    store.stop();
    assert!(store.playback().is_stopped());
}

#[test]
fn frame_steps_follow_project_rate() {
    let mut store = EditorStore::new();
    store.set_project_settings(FrameRate::FPS_25, 48_000).unwrap();
    store.step_frame(5);
    assert!((store.playback().playhead_position - 0.2).abs() < 1e-9);
    store.seek_relative(-1.0);
    assert_eq!(store.playback().playhead_position, 0.0);
}

#[test]
fn loop_region_wraps_playback() {
    let mut store = EditorStore::new();
    store.set_loop_region(1.0, 2.0).unwrap();
    store.seek(1.0);
    store.play();
    let wraps = run_ticks(&mut store, 3.5);
    assert!(wraps >= 3);
    let pos = store.playback().playhead_position;
    assert!((1.0..2.0).contains(&pos));

    // With the loop off the playhead runs to the end and stops
    store.toggle_loop();
    run_ticks(&mut store, 70.0);
    assert_eq!(store.playback().playhead_position, 60.0);
    assert!(!store.playback().is_playing);
}

#[test]
fn too_short_loop_region_is_rejected() {
    let mut store = EditorStore::new();
    assert!(store.set_loop_region(5.0, 5.001).is_err());
    assert!(!store.playback().loop_enabled);
}

#[test]
fn zoom_is_clamped() {
    let mut store = EditorStore::new();
    assert_eq!(store.set_zoom(1.0), 10.0);
    assert_eq!(store.set_zoom(1000.0), 500.0);
}

#[test]
fn scroll_respects_project_length() {
    let mut store = EditorStore::new();
    store.set_viewport_width(800.0);
    // 60s at 100 px/s
    assert_eq!(store.set_scroll_left(1e6), 5200.0);
    assert_eq!(store.zoom_to_fit(), 800.0 / 60.0);
    assert_eq!(store.viewport().scroll_left, 0.0);
}

#[test]
fn snapping_uses_zoom_dependent_threshold() {
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    store.add_clip(track, ClipDraft::video("a.mp4", 0.0, 5.0)).unwrap();
    store.snapping_mut().snap_to_frames = false;
    store.snapping_mut().snap_to_playhead = false;

    store.set_zoom(100.0);
    assert_eq!(store.get_snapped_time(5.2, None), 5.2);
    store.set_zoom(20.0);
    assert_eq!(store.get_snapped_time(5.2, None), 5.0);

    store.snapping_mut().enabled = false;
    assert_eq!(store.get_snapped_time(5.2, None), 5.2);
}

#[test]
fn playhead_snap_is_on_by_default() {
    let mut store = EditorStore::new();
    store.seek(7.0);
    store.snapping_mut().snap_to_frames = false;
    assert_eq!(store.get_snapped_time(7.04, None), 7.0);
}
