//! Integration tests between the timeline and the fade/transition math.

use splice_effects::{clip_opacity, evaluate_pair, is_clip_in_fade, is_in_transition};
use splice_timeline::{
    ClipDraft, ClipUpdate, EditorStore, TrackKind, Transition, TransitionEdge, TransitionKind,
};

#[test]
fn fade_in_opacity_from_store_clip() {
    crate::init_tracing();
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    let clip = store
        .add_clip(track, ClipDraft::video("a.mp4", 0.0, 10.0))
        .unwrap();
    store
        .update_clip(track, clip, &ClipUpdate { fade_in: Some(2.0), ..Default::default() })
        .unwrap();

    let c = store.get_clip_by_id(clip).unwrap();
    assert_eq!(clip_opacity(c, 1.0), 0.5);
    assert!(is_clip_in_fade(c, 1.0));
}

#[test]
fn split_keeps_fades_on_outer_edges() {
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    let clip = store
        .add_clip(
            track,
            ClipDraft::video("a.mp4", 0.0, 10.0).with_fades(Some(1.0), Some(1.0)),
        )
        .unwrap();
    let second = store.split_clip(track, clip, 5.0).unwrap();

    let first = store.get_clip_by_id(clip).unwrap();
    let second = store.get_clip_by_id(second).unwrap();
    // No dip in brightness at the cut point
    assert_eq!(clip_opacity(first, 4.99), 1.0);
    assert_eq!(clip_opacity(second, 0.01), 1.0);
    assert_eq!(clip_opacity(second, 4.5), 0.5);
}

#[test]
fn transition_between_adjacent_clips() {
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    let a = store.add_clip(track, ClipDraft::video("a.mp4", 0.0, 5.0)).unwrap();
    let b = store.add_clip(track, ClipDraft::video("b.mp4", 5.0, 5.0)).unwrap();
    store
        .set_clip_transition(
            track,
            a,
            TransitionEdge::Out,
            Some(Transition::new(TransitionKind::Crossfade, 1.0)),
        )
        .unwrap();

    let (ca, cb) = (store.get_clip_by_id(a).unwrap(), store.get_clip_by_id(b).unwrap());
    assert!(is_in_transition(4.6, ca, cb));
    assert!(!is_in_transition(4.4, ca, cb));
    let w = evaluate_pair(5.0, ca, cb).unwrap();
    assert_eq!((w.outgoing, w.incoming), (0.5, 0.5));

    // Pull the clips apart and the transition no longer applies
    store.move_clip(track, b, track, 6.0).unwrap();
    let (ca, cb) = (store.get_clip_by_id(a).unwrap(), store.get_clip_by_id(b).unwrap());
    assert!(evaluate_pair(5.0, ca, cb).is_none());
}

#[test]
fn long_fade_out_is_shortened_on_the_right_half() {
    let mut store = EditorStore::new();
    let track = store.add_track(TrackKind::Video, None);
    let clip = store
        .add_clip(
            track,
            ClipDraft::video("a.mp4", 0.0, 10.0).with_fades(None, Some(8.0)),
        )
        .unwrap();
    let right = store.split_clip(track, clip, 5.0).unwrap();

    let right = store.get_clip_by_id(right).unwrap();
    assert_eq!(right.fade_out, Some(5.0));
    assert_eq!(clip_opacity(right, 0.0), 1.0);
    assert_eq!(clip_opacity(right, 2.5), 0.5);
}
