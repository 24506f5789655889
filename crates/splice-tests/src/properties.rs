//! Property tests: random edit sequences never break the track invariants.

use proptest::prelude::*;
use splice_timeline::{ClipDraft, ClipKind, EditorStore, Project, TrackKind};
use uuid::Uuid;

#[derive(Debug, Clone)]
enum Op {
    Add { track: usize, kind: usize, start: f64, duration: f64 },
    Move { clip: usize, track: usize, start: f64 },
    TrimStart { clip: usize, to: f64 },
    TrimEnd { clip: usize, to: f64 },
    Split { clip: usize, at: f64 },
    Duplicate { clip: usize },
    Remove { clip: usize },
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize, 0..3usize, -5.0..80.0f64, -1.0..15.0f64)
            .prop_map(|(track, kind, start, duration)| Op::Add { track, kind, start, duration }),
        (0..64usize, 0..4usize, -5.0..80.0f64)
            .prop_map(|(clip, track, start)| Op::Move { clip, track, start }),
        (0..64usize, -5.0..80.0f64).prop_map(|(clip, to)| Op::TrimStart { clip, to }),
        (0..64usize, -5.0..80.0f64).prop_map(|(clip, to)| Op::TrimEnd { clip, to }),
        (0..64usize, 0.0..80.0f64).prop_map(|(clip, at)| Op::Split { clip, at }),
        (0..64usize).prop_map(|clip| Op::Duplicate { clip }),
        (0..64usize).prop_map(|clip| Op::Remove { clip }),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn store_with_tracks() -> EditorStore {
    let mut store = EditorStore::new();
    store.add_track(TrackKind::Video, None);
    store.add_track(TrackKind::Audio, None);
    store.add_track(TrackKind::Image, None);
    store.add_track(TrackKind::Video, None);
    store
}

/// Pick an existing clip by index, wrapping around.
fn pick_clip(project: &Project, index: usize) -> Option<(Uuid, Uuid)> {
    let all: Vec<(Uuid, Uuid)> = project
        .tracks
        .iter()
        .flat_map(|t| t.clips.iter().map(move |c| (t.id, c.id)))
        .collect();
    (!all.is_empty()).then(|| all[index % all.len()])
}

fn apply(store: &mut EditorStore, op: &Op) {
    let project = store.project().clone();
    let track_id = |i: usize| project.tracks[i % project.tracks.len()].id;
    match *op {
        Op::Add { track, kind, start, duration } => {
            let kind = [ClipKind::VIDEO, ClipKind::AUDIO, ClipKind::IMAGE][kind];
            let _ = store.add_clip(track_id(track), ClipDraft::new(kind, "m", start, duration));
        }
        Op::Move { clip, track, start } => {
            if let Some((from, id)) = pick_clip(&project, clip) {
                let _ = store.move_clip(from, id, track_id(track), start);
            }
        }
        Op::TrimStart { clip, to } => {
            if let Some((t, id)) = pick_clip(&project, clip) {
                let _ = store.trim_clip_start(t, id, to);
            }
        }
        Op::TrimEnd { clip, to } => {
            if let Some((t, id)) = pick_clip(&project, clip) {
                let _ = store.trim_clip_end(t, id, to);
            }
        }
        Op::Split { clip, at } => {
            if let Some((t, id)) = pick_clip(&project, clip) {
                let _ = store.split_clip(t, id, at);
            }
        }
        Op::Duplicate { clip } => {
            if let Some((t, id)) = pick_clip(&project, clip) {
                let _ = store.duplicate_clip(t, id);
            }
        }
        Op::Remove { clip } => {
            if let Some((t, id)) = pick_clip(&project, clip) {
                let _ = store.remove_clip(t, id);
            }
        }
        Op::Undo => {
            store.undo();
        }
        Op::Redo => {
            store.redo();
        }
    }
}

fn assert_invariants(project: &Project) -> Result<(), TestCaseError> {
    for track in &project.tracks {
        for (i, a) in track.clips.iter().enumerate() {
            prop_assert_eq!(a.kind.track_kind(), track.kind);
            prop_assert!(a.start_time >= 0.0);
            prop_assert!(a.duration > 0.0);
            prop_assert!(a.in_point >= 0.0 && a.in_point < a.out_point);
            prop_assert!(a.out_point <= a.source_limit() + 1e-9);
            prop_assert!(((a.out_point - a.in_point) - a.duration).abs() < 1e-6);
            for b in &track.clips[i + 1..] {
                prop_assert!(
                    !a.range().overlaps(b.range()),
                    "clips {:?} and {:?} overlap",
                    a.range(),
                    b.range()
                );
            }
        }
        let sorted = track
            .clips
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time);
        prop_assert!(sorted);
        prop_assert!(project.duration + 1e-9 >= track.end_time());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_edits_keep_invariants(ops in prop::collection::vec(op(), 1..60)) {
        let mut store = store_with_tracks();
        for op in &ops {
            apply(&mut store, op);
            assert_invariants(store.project())?;
            let playhead = store.playback().playhead_position;
            prop_assert!(playhead >= 0.0 && playhead <= store.project().duration);
        }
    }

    #[test]
    fn seek_is_idempotent(t in -1e4..1e4f64) {
        let mut store = EditorStore::new();
        let once = store.seek(t);
        prop_assert_eq!(store.seek(once), once);
        prop_assert!((0.0..=store.project().duration).contains(&once));
    }

    #[test]
    fn split_then_rejoin_reproduces_original(
        start in 0.0..50.0f64,
        duration in 0.5..20.0f64,
        in_point in 0.0..10.0f64,
        frac in 0.05..0.95f64,
    ) {
        let mut store = EditorStore::new();
        let track = store.add_track(TrackKind::Video, None);
        let draft = ClipDraft::video("m.mp4", start, duration).with_source(in_point, in_point + duration);
        let id = store.add_clip(track, draft).unwrap();
        let original = store.get_clip_by_id(id).unwrap().clone();

        let at = start + duration * frac;
        let second = store.split_clip(track, id, at).unwrap();
        let left = store.get_clip_by_id(id).unwrap();
        let right = store.get_clip_by_id(second).unwrap();

        prop_assert!((left.start_time - original.start_time).abs() < 1e-9);
        prop_assert!((left.duration + right.duration - original.duration).abs() < 1e-9);
        prop_assert!((left.in_point - original.in_point).abs() < 1e-9);
        prop_assert!((right.out_point - original.out_point).abs() < 1e-9);
        prop_assert!((left.out_point - right.in_point).abs() < 1e-9);
        prop_assert!((left.end_time() - right.start_time).abs() < 1e-9);
    }

    #[test]
    fn overlapping_add_never_mutates(
        start in 0.0..20.0f64,
        duration in 0.5..10.0f64,
        offset in 0.0..0.99f64,
    ) {
        let mut store = EditorStore::new();
        let track = store.add_track(TrackKind::Audio, None);
        store.add_clip(track, ClipDraft::audio("a.wav", start, duration)).unwrap();
        let before = store.project().clone();
        let clash = start + duration * offset;
        prop_assert!(store.add_clip(track, ClipDraft::audio("b.wav", clash, duration)).is_err());
        prop_assert_eq!(store.project(), &before);
    }
}
