//! Transitions between two adjacent clips on the same track.
//!
//! A transition of duration `d` straddles the boundary between the outgoing
//! clip `a` and the incoming clip `b`: its window is `[a.end - d/2, a.end + d/2]`.

use serde::{Deserialize, Serialize};
use splice_core::{TimeRange, TIME_EPSILON};
use splice_timeline::{Clip, Transition, TransitionKind};
use std::f64::consts::FRAC_PI_2;

/// Multipliers applied to the outgoing and incoming clip during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub outgoing: f64,
    pub incoming: f64,
}

impl BlendWeights {
    /// Only the outgoing clip is visible.
    pub const OUTGOING: Self = Self {
        outgoing: 1.0,
        incoming: 0.0,
    };
}

/// The transition governing the `a` → `b` boundary, if the clips are
/// adjacent. `a`'s out-transition takes precedence over `b`'s in-transition.
pub fn active_transition(a: &Clip, b: &Clip) -> Option<Transition> {
    if (b.start_time - a.end_time()).abs() > TIME_EPSILON {
        return None;
    }
    let usable = |t: &Transition| t.duration > 0.0;
    a.transitions
        .outgoing
        .filter(usable)
        .or(b.transitions.incoming.filter(usable))
}

/// Window of a transition centred on the end of the outgoing clip.
pub fn transition_window(a: &Clip, transition: &Transition) -> TimeRange {
    let half = transition.duration / 2.0;
    TimeRange::new(a.end_time() - half, transition.duration)
}

/// Whether `time` falls inside the transition between `a` and `b`.
pub fn is_in_transition(time: f64, a: &Clip, b: &Clip) -> bool {
    active_transition(a, b).is_some_and(|t| {
        let window = transition_window(a, &t);
        time >= window.start && time <= window.end()
    })
}

/// Linear 0→1 progress through the transition window, clamped.
pub fn transition_progress(time: f64, a: &Clip, _b: &Clip, transition: &Transition) -> f64 {
    if transition.duration <= 0.0 {
        return if time < a.end_time() { 0.0 } else { 1.0 };
    }
    let window = transition_window(a, transition);
    ((time - window.start) / transition.duration).clamp(0.0, 1.0)
}

/// Outgoing/incoming weights for a transition kind at `progress`.
///
/// Crossfade is linear, dissolve is equal-power (constant perceived
/// brightness and loudness), and cut switches hard at the midpoint.
pub fn blend_weights(kind: TransitionKind, progress: f64) -> BlendWeights {
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    match kind {
        TransitionKind::Crossfade => BlendWeights {
            outgoing: 1.0 - p,
            incoming: p,
        },
        TransitionKind::Dissolve => BlendWeights {
            outgoing: (p * FRAC_PI_2).cos(),
            incoming: (p * FRAC_PI_2).sin(),
        },
        TransitionKind::Cut if p < 0.5 => BlendWeights::OUTGOING,
        TransitionKind::Cut => BlendWeights {
            outgoing: 0.0,
            incoming: 1.0,
        },
    }
}

/// Blend weights for the pair at `time`, or `None` outside any transition.
pub fn evaluate_pair(time: f64, a: &Clip, b: &Clip) -> Option<BlendWeights> {
    let transition = active_transition(a, b)?;
    if !is_in_transition(time, a, b) {
        return None;
    }
    let progress = transition_progress(time, a, b, &transition);
    Some(blend_weights(transition.kind, progress))
}
