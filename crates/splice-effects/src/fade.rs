//! Fade envelopes.
//!
//! `elapsed` is always measured from the clip's start on the timeline.

use splice_timeline::Clip;

/// Fade-in gain: ramps 0→1 over the first `duration` seconds.
pub fn fade_in(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Fade-out gain: ramps 1→0 over the last `duration` seconds of a clip
/// `clip_duration` long.
pub fn fade_out(elapsed: f64, clip_duration: f64, duration: f64) -> f64 {
    if duration <= 0.0 || elapsed < clip_duration - duration {
        return 1.0;
    }
    ((clip_duration - elapsed) / duration).clamp(0.0, 1.0)
}

fn envelope(clip: &Clip, elapsed: f64) -> f64 {
    fade_in(elapsed, clip.fade_in.unwrap_or(0.0))
        * fade_out(elapsed, clip.duration, clip.fade_out.unwrap_or(0.0))
}

/// Visual opacity of a clip: fade envelope times its own opacity (default 1).
pub fn clip_opacity(clip: &Clip, elapsed: f64) -> f64 {
    envelope(clip, elapsed) * clip.opacity().unwrap_or(1.0)
}

/// Audio gain of a clip: fade envelope times its own volume (default 1).
pub fn audio_volume(clip: &Clip, elapsed: f64) -> f64 {
    envelope(clip, elapsed) * clip.volume().unwrap_or(1.0)
}

/// Whether `elapsed` falls inside the clip's fade-in or fade-out window.
pub fn is_clip_in_fade(clip: &Clip, elapsed: f64) -> bool {
    let in_fade_in = clip
        .fade_in
        .is_some_and(|d| d > 0.0 && elapsed >= 0.0 && elapsed < d);
    let in_fade_out = clip.fade_out.is_some_and(|d| {
        d > 0.0 && elapsed >= clip.duration - d && elapsed <= clip.duration
    });
    in_fade_in || in_fade_out
}
