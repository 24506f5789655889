//! Splice Effects - fade and transition math
//!
//! Pure functions consumed by preview rendering: per-clip fade envelopes
//! and the blend weights of transitions between adjacent clips.

pub mod fade;
pub mod transition;

pub use fade::{audio_volume, clip_opacity, fade_in, fade_out, is_clip_in_fade};
pub use transition::{
    active_transition, blend_weights, evaluate_pair, is_in_transition, transition_progress,
    transition_window, BlendWeights,
};
