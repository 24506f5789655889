//! Splice Core - Foundation types for timeline editing
//!
//! This crate provides the fundamental types shared by the Splice crates:
//! - Time representation (FrameRate, TimeRange)
//! - Clamping helpers for forgiving interactive input
//! - The crate-spanning error type

pub mod error;
pub mod time;

pub use error::{Result, SpliceError};
pub use time::{
    sanitize_duration, sanitize_time, FrameRate, TimeRange, MIN_CLIP_DURATION,
    TIME_EPSILON,
};
