//! Timeline time: tolerances, frame rates and ranges.
//!
//! Timeline positions are plain `f64` seconds, which is what interactive
//! dragging produces. Frame boundaries are computed through rational
//! arithmetic so that NTSC rates (30000/1001) land on exact frame times
//! instead of accumulating floating-point drift.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when comparing two timeline positions.
///
/// Two clip edges closer than this are considered to touch.
pub const TIME_EPSILON: f64 = 1e-9;

/// Smallest duration a clip (or loop region) may have, in seconds.
pub const MIN_CLIP_DURATION: f64 = 0.01;

/// Floor a time at zero. NaN becomes zero.
#[inline]
pub fn sanitize_time(time: f64) -> f64 {
    if time.is_nan() {
        0.0
    } else {
        time.max(0.0)
    }
}

/// Floor a duration at [`MIN_CLIP_DURATION`]. NaN becomes the minimum.
#[inline]
pub fn sanitize_duration(duration: f64) -> f64 {
    if duration.is_nan() {
        MIN_CLIP_DURATION
    } else {
        duration.max(MIN_CLIP_DURATION)
    }
}

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Both terms must be non-zero for the rate to be usable.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// Frames per second, rounded to the nearest f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame in seconds.
    #[inline]
    pub fn frame_duration_secs(self) -> f64 {
        self.denominator as f64 / self.numerator as f64
    }

    /// Index of the frame boundary nearest to `seconds`.
    #[inline]
    pub fn nearest_frame(self, seconds: f64) -> i64 {
        (seconds * self.to_fps_f64()).round() as i64
    }

    /// Seconds per frame as an exact ratio.
    #[inline]
    pub fn frame_period(self) -> Rational64 {
        Rational64::new(i64::from(self.denominator), i64::from(self.numerator.max(1)))
    }

    /// Exact time of frame boundary `frame`, in seconds.
    pub fn frame_time(self, frame: i64) -> f64 {
        let t = self.frame_period() * Rational64::from_integer(frame);
        *t.numer() as f64 / *t.denom() as f64
    }

    /// Quantize `seconds` to the nearest frame boundary.
    pub fn snap_to_frame(self, seconds: f64) -> f64 {
        self.frame_time(self.nearest_frame(seconds))
    }

    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        match self.denominator {
            1 => write!(f, "{}fps", self.numerator),
            _ => write!(f, "{:.3}fps", fps),
        }
    }
}

/// A half-open time range `[start, start + duration)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub duration: f64,
}

impl TimeRange {
    #[inline]
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// Create a time range from start and end times. The bounds may come in
    /// either order.
    #[inline]
    pub fn from_start_end(start: f64, end: f64) -> Self {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        Self {
            start: lo,
            duration: hi - lo,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> f64 {
        self.start + self.duration
    }

    /// `start <= time < end`.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if two ranges overlap. Ranges that merely touch
    /// (`a.end() == b.start`) do not overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start + TIME_EPSILON < other.end() && other.start + TIME_EPSILON < self.end()
    }

    pub const EMPTY: Self = Self {
        start: 0.0,
        duration: 0.0,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}
