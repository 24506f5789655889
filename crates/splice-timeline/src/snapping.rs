//! Snapping engine for timeline interactions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::project::Project;

/// A point on the timeline that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
}

/// Kind of snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Frame,
    ClipEdge,
    Playhead,
    Marker,
}

/// Which targets a dragged time may snap to, and how close it has to be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnappingEngine {
    pub enabled: bool,
    pub snap_to_frames: bool,
    pub snap_to_clips: bool,
    pub snap_to_playhead: bool,
    pub snap_to_markers: bool,
    /// Snap distance in pixels (divided by zoom to get seconds).
    pub snap_distance_px: f64,
}

impl SnappingEngine {
    pub fn new(snap_distance_px: f64) -> Self {
        Self {
            enabled: true,
            snap_to_frames: true,
            snap_to_clips: true,
            snap_to_playhead: true,
            snap_to_markers: false,
            snap_distance_px,
        }
    }

    /// Snap distance in seconds at the given zoom.
    pub fn threshold_secs(&self, pixels_per_second: f64) -> f64 {
        if pixels_per_second > 0.0 {
            self.snap_distance_px / pixels_per_second
        } else {
            0.0
        }
    }

    /// Collect the discrete snap targets (everything except frame lines).
    /// Edges of `exclude_clip` are left out so a dragged clip never snaps to itself.
    pub fn collect_snap_points(
        &self,
        project: &Project,
        playhead: f64,
        exclude_clip: Option<Uuid>,
    ) -> Vec<SnapPoint> {
        let mut points = Vec::new();

        if self.snap_to_playhead {
            points.push(SnapPoint {
                time: playhead,
                kind: SnapKind::Playhead,
            });
        }

        if self.snap_to_clips {
            for clip in project.all_clips().filter(|c| Some(c.id) != exclude_clip) {
                points.push(SnapPoint {
                    time: clip.start_time,
                    kind: SnapKind::ClipEdge,
                });
                points.push(SnapPoint {
                    time: clip.end_time(),
                    kind: SnapKind::ClipEdge,
                });
            }
        }

        if self.snap_to_markers {
            points.extend(project.markers.iter().map(|m| SnapPoint {
                time: m.time,
                kind: SnapKind::Marker,
            }));
        }

        points
    }

    /// Closest target within `threshold` seconds of `time`, considering the
    /// given points and, if enabled, the nearest frame boundary.
    pub fn find_snap(
        &self,
        time: f64,
        points: &[SnapPoint],
        project: &Project,
        threshold: f64,
    ) -> Option<SnapPoint> {
        if !self.enabled || !time.is_finite() {
            return None;
        }

        let frame = self.snap_to_frames.then(|| SnapPoint {
            time: project.frame_rate.snap_to_frame(time),
            kind: SnapKind::Frame,
        });

        points
            .iter()
            .copied()
            .chain(frame)
            .map(|p| (p, (p.time - time).abs()))
            .filter(|(_, dist)| *dist <= threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p)
    }

    /// Snap a single time (a playhead drag, a trim edge).
    pub fn snap_time(
        &self,
        time: f64,
        project: &Project,
        playhead: f64,
        pixels_per_second: f64,
        exclude_clip: Option<Uuid>,
    ) -> f64 {
        if !self.enabled {
            return time;
        }
        let points = self.collect_snap_points(project, playhead, exclude_clip);
        self.find_snap(time, &points, project, self.threshold_secs(pixels_per_second))
            .map_or(time, |p| p.time)
    }

    /// Snap a dragged clip: try its leading edge first, then its trailing edge.
    pub fn snap_clip_start(
        &self,
        start: f64,
        duration: f64,
        project: &Project,
        playhead: f64,
        pixels_per_second: f64,
        exclude_clip: Option<Uuid>,
    ) -> f64 {
        if !self.enabled {
            return start;
        }
        let points = self.collect_snap_points(project, playhead, exclude_clip);
        let threshold = self.threshold_secs(pixels_per_second);

        if let Some(p) = self.find_snap(start, &points, project, threshold) {
            return p.time;
        }
        if let Some(p) = self.find_snap(start + duration, &points, project, threshold) {
            return p.time - duration;
        }
        start
    }
}

impl Default for SnappingEngine {
    fn default() -> Self {
        Self::new(10.0)
    }
}
