//! Splice Timeline - multi-track timeline editing engine
//!
//! Implements the editable timeline behind the editor:
//! - Projects containing typed tracks of non-overlapping clips
//! - Edit operations (move, trim, split, duplicate) that keep those invariants
//! - Snapping, selection, clipboard, playback and viewport state
//! - Snapshot undo/redo with drag batching, all owned by [`EditorStore`]

pub mod clip;
pub mod clipboard;
pub mod config;
pub mod edit;
pub mod history;
pub mod playback;
pub mod project;
pub mod selection;
pub mod snapping;
pub mod store;
pub mod track;
pub mod viewport;

pub use clip::{
    AssetDescriptor, Clip, ClipDraft, ClipKind, ClipTransitions, ClipUpdate, Transition,
    TransitionEdge, TransitionKind,
};
pub use clipboard::{Clipboard, ClipboardEntry, CutSource};
pub use config::EditorConfig;
pub use edit::EditError;
pub use history::{HistoryEntry, HistoryManager};
pub use playback::{PlaybackState, TickOutcome};
pub use project::{ClipHit, Marker, Project};
pub use selection::Selection;
pub use snapping::{SnapKind, SnapPoint, SnappingEngine};
pub use store::{EditorStore, Snapshot};
pub use track::{Track, TrackKind, TrackUpdate};
pub use viewport::Viewport;
