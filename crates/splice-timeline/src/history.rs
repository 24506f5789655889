//! Snapshot-based undo/redo.
//!
//! Each entry holds the state *before* a committed action. Undo swaps the
//! current state onto the redo stack and hands back the stored one, so the
//! manager never needs to know how an action was performed.
//!
//! Drags are batched: `begin_batch` captures the pre-drag state, the
//! intermediate edits push nothing, and `end_batch` records a single entry.

use std::collections::VecDeque;

/// A labelled snapshot.
#[derive(Debug, Clone)]
pub struct HistoryEntry<S> {
    /// Human-readable action name, e.g. "Move clip".
    pub label: String,
    pub snapshot: S,
}

/// Undo/redo stacks over snapshots of type `S`.
#[derive(Debug, Clone)]
pub struct HistoryManager<S> {
    undo_stack: VecDeque<HistoryEntry<S>>,
    redo_stack: Vec<HistoryEntry<S>>,
    max_depth: usize,
    /// Pending drag: its label and the state before it started.
    batch: Option<HistoryEntry<S>>,
}

impl<S> HistoryManager<S> {
    /// Create an empty history keeping at most `max_depth` undo steps.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            batch: None,
        }
    }

    /// Record the state before an action. Clears the redo stack.
    /// Suppressed while a batch is open.
    pub fn push(&mut self, label: impl Into<String>, before: S) {
        let label = label.into();
        if self.batch.is_some() {
            tracing::debug!(%label, "Push suppressed: batch in progress");
            return;
        }
        self.push_entry(HistoryEntry { label, snapshot: before });
    }

    fn push_entry(&mut self, entry: HistoryEntry<S>) {
        tracing::debug!(
            label = %entry.label,
            undo_depth = self.undo_stack.len() + 1,
            "History entry pushed"
        );
        self.redo_stack.clear();
        self.undo_stack.push_back(entry);
        self.enforce_depth();
    }

    fn enforce_depth(&mut self) {
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    fn drop_stuck_batch(&mut self) {
        if let Some(batch) = self.batch.take() {
            tracing::warn!(label = %batch.label, "Ending stuck batch before undo/redo");
        }
    }

    /// Step back. `current` is parked on the redo stack; the returned snapshot
    /// is what the caller should restore.
    pub fn undo(&mut self, current: S) -> Option<S> {
        self.drop_stuck_batch();
        let entry = self.undo_stack.pop_back()?;
        tracing::debug!(
            label = %entry.label,
            undo_remaining = self.undo_stack.len(),
            "Undo"
        );
        self.redo_stack.push(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: S) -> Option<S> {
        self.drop_stuck_batch();
        let entry = self.redo_stack.pop()?;
        tracing::debug!(
            label = %entry.label,
            redo_remaining = self.redo_stack.len(),
            "Redo"
        );
        self.undo_stack.push_back(HistoryEntry {
            label: entry.label,
            snapshot: current,
        });
        self.enforce_depth();
        Some(entry.snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Open a batch. Returns `false` (and keeps the open one) if a batch is
    /// already in progress.
    pub fn begin_batch(&mut self, label: impl Into<String>, before: S) -> bool {
        let label = label.into();
        if self.batch.is_some() {
            tracing::warn!(%label, "begin_batch called while already batching, ignoring");
            return false;
        }
        tracing::debug!(%label, "Batch started");
        self.batch = Some(HistoryEntry { label, snapshot: before });
        true
    }

    /// Close the open batch. When `changed` is false nothing is recorded.
    /// Returns whether an entry was pushed.
    pub fn end_batch(&mut self, changed: bool) -> bool {
        let Some(entry) = self.batch.take() else {
            return false;
        };
        if !changed {
            tracing::debug!(label = %entry.label, "Batch ended without changes");
            return false;
        }
        self.push_entry(entry);
        true
    }

    /// Abandon the open batch and return the state captured when it began.
    pub fn cancel_batch(&mut self) -> Option<S> {
        let entry = self.batch.take()?;
        tracing::debug!(label = %entry.label, "Batch cancelled");
        Some(entry.snapshot)
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.label.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.label.as_str())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the depth cap, dropping the oldest entries if needed.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        self.enforce_depth();
    }

    /// Clear both stacks and any open batch.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch = None;
        tracing::debug!("History cleared");
    }
}
