use crate::surface::{Snapshot, Surface};

/// Undo stack of surface snapshots.
///
/// The top entry is always the surface as it was just before the most recent
/// committed gesture or clear. There is no depth limit.
#[derive(Debug, Default)]
pub struct SnapshotHistory {
    undo_stack: Vec<Snapshot>,
}

impl SnapshotHistory {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
        }
    }

    /// Capture the surface before it gets mutated and push it on the stack
    pub fn record_before_mutation(&mut self, surface: &Surface) {
        self.undo_stack.push(surface.snapshot());
        log::debug!("History depth: {}", self.undo_stack.len());
    }

    /// The most recent snapshot, which an in-progress gesture previews against
    pub fn top(&self) -> Option<&Snapshot> {
        self.undo_stack.last()
    }

    /// Restore the most recent snapshot onto the surface.
    ///
    /// Returns false (and leaves the surface alone) when there is nothing to undo.
    pub fn undo(&mut self, surface: &mut Surface) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                surface.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Returns true if there are snapshots that can be restored
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Total bytes held by the stack, for the debug readout
    pub fn memory_bytes(&self) -> usize {
        self.undo_stack.iter().map(|s| s.as_raw().len()).sum()
    }
}
