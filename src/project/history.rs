use std::collections::VecDeque;

pub const DEFAULT_UNDO_DEPTH: usize = 50;

/// Bounded undo/redo over full snapshots
#[derive(Debug, Clone)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    depth: usize,
}

impl<T: Clone> History<T> {
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Remember the state as it was before an edit. Invalidates redo.
    pub fn record(&mut self, snapshot: T) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Swap `current` for the last recorded snapshot
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}
