use super::memento::{EditorMemento, Originator};

/// Bounds on retained undo entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    /// Maximum bitmap-carrying mementos kept
    pub max_canvas: usize,
    /// Maximum mementos kept overall
    pub max_total: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            max_canvas: 5,
            max_total: 100,
        }
    }
}

/// Two-stack undo/redo manager.
#[derive(Debug, Default)]
pub struct HistoryManager {
    undo_stack: Vec<EditorMemento>,
    redo_stack: Vec<EditorMemento>,
    limits: HistoryLimits,
}

impl HistoryManager {
    pub fn new(limits: HistoryLimits) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limits,
        }
    }

    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    /// Records the state from before a new edit. Invalidates the redo stack.
    pub fn push(&mut self, memento: EditorMemento) {
        self.redo_stack.clear();
        self.push_undo(memento);
    }

    fn push_undo(&mut self, memento: EditorMemento) {
        self.undo_stack.push(memento);
        self.evict();
    }

    /// Drops the oldest entries once either limit is exceeded.
    ///
    /// Walks newest to oldest; the first entry that would push a counter past
    /// its limit is dropped together with everything older than it.
    fn evict(&mut self) {
        let mut heavy = 0;
        let mut total = 0;
        let mut cut = None;
        for (index, memento) in self.undo_stack.iter().enumerate().rev() {
            total += 1;
            if memento.is_heavy() {
                heavy += 1;
            }
            if total > self.limits.max_total || heavy > self.limits.max_canvas {
                cut = Some(index);
                break;
            }
        }
        if let Some(index) = cut {
            self.undo_stack.drain(..=index);
            log::debug!(
                "History evicted {} entries ({} kept)",
                index + 1,
                self.undo_stack.len()
            );
        }
    }

    /// Restores the most recent memento, saving the current state for redo.
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, target: &mut impl Originator) -> bool {
        let Some(memento) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(target.capture(memento.is_heavy()));
        target.restore(memento);
        true
    }

    /// Re-applies the most recently undone memento.
    pub fn redo(&mut self, target: &mut impl Originator) -> bool {
        let Some(memento) = self.redo_stack.pop() else {
            return false;
        };
        let current = target.capture(memento.is_heavy());
        self.push_undo(current);
        target.restore(memento);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drops both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
