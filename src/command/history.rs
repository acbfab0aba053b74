use std::collections::VecDeque;

use crate::stroke::PathRef;

/// Linear undo/redo record of committed paths.
///
/// Transitions that change what is on screen take a `replay` callback and
/// only move paths once it succeeds, so a failed redraw never leaves the
/// history out of sync with what the caller last saw.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Committed paths in drawing order
    committed: Vec<PathRef>,
    /// Undone paths, most recently undone first
    redo_buffer: VecDeque<PathRef>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished path; any redoable paths are dropped.
    pub fn commit(&mut self, path: PathRef) {
        self.committed.push(path);
        if !self.redo_buffer.is_empty() {
            log::debug!("Dropping {} redoable path(s) after new stroke", self.redo_buffer.len());
        }
        self.redo_buffer.clear();
    }

    /// Move the newest committed path to the front of the redo buffer.
    ///
    /// Returns `Ok(false)` without calling `replay` when there is nothing to undo.
    pub fn undo<E, F>(&mut self, replay: F) -> Result<bool, E>
    where
        F: FnOnce(&[PathRef]) -> Result<(), E>,
    {
        let Some(remaining) = self.committed.len().checked_sub(1) else {
            return Ok(false);
        };

        replay(&self.committed[..remaining])?;

        if let Some(path) = self.committed.pop() {
            self.redo_buffer.push_front(path);
        }
        log::debug!(
            "Undo: {} committed, {} redoable",
            self.committed.len(),
            self.redo_buffer.len()
        );
        Ok(true)
    }

    /// Move the most recently undone path back onto the committed sequence.
    ///
    /// Returns `Ok(false)` without calling `replay` when there is nothing to redo.
    pub fn redo<E, F>(&mut self, replay: F) -> Result<bool, E>
    where
        F: FnOnce(&[PathRef]) -> Result<(), E>,
    {
        let Some(next) = self.redo_buffer.front() else {
            return Ok(false);
        };

        let mut restored = Vec::with_capacity(self.committed.len() + 1);
        restored.extend(self.committed.iter().cloned());
        restored.push(next.clone());
        replay(&restored)?;

        self.committed = restored;
        self.redo_buffer.pop_front();
        log::debug!(
            "Redo: {} committed, {} redoable",
            self.committed.len(),
            self.redo_buffer.len()
        );
        Ok(true)
    }

    /// Drop both sequences after replaying an empty canvas.
    pub fn clear<E, F>(&mut self, replay: F) -> Result<(), E>
    where
        F: FnOnce(&[PathRef]) -> Result<(), E>,
    {
        replay(&[])?;
        self.committed.clear();
        self.redo_buffer.clear();
        Ok(())
    }

    pub fn committed(&self) -> &[PathRef] {
        &self.committed
    }

    pub fn redo_buffer(&self) -> &VecDeque<PathRef> {
        &self.redo_buffer
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_buffer.is_empty()
    }
}
