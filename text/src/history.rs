//! Reversible edit records.
//!
//! The log is a flat list with a cursor: entries past the cursor can be
//! redone until the next edit truncates them. Whether consecutive edits fold
//! into a single undo step is decided by a [`MergePolicy`].

use crate::Location;
use std::fmt;
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Insert,
    Delete,
}

impl ActionKind {
    pub fn inverse(self) -> Self {
        match self {
            ActionKind::Insert => ActionKind::Delete,
            ActionKind::Delete => ActionKind::Insert,
        }
    }
}

/// One edit. For a delete, `data` is the text that was actually removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// Point form: the edit happens right after this position.
    pub location: Location,
    pub data: String,
}

impl Action {
    pub fn insert(location: Location, data: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Insert,
            location,
            data: data.into(),
        }
    }

    pub fn delete(location: Location, removed: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Delete,
            location,
            data: removed.into(),
        }
    }

    /// Length of `data` in chars.
    pub fn len(&self) -> usize {
        self.data.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Where the point lands after applying this action as an insert.
    pub fn end(&self) -> Location {
        match self.data.rsplit_once('\n') {
            Some((head, tail)) => Location::new(
                self.location.line + head.matches('\n').count() + 1,
                tail.chars().count() as isize - 1,
            ),
            None => Location::new(self.location.line, self.location.column + self.len() as isize),
        }
    }

    pub fn inverse(&self) -> Action {
        Action {
            kind: self.kind.inverse(),
            location: self.location,
            data: self.data.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("Nothing to undo!")]
    NothingToUndo,
    #[error("Nothing to redo!")]
    NothingToRedo,
}

/// Decides whether `next` folds into the most recent entry.
///
/// Returning `true` means `last` was updated to cover both edits and `next`
/// must not be appended.
pub trait MergePolicy: fmt::Debug {
    fn merge(&self, last: &mut Action, next: &Action) -> bool;
}

/// Every edit is its own undo step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverMerge;

impl MergePolicy for NeverMerge {
    fn merge(&self, _last: &mut Action, _next: &Action) -> bool {
        false
    }
}

/// Folds a run of typing into one step: inserts that continue where the
/// previous insert ended, forward deletes at the same spot, and backspaces
/// that end where the previous one started. A newline in the next edit
/// starts a new step, and delete runs never span a newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypingRuns;

impl MergePolicy for TypingRuns {
    fn merge(&self, last: &mut Action, next: &Action) -> bool {
        if last.kind != next.kind || next.data.contains('\n') {
            return false;
        }
        match next.kind {
            ActionKind::Insert if next.location == last.end() => {
                last.data.push_str(&next.data);
                true
            },
            ActionKind::Insert => false,
            ActionKind::Delete
                if last.data.contains('\n') || last.location.line != next.location.line =>
            {
                false
            },
            ActionKind::Delete if next.location == last.location => {
                last.data.push_str(&next.data);
                true
            },
            ActionKind::Delete
                if next.location.column + next.len() as isize == last.location.column =>
            {
                last.data.insert_str(0, &next.data);
                last.location = next.location;
                true
            },
            ActionKind::Delete => false,
        }
    }
}

/// Undo/redo log of one [`crate::TextStore`].
#[derive(Debug)]
pub struct ActionLog {
    entries: Vec<Action>,
    /// Index of the most recently applied entry, `-1` when none is.
    cursor: isize,
    /// Cursor value at the last save. `None` once that state is unreachable.
    saved: Option<isize>,
    sealed: bool,
    policy: Box<dyn MergePolicy>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        Self::with_policy(NeverMerge)
    }

    pub fn with_policy(policy: impl MergePolicy + 'static) -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
            saved: Some(-1),
            sealed: false,
            policy: Box::new(policy),
        }
    }

    pub fn set_policy(&mut self, policy: impl MergePolicy + 'static) {
        self.policy = Box::new(policy);
        self.sealed = true;
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn entries(&self) -> &[Action] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len() as isize
    }

    /// Records an action that has already been applied, discarding anything
    /// that was undone before it.
    pub fn push(&mut self, action: Action) {
        self.entries.truncate((self.cursor + 1) as usize);
        if self.saved.is_some_and(|saved| saved > self.cursor) {
            self.saved = None;
        }

        let mergeable = !self.sealed && self.saved != Some(self.cursor);
        if mergeable {
            if let Some(last) = self.entries.last_mut() {
                if self.policy.merge(last, &action) {
                    trace!(kind = ?action.kind, "merged into previous action");
                    return;
                }
            }
        }

        trace!(kind = ?action.kind, location = %action.location, "recorded action");
        self.entries.push(action);
        self.cursor += 1;
        self.sealed = false;
    }

    /// Steps back, returning the entry the caller must revert.
    pub fn undo(&mut self) -> Result<Action, HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        let action = self.entries[self.cursor as usize].clone();
        self.cursor -= 1;
        self.sealed = true;
        Ok(action)
    }

    /// Steps forward, returning the entry the caller must re-apply.
    pub fn redo(&mut self) -> Result<Action, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        self.cursor += 1;
        self.sealed = true;
        Ok(self.entries[self.cursor as usize].clone())
    }

    /// Ends the current merge run; the next edit starts a new step.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn mark_saved(&mut self) {
        self.saved = Some(self.cursor);
    }

    /// Whether the applied history differs from the last saved state.
    pub fn is_dirty(&self) -> bool {
        self.saved != Some(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(column: isize, text: &str) -> Action {
        Action::insert(Location::new(0, column), text)
    }

    #[test]
    fn undo_and_redo_walk_the_cursor() {
        let mut log = ActionLog::new();
        log.push(typed(-1, "a"));
        log.push(typed(0, "b"));
        assert_eq!(log.cursor(), 1);

        assert_eq!(log.undo(), Ok(typed(0, "b")));
        assert_eq!(log.undo(), Ok(typed(-1, "a")));
        assert_eq!(log.undo(), Err(HistoryError::NothingToUndo));

        assert_eq!(log.redo(), Ok(typed(-1, "a")));
        assert_eq!(log.cursor(), 0);
    }

    #[test]
    fn push_after_undo_truncates_forward_entries() {
        let mut log = ActionLog::new();
        log.push(typed(-1, "a"));
        log.push(typed(0, "b"));
        log.undo().ok();
        log.push(typed(0, "c"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.redo(), Err(HistoryError::NothingToRedo));
    }

    #[test]
    fn dirty_tracks_saved_cursor() {
        let mut log = ActionLog::new();
        assert!(!log.is_dirty());
        log.push(typed(-1, "a"));
        assert!(log.is_dirty());
        log.mark_saved();
        assert!(!log.is_dirty());
        log.undo().ok();
        assert!(log.is_dirty());
        log.redo().ok();
        assert!(!log.is_dirty());
    }

    #[test]
    fn truncating_the_saved_entry_stays_dirty() {
        let mut log = ActionLog::new();
        log.push(typed(-1, "a"));
        log.mark_saved();
        log.undo().ok();
        log.push(typed(-1, "b"));
        log.undo().ok();
        assert!(log.is_dirty(), "saved state was discarded by truncation");
    }

    #[test]
    fn typing_runs_merge_contiguous_inserts() {
        let mut log = ActionLog::with_policy(TypingRuns);
        log.push(typed(-1, "h"));
        log.push(typed(0, "e"));
        log.push(typed(1, "y"));
        assert_eq!(log.entries(), &[typed(-1, "hey")]);

        log.push(typed(7, "!"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn typing_continues_after_an_opened_line() {
        let mut log = ActionLog::with_policy(TypingRuns);
        log.push(typed(2, "\n  "));
        log.push(Action::insert(Location::new(1, 1), "x"));
        assert_eq!(log.entries(), &[typed(2, "\n  x")]);

        log.push(Action::insert(Location::new(1, 2), "\n"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn insert_end_crosses_lines() {
        assert_eq!(typed(-1, "ab").end(), Location::new(0, 1));
        assert_eq!(typed(3, "\n").end(), Location::new(1, -1));
        assert_eq!(typed(3, "a\nb\ncd").end(), Location::new(2, 1));
    }

    #[test]
    fn typing_runs_merge_backspaces() {
        let mut log = ActionLog::with_policy(TypingRuns);
        log.push(Action::delete(Location::new(0, 4), "o"));
        log.push(Action::delete(Location::new(0, 3), "l"));
        assert_eq!(log.entries(), &[Action::delete(Location::new(0, 3), "lo")]);
    }

    #[test]
    fn seal_and_save_break_runs() {
        let mut log = ActionLog::with_policy(TypingRuns);
        log.push(typed(-1, "a"));
        log.seal();
        log.push(typed(0, "b"));
        assert_eq!(log.len(), 2);

        log.mark_saved();
        log.push(typed(1, "c"));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn never_merge_is_the_default() {
        let mut log = ActionLog::default();
        log.push(typed(-1, "a"));
        log.push(typed(0, "b"));
        assert_eq!(log.len(), 2);
    }
}
