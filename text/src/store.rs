use crate::{
    history::{Action, ActionKind, ActionLog, HistoryError},
    mark::{self, Mark, MarkId, MarkSet},
    Location,
};
use ropey::Rope;
use sha2::{Digest, Sha256};
use std::{
    ops::Range,
    path::{Path, PathBuf},
};
use tracing::debug;

/// SHA-256 of a buffer's contents.
pub type Checksum = [u8; 32];

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// The editable contents of one buffer.
///
/// Text lives in a [`ropey::Rope`] with `\n` as the only line break. The point is kept as a gap, the number of chars
/// before the cursor, and is reported in two shapes:
///
/// - [`TextStore::point`] names the char *after which* the next insertion
///   lands, so the start of a line is column `-1`.
/// - [`TextStore::cursor`] names the cell the cursor is drawn on, with
///   columns in `0..=line_len`.
///
/// Every edit goes through the [`ActionLog`], which also decides whether the
/// store counts as modified.
#[derive(Debug)]
pub struct TextStore {
    name: String,
    path: Option<PathBuf>,
    text: Rope,
    point: usize,
    marks: MarkSet,
    history: ActionLog,
    saved_checksum: Checksum,
    revision: u64,
}

impl TextStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_text(name, "")
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let text = Rope::from_str(text);
        let mut store = Self {
            name: name.into(),
            path: None,
            text,
            point: 0,
            marks: MarkSet::default(),
            history: ActionLog::new(),
            saved_checksum: [0; 32],
            revision: 0,
        };
        store.saved_checksum = store.checksum();
        store
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn contents(&self) -> String {
        self.text.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    /// A trailing newline starts one more, empty, line.
    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    /// Contents of `line` without its newline. Empty past the end.
    pub fn line(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let start = self.text.line_to_char(line);
        self.slice(start..start + self.raw_line_len(line))
    }

    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        self.raw_line_len(line)
    }

    fn raw_line_len(&self, line: usize) -> usize {
        let slice = self.text.line(line);
        let len = slice.len_chars();
        match len.checked_sub(1).map(|last| slice.char(last)) {
            Some('\n') => len - 1,
            _ => len,
        }
    }

    /// The chars in `range`, clamped to the text.
    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.len_chars());
        let start = range.start.min(end);
        self.text.slice(start..end).to_string()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().split('\n').map(str::to_owned).collect()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get_char(offset)
    }

    /// Bumped by every change to the text, undo and redo included.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &ActionLog {
        &self.history
    }

    /// Used to swap the merge policy or seal the current run.
    pub fn history_mut(&mut self) -> &mut ActionLog {
        &mut self.history
    }

    // Positions

    fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    /// Char offset of the char named by `location`, `-1` for the start of
    /// the buffer. Out of range locations are clamped.
    pub fn to_offset(&self, location: Location) -> isize {
        let line = location.line.min(self.last_line());
        let column = location.column.clamp(-1, self.raw_line_len(line) as isize);
        (self.text.line_to_char(line) as isize + column).min(self.len_chars() as isize - 1)
    }

    /// Inverse of [`TextStore::to_offset`]. A newline is named as the start
    /// of the line that follows it.
    pub fn to_location(&self, offset: isize) -> Location {
        let gap = (offset + 1).clamp(0, self.len_chars() as isize) as usize;
        self.gap_location(gap)
    }

    fn gap_of(&self, location: Location) -> usize {
        (self.to_offset(location) + 1) as usize
    }

    fn gap_location(&self, gap: usize) -> Location {
        let cell = self.cell_location(gap);
        Location::new(cell.line, cell.column - 1)
    }

    /// Clamps `location` to the text without canonicalizing it.
    pub fn clamp_location(&self, location: Location) -> Location {
        let line = location.line.min(self.last_line());
        let column = location.column.clamp(-1, self.raw_line_len(line) as isize);
        Location::new(line, column)
    }

    /// Char offset of a cursor cell.
    pub fn cell_offset(&self, cell: Location) -> usize {
        let line = cell.line.min(self.last_line());
        let column = cell.column.clamp(0, self.raw_line_len(line) as isize) as usize;
        self.text.line_to_char(line) + column
    }

    /// Cursor cell of a char offset.
    pub fn cell_location(&self, offset: usize) -> Location {
        let offset = offset.min(self.len_chars());
        let line = self.text.char_to_line(offset);
        Location::new(line, (offset - self.text.line_to_char(line)) as isize)
    }

    /// Cursor cell of a location in point form, such as a mark's.
    pub fn point_to_cell(&self, location: Location) -> Location {
        self.cell_location(self.gap_of(location))
    }

    pub fn point(&self) -> Location {
        self.gap_location(self.point)
    }

    pub fn set_point(&mut self, location: Location) {
        self.point = self.gap_of(location);
    }

    pub fn cursor(&self) -> Location {
        self.cell_location(self.point)
    }

    pub fn cursor_offset(&self) -> usize {
        self.point
    }

    /// Places the cursor on a cell, clamping both coordinates.
    pub fn set_cursor(&mut self, line: usize, column: isize) {
        self.point = self.cell_offset(Location::new(line, column));
    }

    /// Moves the cursor by `columns` and `lines`. The column is clamped to
    /// the target line.
    pub fn move_cursor(&mut self, columns: isize, lines: isize) {
        let cursor = self.cursor();
        let line = (cursor.line as isize + lines).clamp(0, self.last_line() as isize);
        self.set_cursor(line as usize, cursor.column + columns);
    }

    /// Moves the cursor to the start of the next word. Returns `false` when
    /// there is none.
    pub fn word_forward(&mut self) -> bool {
        let start = self.point;
        let mut gap = start;
        let mut in_word = true;
        for ch in self.text.chars_at(start) {
            if in_word && is_word(ch) {
                gap += 1;
                continue;
            }
            in_word = false;
            if is_word(ch) {
                break;
            }
            gap += 1;
        }
        if gap >= self.len_chars() || gap == start {
            return false;
        }
        self.point = gap;
        true
    }

    /// Moves the cursor to the start of the current or previous word.
    pub fn word_backward(&mut self) -> bool {
        let start = self.point;
        let mut gap = start;
        let before = |gap: usize| gap.checked_sub(1).and_then(|ix| self.text.get_char(ix));
        while before(gap).is_some_and(|ch| !is_word(ch)) {
            gap -= 1;
        }
        while before(gap).is_some_and(is_word) {
            gap -= 1;
        }
        if gap == start {
            return false;
        }
        self.point = gap;
        true
    }

    // Editing

    /// Inserts `text` right after the point and moves the point past it.
    pub fn insert(&mut self, text: &str) {
        self.insert_at(self.point(), text);
    }

    /// Inserts `text` right after `at` and moves the point past it.
    pub fn insert_at(&mut self, at: Location, text: &str) {
        if text.is_empty() {
            return;
        }
        let action = Action::insert(self.clamp_location(at), text);
        self.apply(&action);
        self.history.push(action);
    }

    /// Removes up to `count` chars after the point, returning what was
    /// removed. Nothing is recorded when nothing could be removed.
    pub fn delete(&mut self, count: usize) -> String {
        let count = count.min(self.len_chars() - self.point);
        if count == 0 {
            return String::new();
        }
        let removed = self.slice(self.point..self.point + count);
        let action = Action::delete(self.point(), removed.clone());
        self.apply(&action);
        self.history.push(action);
        removed
    }

    /// Removes the char before the point. Does nothing at the buffer start.
    pub fn backspace(&mut self) -> Option<char> {
        if self.point == 0 {
            return None;
        }
        self.point -= 1;
        self.delete(1).chars().next()
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let action = self.history.undo()?;
        debug!(buffer = %self.name, kind = ?action.kind, "undo");
        let gap = self.replay(&action.inverse());
        self.point = gap;
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let action = self.history.redo()?;
        debug!(buffer = %self.name, kind = ?action.kind, "redo");
        self.apply(&action);
        Ok(())
    }

    fn apply(&mut self, action: &Action) {
        let gap = self.replay(action);
        self.point = match action.kind {
            ActionKind::Insert => gap + action.len(),
            ActionKind::Delete => gap,
        };
    }

    /// Performs the text change of `action`, returning the gap it happened
    /// at.
    fn replay(&mut self, action: &Action) -> usize {
        let gap = self.gap_of(action.location);
        self.revision += 1;
        match action.kind {
            ActionKind::Insert => self.edit_insert(gap, &action.data),
            ActionKind::Delete => {
                let len = action.len().min(self.len_chars() - gap);
                self.edit_delete(gap, len);
            },
        }
        gap
    }

    fn edit_insert(&mut self, gap: usize, text: &str) {
        let tracked = self.tracked_marks();
        self.text.insert(gap, text);
        let len = text.chars().count();
        for (id, mark_gap) in tracked {
            let location = self.gap_location(mark::shift_for_insert(mark_gap, gap, len));
            self.marks.relocate(id, location);
        }
    }

    fn edit_delete(&mut self, gap: usize, len: usize) {
        let tracked = self.tracked_marks();
        self.text.remove(gap..gap + len);
        for (id, mark_gap) in tracked {
            let location = self.gap_location(mark::shift_for_delete(mark_gap, gap, len));
            self.marks.relocate(id, location);
        }
        let fixed: Vec<(MarkId, Location)> = self.marks.fixed().collect();
        for (id, location) in fixed {
            let clamped = self.clamp_location(location);
            self.marks.relocate(id, clamped);
        }
    }

    fn tracked_marks(&self) -> Vec<(MarkId, usize)> {
        self.marks
            .floating()
            .map(|(id, location)| (id, self.gap_of(location)))
            .collect()
    }

    // Saving

    pub fn checksum(&self) -> Checksum {
        let mut hasher = Sha256::new();
        for chunk in self.text.chunks() {
            hasher.update(chunk.as_bytes());
        }
        hasher.finalize().into()
    }

    /// Records the current contents as saved.
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
        self.history.seal();
        self.saved_checksum = self.checksum();
    }

    pub fn is_modified(&self) -> bool {
        self.history.is_dirty()
    }

    /// Whether the contents hash to what was last saved, regardless of the
    /// edits in between.
    pub fn matches_saved_checksum(&self) -> bool {
        self.checksum() == self.saved_checksum
    }

    // Marks

    /// Creates a mark at the point.
    pub fn create_mark(&mut self, fixed: bool) -> MarkId {
        self.create_mark_at(self.point(), fixed)
    }

    pub fn create_mark_at(&mut self, location: Location, fixed: bool) -> MarkId {
        let location = self.clamp_location(location);
        self.marks.create(location, fixed)
    }

    pub fn mark(&self, id: MarkId) -> Option<Mark> {
        self.marks.get(id)
    }

    pub fn delete_mark(&mut self, id: MarkId) -> bool {
        self.marks.remove(id)
    }

    /// Creates a mark at the point named `name`, replacing any earlier mark
    /// with that name.
    pub fn set_named_mark(&mut self, name: char, fixed: bool) -> MarkId {
        let id = self.create_mark(fixed);
        if let Some(previous) = self.marks.name(name, id) {
            self.marks.remove(previous);
            self.marks.name(name, id);
        }
        id
    }

    pub fn named_mark(&self, name: char) -> Option<MarkId> {
        self.marks.named(name)
    }

    /// Moves the point to a mark. Returns `false` for a deleted mark.
    pub fn goto_mark(&mut self, id: MarkId) -> bool {
        match self.marks.get(id) {
            Some(mark) => {
                self.set_point(mark.location);
                true
            },
            None => false,
        }
    }

    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    // Search

    /// Cursor cells of every literal match of `needle`, in document order.
    pub fn find_all(&self, needle: &str) -> Vec<Location> {
        if needle.is_empty() {
            return Vec::new();
        }
        let contents = self.contents();
        let mut results = Vec::new();
        let mut offset = 0;
        let mut last_byte = 0;
        for (byte_ix, _) in contents.match_indices(needle) {
            offset += contents[last_byte..byte_ix].chars().count();
            last_byte = byte_ix;
            results.push(self.cell_location(offset));
        }
        results
    }
}
