//! Literal search and `n`/`N` cycling.

use super::prompt::{self, PromptKind};
use crate::{
    chord::KeyChord,
    editor::{Editor, Message},
};
use ry_text::Location;
use tracing::debug;

/// The active search. Matches are recomputed from the needle on every
/// jump, so they stay valid across edits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Search {
    needle: Option<String>,
}

impl Search {
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }
}

impl Editor {
    /// Cursor cells of every match of the active search in the current
    /// buffer.
    pub fn search_results(&self) -> Vec<Location> {
        match self.search.needle() {
            Some(needle) => self.store().find_all(needle),
            None => Vec::new(),
        }
    }

    /// Starts a search for `needle` and jumps to the first match after the
    /// cursor.
    pub fn start_search(&mut self, needle: &str) {
        if needle.is_empty() {
            self.search.needle = None;
            return;
        }
        debug!(needle, "search");
        self.search.needle = Some(needle.to_string());
        self.jump_to_match(true);
    }

    fn jump_to_match(&mut self, forward: bool) {
        let results = self.search_results();
        let cursor = self.store().cursor();
        let target = if forward {
            results
                .iter()
                .find(|found| **found > cursor)
                .or_else(|| results.first())
        } else {
            results
                .iter()
                .rev()
                .find(|found| **found < cursor)
                .or_else(|| results.last())
        };
        match target.copied() {
            Some(found) => self.store_mut().set_cursor(found.line, found.column),
            None => self.set_message(Message::error("No search result.")),
        }
    }
}

pub fn prompt(editor: &mut Editor, _: &KeyChord) {
    prompt::open(editor, PromptKind::Search);
}

pub fn next(editor: &mut Editor, _: &KeyChord) {
    editor.jump_to_match(true);
}

pub fn prev(editor: &mut Editor, _: &KeyChord) {
    editor.jump_to_match(false);
}

pub fn clear(editor: &mut Editor, _: &KeyChord) {
    editor.search.needle = None;
}

#[cfg(test)]
mod tests {
    use crate::editor::Editor;

    #[test]
    fn search_cycles_with_wraparound() {
        let mut editor = Editor::test();
        editor.set_text("foo bar\nfoo baz\nfoo");
        editor.input("/ f o o RET");
        editor.assert_cursor_notation("foo bar\n|foo baz\nfoo");
        editor.input("n");
        editor.assert_cursor_notation("foo bar\nfoo baz\n|foo");
        editor.input("n");
        editor.assert_cursor_notation("|foo bar\nfoo baz\nfoo");
        editor.input("N");
        editor.assert_cursor_notation("foo bar\nfoo baz\n|foo");
        assert_eq!(editor.search_results().len(), 3);
        assert_eq!(editor.mode(), "normal");
    }

    #[test]
    fn no_result_reports() {
        let mut editor = Editor::test();
        editor.set_text("abc");
        editor.input("/ x y z RET");
        assert_eq!(editor.message_text(), Some("No search result."));
        editor.input("SPC n n");
        assert_eq!(editor.search().needle(), None);
        assert_eq!(editor.message_text(), Some("No search result."));
    }

    #[test]
    fn results_follow_edits() {
        let mut editor = Editor::test();
        editor.set_text("ab ab");
        editor.input("/ a b RET");
        editor.assert_cursor_notation("ab |ab");
        editor.input("g g i x ESC n");
        editor.assert_cursor_notation("x|ab ab");
        editor.input("n");
        editor.assert_cursor_notation("xab |ab");
    }
}
