//! Helpers for driving an [`Editor`] from tests.

use crate::editor::Editor;
use ry_text::{TextStore, TypingRuns};

impl Editor {
    /// An editor with an empty scratch buffer and in-memory collaborators.
    pub fn test() -> Self {
        Editor::new()
    }

    /// Replaces the current buffer's text, dropping its history. The cursor
    /// goes to the start.
    pub fn set_text(&mut self, text: &str) {
        let buffer = self.current_mut();
        let mut store = TextStore::from_text(buffer.name(), text);
        if let Some(path) = buffer.store.path() {
            store.set_path(path);
        }
        store.history_mut().set_policy(TypingRuns);
        buffer.store = store;
    }

    /// Feeds space separated keys, `SPC` being a space.
    #[track_caller]
    pub fn input(&mut self, keys: &str) {
        if let Err(err) = self.feed(keys) {
            panic!("bad key sequence {keys:?}: {err}");
        }
    }

    pub fn text(&self) -> String {
        self.store().contents()
    }

    /// The current editing mode.
    pub fn mode(&self) -> &str {
        self.current().editing_mode().unwrap_or_default()
    }

    pub fn message_text(&self) -> Option<&str> {
        self.message().map(|message| message.text.as_str())
    }

    /// The text with `|` inserted at the cursor.
    pub fn cursor_notation(&self) -> String {
        let mut text: Vec<char> = self.text().chars().collect();
        text.insert(self.store().cursor_offset(), '|');
        text.into_iter().collect()
    }

    #[track_caller]
    pub fn assert_cursor_notation(&self, expected: &str) {
        assert_eq!(self.cursor_notation(), expected);
    }
}
