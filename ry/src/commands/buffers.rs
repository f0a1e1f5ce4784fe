//! The `*buffers*` list: one buffer name per line, `RET` to open one.

use super::BUFFERS;
use crate::{
    chord::KeyChord,
    editor::{Editor, Message},
    hooks::BufferEvent,
};
use ry_text::TextStore;
use tracing::debug;

pub const BUFFER_LIST: &str = "*buffers*";

/// Fills the `*buffers*` buffer with every other buffer's name and shows it
/// in the buffers mode.
pub fn show_list(editor: &mut Editor) {
    let names: Vec<&str> = editor
        .buffers()
        .iter()
        .map(|buffer| buffer.name())
        .filter(|name| *name != BUFFER_LIST)
        .collect();
    let listing = names.join("\n");
    let count = names.len();
    let id = match editor.buffer_by_name(BUFFER_LIST) {
        Some(id) => id,
        None => editor.new_buffer(BUFFER_LIST, ""),
    };
    if let Some(buffer) = editor.buffer_mut(id) {
        buffer.store = TextStore::from_text(BUFFER_LIST, &listing);
    }
    editor.show_buffer(id);
    if let Err(err) = editor.enter_mode(BUFFERS) {
        editor.set_message(Message::error(err.to_string()));
    }
    debug!(count, "listed buffers");
    editor.trigger_hooks(BufferEvent::Modified, id);
}

pub fn list(editor: &mut Editor, _: &KeyChord) {
    show_list(editor);
}

/// Closes the list. Windows showing it fall back to the first buffer.
pub fn close(editor: &mut Editor, _: &KeyChord) {
    let id = editor.current_id();
    editor.close_buffer(id, true);
}

/// Closes the list and shows the buffer named on the cursor line.
pub fn open(editor: &mut Editor, _: &KeyChord) {
    let name = editor.store().line(editor.store().cursor().line);
    let list = editor.current_id();
    editor.close_buffer(list, true);
    match editor.buffer_by_name(&name) {
        Some(id) => {
            editor.show_buffer(id);
        },
        None => editor.set_message(Message::error(format!("No buffer named '{name}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_skips_itself_and_refreshes() {
        let mut editor = Editor::test();
        editor.new_buffer("notes", "");
        show_list(&mut editor);
        assert_eq!(editor.current().name(), BUFFER_LIST);
        assert_eq!(editor.text(), "*scratch*\nnotes");
        assert!(editor.current().is_in_mode(BUFFERS));
        assert!(!editor.store().is_modified());

        editor.new_buffer("more", "");
        show_list(&mut editor);
        assert_eq!(editor.text(), "*scratch*\nnotes\nmore");
        assert_eq!(editor.buffers().len(), 4);
    }

    #[test]
    fn q_closes_the_list() {
        let mut editor = Editor::test();
        editor.new_buffer("notes", "");
        show_list(&mut editor);
        editor.input("q");
        assert_eq!(editor.current().name(), Editor::SCRATCH);
        assert_eq!(editor.buffer_by_name(BUFFER_LIST), None);
    }

    #[test]
    fn normal_motions_still_work_in_the_list() {
        let mut editor = Editor::test();
        editor.new_buffer("notes", "");
        show_list(&mut editor);
        editor.input("j RET");
        assert_eq!(editor.current().name(), "notes");
        assert_eq!(editor.buffer_by_name(BUFFER_LIST), None);
    }
}
