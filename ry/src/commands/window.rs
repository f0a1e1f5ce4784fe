use crate::{
    chord::KeyChord,
    editor::{Editor, Message},
    window::{Direction, SplitKind},
};
use tracing::debug;

fn split(editor: &mut Editor, kind: SplitKind) {
    let buffer = editor.current_id();
    let id = editor.windows.split(kind, buffer);
    debug!(window = ?id, ?kind, "split window");
}

/// `C-w s`: a new window below.
pub fn split_horizontal(editor: &mut Editor, _: &KeyChord) {
    split(editor, SplitKind::Horizontal);
}

/// `C-w v`: a new window to the right.
pub fn split_vertical(editor: &mut Editor, _: &KeyChord) {
    split(editor, SplitKind::Vertical);
}

pub fn close(editor: &mut Editor, _: &KeyChord) {
    if !editor.windows.close_focused() {
        editor.set_message(Message::error("Can't close the last window."));
    }
}

fn focus(editor: &mut Editor, direction: Direction) {
    let moved = editor.windows.move_focus(direction);
    debug!(?direction, moved, focused = ?editor.windows.focused(), "move focus");
}

pub fn focus_left(editor: &mut Editor, _: &KeyChord) {
    focus(editor, Direction::Left);
}

pub fn focus_down(editor: &mut Editor, _: &KeyChord) {
    focus(editor, Direction::Down);
}

pub fn focus_up(editor: &mut Editor, _: &KeyChord) {
    focus(editor, Direction::Up);
}

pub fn focus_right(editor: &mut Editor, _: &KeyChord) {
    focus(editor, Direction::Right);
}
