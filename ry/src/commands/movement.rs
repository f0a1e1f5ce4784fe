use crate::{chord::KeyChord, editor::Editor, hooks::BufferEvent};

pub fn left(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().move_cursor(-1, 0);
}

pub fn right(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().move_cursor(1, 0);
}

pub fn up(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().move_cursor(0, -1);
}

pub fn down(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().move_cursor(0, 1);
}

pub fn line_start(editor: &mut Editor, _: &KeyChord) {
    let line = editor.store().cursor().line;
    editor.store_mut().set_cursor(line, 0);
}

pub fn line_end(editor: &mut Editor, _: &KeyChord) {
    let line = editor.store().cursor().line;
    editor.store_mut().set_cursor(line, isize::MAX);
}

pub fn top(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().set_cursor(0, 0);
}

pub fn bottom(editor: &mut Editor, _: &KeyChord) {
    let store = editor.store_mut();
    let last = store.line_count() - 1;
    store.set_cursor(last, 0);
}

fn scroll_jump(editor: &Editor) -> isize {
    editor.setting_number("scroll_jump", 15).max(1) as isize
}

pub fn page_up(editor: &mut Editor, _: &KeyChord) {
    let jump = scroll_jump(editor);
    editor.store_mut().move_cursor(0, -jump);
}

pub fn page_down(editor: &mut Editor, _: &KeyChord) {
    let jump = scroll_jump(editor);
    editor.store_mut().move_cursor(0, jump);
}

pub fn word_forward(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().word_forward();
}

pub fn word_backward(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().word_backward();
}

/// Recenters the focused window on the cursor, right away once it has been
/// drawn.
pub fn center(editor: &mut Editor, _: &KeyChord) {
    if let Some(leaf) = editor.windows.focused_leaf_mut() {
        leaf.center_pending = true;
    }
    let id = editor.current_id();
    editor.trigger_hooks(BufferEvent::Moved, id);
}
