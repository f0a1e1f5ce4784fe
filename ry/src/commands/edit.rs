//! Insert mode entry, deletion, registers and undo.

use super::{switch_mode, INSERT, NORMAL};
use crate::{
    chord::KeyChord,
    clipboard::DEFAULT_REGISTER,
    editor::{Editor, Message},
    key::KeyCode,
};

/// Clears the status message.
pub fn cancel(editor: &mut Editor, _: &KeyChord) {
    editor.clear_message();
}

pub fn insert_before(editor: &mut Editor, _: &KeyChord) {
    switch_mode(editor, INSERT);
}

pub fn insert_after(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().move_cursor(1, 0);
    switch_mode(editor, INSERT);
}

pub fn insert_line_start(editor: &mut Editor, _: &KeyChord) {
    let line = editor.store().cursor().line;
    editor.store_mut().set_cursor(line, 0);
    switch_mode(editor, INSERT);
}

pub fn insert_line_end(editor: &mut Editor, _: &KeyChord) {
    let line = editor.store().cursor().line;
    editor.store_mut().set_cursor(line, isize::MAX);
    switch_mode(editor, INSERT);
}

/// Opens a line below and starts inserting on it. The new line and what is
/// typed on it undo as one step.
pub fn open_below(editor: &mut Editor, _: &KeyChord) {
    let indent = line_indent(editor);
    switch_mode(editor, INSERT);
    let store = editor.store_mut();
    let line = store.cursor().line;
    store.set_cursor(line, isize::MAX);
    store.insert(&format!("\n{indent}"));
}

/// Opens a line above by breaking before the cursor line's first char, so
/// typing continues the same undo step as the break.
pub fn open_above(editor: &mut Editor, _: &KeyChord) {
    let indent = line_indent(editor);
    switch_mode(editor, INSERT);
    let store = editor.store_mut();
    let line = store.cursor().line;
    match line.checked_sub(1) {
        Some(above) => {
            store.set_cursor(above, isize::MAX);
            store.insert(&format!("\n{indent}"));
        },
        None => {
            store.set_cursor(0, 0);
            store.insert(&format!("{indent}\n"));
            store.set_cursor(0, indent.chars().count() as isize);
        },
    }
}

/// Leading spaces of the cursor line when `indent` is on.
fn line_indent(editor: &Editor) -> String {
    if !editor.setting_bool("indent", true) {
        return String::new();
    }
    let store = editor.store();
    store
        .line(store.cursor().line)
        .chars()
        .take_while(|ch| *ch == ' ')
        .collect()
}

pub fn delete_char(editor: &mut Editor, _: &KeyChord) {
    let removed = editor.store_mut().delete(1);
    if !removed.is_empty() {
        editor.clipboard.set(DEFAULT_REGISTER, removed);
    }
}

/// Deletes the cursor line, newline included, into the default register.
pub fn delete_line(editor: &mut Editor, _: &KeyChord) {
    let store = editor.store_mut();
    let line = store.cursor().line;
    let len = store.line_len(line);
    store.set_cursor(line, 0);
    let mut removed = store.delete(len + 1);
    if !removed.ends_with('\n') {
        removed.push('\n');
    }
    editor.clipboard.set(DEFAULT_REGISTER, removed);
}

pub fn yank_line(editor: &mut Editor, _: &KeyChord) {
    let store = editor.store();
    let line = format!("{}\n", store.line(store.cursor().line));
    editor.clipboard.set(DEFAULT_REGISTER, line);
}

/// Inserts the default register at the point.
pub fn paste(editor: &mut Editor, _: &KeyChord) {
    match editor.clipboard.get(DEFAULT_REGISTER) {
        Some(text) if !text.is_empty() => editor.store_mut().insert(&text),
        _ => editor.set_message(Message::error("Nothing to paste!")),
    }
}

pub fn undo(editor: &mut Editor, _: &KeyChord) {
    if let Err(err) = editor.store_mut().undo() {
        editor.set_message(Message::error(err.to_string()));
    }
}

pub fn redo(editor: &mut Editor, _: &KeyChord) {
    if let Err(err) = editor.store_mut().redo() {
        editor.set_message(Message::error(err.to_string()));
    }
}

/// Back to normal mode, stepping the cursor back onto the last typed char.
pub fn insert_exit(editor: &mut Editor, _: &KeyChord) {
    editor.store_mut().move_cursor(-1, 0);
    switch_mode(editor, NORMAL);
}

pub fn insert_newline(editor: &mut Editor, _: &KeyChord) {
    let indent = line_indent(editor);
    editor.store_mut().insert(&format!("\n{indent}"));
}

/// Removes the char before the cursor. A run of spaces is removed up to a
/// tab width at a time when tabs are expanded to spaces.
pub fn insert_backspace(editor: &mut Editor, _: &KeyChord) {
    let tab_width = editor.setting_number("tab_width", 4).max(1) as usize;
    let expand = editor.setting_bool("tab_to_spaces", true);
    let store = editor.store_mut();
    let cursor = store.cursor();
    if cursor.column == 0 {
        if cursor.line > 0 {
            store.backspace();
        }
        return;
    }
    let before = store.line(cursor.line);
    let spaces = before
        .chars()
        .take(cursor.column as usize)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .take_while(|ch| *ch == ' ')
        .count();
    if !expand || spaces == 0 {
        store.backspace();
        return;
    }
    let count = spaces.min(tab_width);
    store.move_cursor(-(count as isize), 0);
    store.delete(count);
}

/// Inserts the typed key. Tab follows `tab_to_spaces`.
pub fn insert_key(editor: &mut Editor, keys: &KeyChord) {
    let Some(key) = keys.last().copied() else {
        return;
    };
    if key.code == KeyCode::Tab && key.modifiers.is_empty() {
        let text = if editor.setting_bool("tab_to_spaces", true) {
            " ".repeat(editor.setting_number("tab_width", 4).max(1) as usize)
        } else {
            "\t".to_string()
        };
        editor.store_mut().insert(&text);
        return;
    }
    match key.plain_rune() {
        Some(rune) if key.code == KeyCode::Char => {
            editor.store_mut().insert(rune.encode_utf8(&mut [0; 4]));
        },
        _ => editor.set_message(Message::error(format!("Can't insert '{key}'"))),
    }
}

#[cfg(test)]
mod tests {
    use crate::{clipboard::DEFAULT_REGISTER, editor::Editor};

    #[test]
    fn typing_is_one_undo_step() {
        let mut editor = Editor::test();
        editor.set_text("end");
        editor.input("i h e l l o SPC ESC");
        editor.assert_cursor_notation("hello| end");
        assert_eq!(editor.mode(), "normal");
        editor.input("u");
        editor.assert_cursor_notation("|end");
        editor.input("C-r");
        assert_eq!(editor.text(), "hello end");
        editor.input("C-r");
        assert_eq!(editor.message_text(), Some("Nothing to redo!"));
    }

    #[test]
    fn separate_insert_sessions_undo_separately() {
        let mut editor = Editor::test();
        editor.input("i a b ESC a c d ESC");
        assert_eq!(editor.text(), "abcd");
        editor.input("u");
        assert_eq!(editor.text(), "ab");
        editor.input("u u");
        assert_eq!(editor.text(), "");
        assert_eq!(editor.message_text(), Some("Nothing to undo!"));
    }

    #[test]
    fn append_and_open_lines() {
        let mut editor = Editor::test();
        editor.set_text("  one\ntwo");
        editor.input("A ! ESC o x ESC");
        assert_eq!(editor.text(), "  one!\n  x\ntwo");
        editor.input("j O y ESC");
        assert_eq!(editor.text(), "  one!\n  x\ny\ntwo");
        editor.input("I > ESC");
        assert_eq!(editor.text(), "  one!\n  x\n>y\ntwo");
    }

    #[test]
    fn opened_line_undoes_in_one_step() {
        let mut editor = Editor::test();
        editor.set_text("  one\ntwo");
        editor.input("o x ESC");
        assert_eq!(editor.text(), "  one\n  x\ntwo");
        editor.input("u");
        assert_eq!(editor.text(), "  one\ntwo");
        assert!(!editor.store().is_modified());

        editor.input("j O y ESC");
        assert_eq!(editor.text(), "  one\ny\ntwo");
        editor.input("u");
        assert_eq!(editor.text(), "  one\ntwo");
        editor.input("C-r");
        assert_eq!(editor.text(), "  one\ny\ntwo");
    }

    #[test]
    fn newline_keeps_indent() {
        let mut editor = Editor::test();
        editor.set_text("    body");
        editor.input("A RET x");
        editor.assert_cursor_notation("    body\n    x|");
        editor.settings_mut().set("indent", false).unwrap();
        editor.input("RET y");
        editor.assert_cursor_notation("    body\n    x\ny|");
    }

    #[test]
    fn backspace_removes_tab_runs_and_joins_lines() {
        let mut editor = Editor::test();
        editor.set_text("ab\n");
        editor.input("G i TAB TAB x");
        assert_eq!(editor.text(), "ab\n        x");
        editor.input("BAK BAK");
        assert_eq!(editor.text(), "ab\n    ");
        editor.input("BAK BAK BAK");
        editor.assert_cursor_notation("a|");
    }

    #[test]
    fn tab_inserts_a_tab_when_not_expanding() {
        let mut editor = Editor::test();
        editor.settings_mut().set("tab_to_spaces", false).unwrap();
        editor.input("i TAB");
        assert_eq!(editor.text(), "\t");
    }

    #[test]
    fn modified_keys_are_not_inserted() {
        let mut editor = Editor::test();
        editor.input("i C-x");
        assert_eq!(editor.text(), "");
        assert_eq!(editor.message_text(), Some("Can't insert 'C-x'"));
    }

    #[test]
    fn delete_yank_and_paste_lines() {
        let mut editor = Editor::test();
        editor.set_text("one\ntwo\nthree");
        editor.input("j d d");
        editor.assert_cursor_notation("one\n|three");
        assert_eq!(editor.clipboard().get(DEFAULT_REGISTER).as_deref(), Some("two\n"));
        editor.input("p");
        assert_eq!(editor.text(), "one\ntwo\nthree");
        editor.input("g g y y G $ p");
        assert_eq!(editor.text(), "one\ntwo\nthreeone\n");
    }

    #[test]
    fn x_deletes_into_register() {
        let mut editor = Editor::test();
        editor.set_text("abc");
        editor.input("l x");
        editor.assert_cursor_notation("a|c");
        assert_eq!(editor.clipboard().get(DEFAULT_REGISTER).as_deref(), Some("b"));
    }

    #[test]
    fn paste_with_empty_register() {
        let mut editor = Editor::test();
        editor.input("p");
        assert_eq!(editor.message_text(), Some("Nothing to paste!"));
    }
}
