use crate::{
    chord::KeyChord,
    editor::{Editor, Message},
};

fn letter(keys: &KeyChord) -> Option<char> {
    keys.last().and_then(|key| key.plain_rune())
}

/// `m <letter>`: remembers the cursor under a letter. The mark follows edits
/// made before it.
pub fn set(editor: &mut Editor, keys: &KeyChord) {
    if let Some(name) = letter(keys) {
        editor.store_mut().set_named_mark(name, false);
    }
}

/// `' <letter>`
pub fn goto(editor: &mut Editor, keys: &KeyChord) {
    let Some(name) = letter(keys) else {
        return;
    };
    let store = editor.store_mut();
    let found = store.named_mark(name).is_some_and(|id| store.goto_mark(id));
    if !found {
        editor.set_message(Message::error(format!("No mark '{name}'")));
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::Editor;

    #[test]
    fn marks_follow_edits_before_them() {
        let mut editor = Editor::test();
        editor.set_text("alpha\nbeta");
        editor.input("j l m a g g");
        editor.assert_cursor_notation("|alpha\nbeta");
        editor.input("i > > ESC ' a");
        editor.assert_cursor_notation(">>alpha\nb|eta");
    }

    #[test]
    fn missing_mark_reports() {
        let mut editor = Editor::test();
        editor.input("' q");
        assert_eq!(editor.message_text(), Some("No mark 'q'"));
    }

    #[test]
    fn setting_a_mark_again_moves_it() {
        let mut editor = Editor::test();
        editor.set_text("abc");
        editor.input("m a l l m a 0 ' a");
        editor.assert_cursor_notation("ab|c");
        assert_eq!(editor.store().mark_count(), 1);
    }
}
