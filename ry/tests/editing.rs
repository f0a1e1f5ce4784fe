use ry::{
    Dispatch, Editor, KeyChord, KeyStroke, MemoryStorage, ModeCategory, RawKey, ScriptTask,
    SplitKind,
};
use std::path::Path;

fn editor() -> Editor {
    ry_log::test();
    Editor::test()
}

#[test]
fn g_then_g_dispatches_the_longer_binding() {
    let mut editor = editor();
    editor.set_text("one\ntwo\nthree");
    editor.input("G");
    assert_eq!(editor.handle_key(KeyStroke::char('g')), Dispatch::Pending);
    assert_eq!(
        editor.handle_key(KeyStroke::char('g')),
        Dispatch::Handled(KeyChord::parse("g g").unwrap())
    );
    editor.assert_cursor_notation("|one\ntwo\nthree");
}

#[test]
fn insert_then_undo_restores_point() {
    let mut editor = editor();
    editor.set_text("hello\nworld");
    editor.input("i X ESC");
    assert_eq!(editor.store().lines(), vec!["Xhello", "world"]);
    editor.input("u");
    assert_eq!(editor.store().lines(), vec!["hello", "world"]);
    assert_eq!(editor.store().point(), ry_text::Location::START);
}

#[test]
fn undo_all_then_redo_all() {
    let mut editor = editor();
    editor.set_text("base");
    editor.input("i a ESC A RET b ESC d d o c ESC");
    let done = editor.text();
    let steps = editor.store().history().cursor() + 1;
    for _ in 0..steps {
        editor.input("u");
    }
    assert_eq!(editor.text(), "base");
    for _ in 0..steps {
        editor.input("C-r");
    }
    assert_eq!(editor.text(), done);
    editor.input("u i z ESC C-r");
    assert_eq!(editor.message_text(), Some("Nothing to redo!"));
}

#[test]
fn user_mode_with_catch_all() {
    let mut editor = editor();
    editor
        .apply_config(
            r#"
mode shout editing
bind shout "$any" -> insert_key
bind shout "x" -> delete_char
bind shout "ESC" -> insert_exit
"#,
        )
        .unwrap();
    editor.set_text("abc");
    editor.input(": m o d e SPC s h o u t RET");
    assert_eq!(editor.mode(), "shout");
    editor.input("x y z");
    assert_eq!(editor.text(), "yzbc");
    editor.input("ESC");
    assert_eq!(editor.mode(), "normal");
}

#[test]
fn minor_modes_layer_over_normal() {
    let mut editor = editor();
    editor.define_mode("zen", ModeCategory::Minor).unwrap();
    editor.bind("zen", "Q", "move_bottom").unwrap();
    editor.set_text("a\nb\nc");
    editor.input("Q");
    editor.assert_cursor_notation("|a\nb\nc");
    editor.enter_mode("zen").unwrap();
    editor.input("Q");
    editor.assert_cursor_notation("a\nb\n|c");
    assert_eq!(editor.current().modes.names(), vec!["normal", "zen"]);
}

#[test]
fn raw_terminal_keys() {
    let mut editor = editor();
    editor.input("i");
    for rune in "hi\r".chars() {
        let key = KeyStroke::from_raw(RawKey::rune(rune)).unwrap();
        editor.handle_key(key);
    }
    editor.handle_key(KeyStroke::from_raw(RawKey::rune('\u{7f}')).unwrap());
    editor.handle_key(KeyStroke::from_raw(RawKey::rune('\u{7f}')).unwrap());
    editor.handle_key(KeyStroke::from_raw(RawKey::rune('\u{1b}')).unwrap());
    assert_eq!(editor.text(), "h");
    assert_eq!(editor.mode(), "normal");
}

#[test]
fn windows_share_buffers_and_follow_closes() {
    let mut editor = editor();
    let notes = editor.new_buffer("notes", "some notes");
    editor.input("C-w v");
    editor.input(": b SPC n o t e s RET");
    assert_eq!(editor.windows().focused_buffer(), Some(notes));
    editor.input("C-w h");
    assert_eq!(editor.current().name(), Editor::SCRATCH);
    editor.input("C-w l : q RET");
    let shown: Vec<_> = editor
        .windows()
        .leaves()
        .into_iter()
        .filter_map(|id| editor.windows().leaf(id).map(|leaf| leaf.buffer))
        .collect();
    assert_eq!(shown, vec![editor.current_id(), editor.current_id()]);
    assert_eq!(editor.buffers().len(), 1);
}

#[test]
fn split_kinds_lay_out_as_named() {
    let mut editor = editor();
    editor.input("C-w v");
    let frame = editor.frame(81, 21);
    let widths: Vec<u16> = frame.panes.iter().map(|pane| pane.rect.width).collect();
    assert_eq!(widths, vec![40, 41]);
    editor.input("C-w s");
    let frame = editor.frame(81, 21);
    let heights: Vec<u16> = frame.panes.iter().map(|pane| pane.rect.height).collect();
    assert_eq!(heights, vec![20, 10, 10]);
    let split = editor
        .windows()
        .parent(editor.windows().focused())
        .and_then(|id| editor.windows().node(id).cloned());
    assert!(matches!(
        split.map(|node| node.kind),
        Some(ry::window::NodeKind::Split(ry::window::Split {
            kind: SplitKind::Horizontal,
            ..
        }))
    ));
}

#[test]
fn save_through_the_prompt() {
    let mut editor = editor().with_persistence(MemoryStorage::new());
    editor.input("i s a v e d ESC : w SPC / t m p / s a v e d . t x t RET");
    assert_eq!(
        editor.message_text(),
        Some("Buffer written to '/tmp/saved.txt'")
    );
    let saved = editor
        .persistence()
        .unwrap()
        .load(Path::new("/tmp/saved.txt"))
        .unwrap();
    assert_eq!(saved, "saved");
    assert!(!editor.store().is_modified());
    editor.input("x");
    assert!(editor.store().is_modified());
    editor.input("u");
    assert!(!editor.store().is_modified());
}

#[test]
fn script_tasks_edit_through_the_queue() {
    let mut editor = editor();
    editor.new_buffer("log", "");
    let task = ScriptTask::spawn(editor.mutation_sender(), |sender| {
        for n in 0..3 {
            sender.insert(Some("log"), format!("{n}\n")).unwrap();
        }
        sender.set_setting("scripted", true).unwrap();
        sender
            .apply(|editor: &mut Editor| {
                let id = editor.buffer_by_name("log").unwrap();
                editor.show_buffer(id);
            })
            .unwrap();
        "finished"
    });
    assert_eq!(task.force(), Ok("finished"));
    assert_eq!(editor.drain_mutations(), 5);
    assert_eq!(editor.current().name(), "log");
    assert_eq!(editor.text(), "0\n1\n2\n");
    assert_eq!(editor.settings().bool("scripted"), Some(true));
}

#[test]
fn frame_reports_prompt_and_modes() {
    let mut editor = editor();
    editor.input(": w q");
    let frame = editor.frame(40, 10);
    assert_eq!(frame.prompt.as_deref(), Some(":wq"));
    assert_eq!(frame.modes, vec!["prompt"]);
    editor.input("ESC C-w");
    let frame = editor.frame(40, 10);
    assert_eq!(frame.prompt, None);
    assert_eq!(frame.pending_keys, "C-w");
    assert_eq!(frame.panes[0].rect.height, 9);
}

#[test]
fn buffer_list_opens_the_named_buffer() {
    let mut editor = editor();
    editor.new_buffer("notes", "some notes");
    editor.input(": b RET");
    assert_eq!(editor.current().name(), "*buffers*");
    assert_eq!(editor.text(), "*scratch*\nnotes");
    assert_eq!(editor.current().modes.names(), vec!["normal", "buffers"]);

    editor.input("j RET");
    assert_eq!(editor.current().name(), "notes");
    assert_eq!(editor.text(), "some notes");
    assert!(editor.buffer_by_name("*buffers*").is_none());

    editor.input("SPC b");
    assert_eq!(editor.current().name(), "*buffers*");
    editor.input("q");
    assert_eq!(editor.current().name(), Editor::SCRATCH);
    assert_eq!(editor.buffers().len(), 2);
}
