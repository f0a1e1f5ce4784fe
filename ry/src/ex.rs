//! Commands typed at the `:` prompt.

use crate::{
    commands,
    editor::{Editor, Message},
};
use std::fmt;
use tracing::debug;

/// Runs with the words after the command name.
pub type ExFn = fn(&mut Editor, &[&str]);

#[derive(Clone)]
pub struct ExCommand {
    pub names: Vec<String>,
    pub run: ExFn,
}

impl fmt::Debug for ExCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExCommand").field("names", &self.names).finish()
    }
}

/// The `:` command table. A command answers to each of its names.
#[derive(Clone, Debug, Default)]
pub struct ExCommands {
    commands: Vec<ExCommand>,
}

impl ExCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.register(&["quit", "q"], quit);
        table.register(&["quit!", "q!"], force_quit);
        table.register(&["write", "w"], write);
        table.register(&["writequit", "wq"], write_quit);
        table.register(&["edit", "e"], edit);
        table.register(&["buffers", "b"], buffers);
        table.register(&["set"], set);
        table.register(&["clearsearch", "cs"], clear_search);
        table.register(&["mode"], mode);
        table
    }

    /// Adds a command. Names registered later shadow earlier ones.
    pub fn register(&mut self, names: &[&str], run: ExFn) {
        self.commands.insert(
            0,
            ExCommand {
                names: names.iter().map(|name| name.to_string()).collect(),
                run,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&ExCommand> {
        self.commands
            .iter()
            .find(|command| command.names.iter().any(|n| n == name))
    }
}

impl Editor {
    pub fn register_ex_command(&mut self, names: &[&str], run: ExFn) {
        self.ex_commands.register(names, run);
    }
}

/// Parses and runs one command line such as `w notes.txt`.
pub fn run(editor: &mut Editor, line: &str) {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        editor.set_message(Message::error("No command given!"));
        return;
    };
    let args: Vec<&str> = words.collect();
    let Some(run) = editor.ex_commands.get(name).map(|command| command.run) else {
        editor.set_message(Message::error(format!("Unknown command '{name}'")));
        return;
    };
    debug!(command = name, ?args, "ex command");
    run(editor, &args);
}

fn close(editor: &mut Editor, force: bool) {
    let current = editor.current_id();
    editor.close_buffer(current, force);
}

fn quit(editor: &mut Editor, _: &[&str]) {
    close(editor, false);
}

fn force_quit(editor: &mut Editor, _: &[&str]) {
    close(editor, true);
}

fn write(editor: &mut Editor, args: &[&str]) {
    if let Some(path) = args.first() {
        editor.store_mut().set_path(*path);
    }
    editor.save_current();
}

fn write_quit(editor: &mut Editor, args: &[&str]) {
    write(editor, args);
    if !editor.store().is_modified() {
        close(editor, false);
    }
}

fn edit(editor: &mut Editor, args: &[&str]) {
    let Some(path) = args.first() else {
        editor.set_message(Message::error(
            "Can't open buffer without a name or file path.",
        ));
        return;
    };
    let existing = editor
        .buffers()
        .iter()
        .find(|buffer| buffer.store.path().is_some_and(|p| p.as_os_str() == *path))
        .map(|buffer| buffer.id);
    let id = match existing {
        Some(id) => id,
        None => editor.open_file(path),
    };
    editor.show_buffer(id);
}

/// Without a name, shows the `*buffers*` list.
fn buffers(editor: &mut Editor, args: &[&str]) {
    let Some(name) = args.first().map(|_| args.join(" ")) else {
        commands::buffers::show_list(editor);
        return;
    };
    match editor.buffer_by_name(&name) {
        Some(id) => {
            editor.show_buffer(id);
        },
        None => editor.set_message(Message::error(format!("No buffer named '{name}'"))),
    }
}

fn set(editor: &mut Editor, args: &[&str]) {
    let [name, value @ ..] = args else {
        editor.set_message(Message::error("Usage: set <name> <value>"));
        return;
    };
    if value.is_empty() {
        let message = match editor.settings().get(name) {
            Some(current) => Message::info(format!("{name} = {current}")),
            None => Message::error(format!("Unknown setting '{name}'")),
        };
        editor.set_message(message);
        return;
    }
    let value = value.join(" ");
    if let Err(err) = editor.settings_mut().set_from_str(name, &value) {
        editor.set_message(Message::error(err.to_string()));
    }
}

fn clear_search(editor: &mut Editor, _: &[&str]) {
    editor.search = Default::default();
}

fn mode(editor: &mut Editor, args: &[&str]) {
    let Some(name) = args.first() else {
        let modes = editor.current().modes.names().join(" ");
        editor.set_message(Message::info(modes));
        return;
    };
    if let Err(err) = editor.enter_mode(name) {
        editor.set_message(Message::error(err.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn storage_editor() -> Editor {
        Editor::new().with_persistence(MemoryStorage::new().with_file("/tmp/one.txt", "one"))
    }

    #[test]
    fn empty_and_unknown_commands() {
        let mut editor = Editor::new();
        run(&mut editor, "   ");
        assert_eq!(editor.message(), Some(&Message::error("No command given!")));
        run(&mut editor, "frobnicate now");
        assert_eq!(
            editor.message(),
            Some(&Message::error("Unknown command 'frobnicate'"))
        );
    }

    #[test]
    fn edit_opens_once() {
        let mut editor = storage_editor();
        run(&mut editor, "e /tmp/one.txt");
        assert_eq!(editor.current().name(), "one.txt");
        assert_eq!(editor.store().contents(), "one");
        run(&mut editor, "b *scratch*");
        run(&mut editor, "edit /tmp/one.txt");
        assert_eq!(editor.current().name(), "one.txt");
        assert_eq!(editor.buffers().len(), 2);
        run(&mut editor, "e");
        assert_eq!(
            editor.message(),
            Some(&Message::error("Can't open buffer without a name or file path."))
        );
    }

    #[test]
    fn write_and_quit() {
        let mut editor = storage_editor();
        run(&mut editor, "e /tmp/one.txt");
        editor.store_mut().insert("1");
        run(&mut editor, "q");
        assert_eq!(
            editor.message(),
            Some(&Message::error("Save buffer before closing it."))
        );
        run(&mut editor, "wq");
        assert_eq!(editor.current().name(), Editor::SCRATCH);
        assert_eq!(editor.buffers().len(), 1);
        run(&mut editor, "q!");
        assert!(editor.quit_requested());
    }

    #[test]
    fn write_to_a_new_path() {
        let mut editor = storage_editor();
        editor.store_mut().insert("scratch text");
        run(&mut editor, "w");
        assert_eq!(
            editor.message(),
            Some(&Message::error("Can't save a buffer without a path."))
        );
        run(&mut editor, "w /tmp/new.txt");
        assert_eq!(
            editor.message(),
            Some(&Message::info("Buffer written to '/tmp/new.txt'"))
        );
        assert!(!editor.store().is_modified());
    }

    #[test]
    fn set_reads_and_writes_settings() {
        let mut editor = Editor::new();
        run(&mut editor, "set tab_width 2");
        assert_eq!(editor.settings().number("tab_width"), Some(2));
        run(&mut editor, "set tab_width");
        assert_eq!(editor.message(), Some(&Message::info("tab_width = 2")));
        run(&mut editor, "set tab_width two");
        assert_eq!(
            editor.message(),
            Some(&Message::error("Can't read 'two' as a number for 'tab_width'"))
        );
        run(&mut editor, "set");
        assert_eq!(
            editor.message(),
            Some(&Message::error("Usage: set <name> <value>"))
        );
    }

    #[test]
    fn buffers_lists_and_switches() {
        let mut editor = Editor::new();
        editor.new_buffer("notes", "");
        run(&mut editor, "buffers");
        assert_eq!(editor.current().name(), "*buffers*");
        assert_eq!(editor.store().contents(), "*scratch*\nnotes");
        run(&mut editor, "b notes");
        assert_eq!(editor.current().name(), "notes");
        run(&mut editor, "b nope");
        assert_eq!(
            editor.message(),
            Some(&Message::error("No buffer named 'nope'"))
        );
    }

    #[test]
    fn mode_enters_by_name() {
        let mut editor = Editor::new();
        run(&mut editor, "mode insert");
        assert_eq!(editor.current().editing_mode(), Some("insert"));
        run(&mut editor, "mode nope");
        assert_eq!(editor.message(), Some(&Message::error("Unknown mode 'nope'")));
    }

    #[test]
    fn later_registrations_shadow() {
        fn shout(editor: &mut Editor, _: &[&str]) {
            editor.set_message(Message::info("shadowed"));
        }
        let mut editor = Editor::new();
        editor.register_ex_command(&["q"], shout);
        run(&mut editor, "q");
        assert_eq!(editor.message(), Some(&Message::info("shadowed")));
        assert!(!editor.quit_requested());
    }
}
