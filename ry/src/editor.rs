use crate::{
    buffer::{Buffer, BufferId},
    chord::KeyChord,
    clipboard::{Clipboard, Registers},
    command::{CommandError, CommandFn, CommandRegistry},
    commands::{self, prompt::Prompt, search::Search},
    ex::ExCommands,
    hooks::BufferHooks,
    mode::{Mode, ModeCategory, ModeError, ModeRegistry},
    persistence::Persistence,
    queue::{Mutation, MutationSender},
};
use futures::{channel::mpsc, FutureExt, StreamExt};
use ry_config::Settings;
use ry_text::TextStore;
use std::{fmt, path::Path};
use tracing::{debug, info, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// The transient line shown at the bottom of the screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Everything the editing loop owns: buffers, windows, modes, bindings,
/// settings and the collaborators commands talk to.
pub struct Editor {
    buffers: Vec<Buffer>,
    next_buffer: usize,
    pub(crate) windows: crate::window::WindowTree,
    modes: ModeRegistry,
    commands: CommandRegistry,
    pub(crate) ex_commands: ExCommands,
    global: Mode,
    settings: Settings,
    pub(crate) pending: KeyChord,
    pub(crate) last_keys: KeyChord,
    message: Option<Message>,
    pub(crate) search: Search,
    pub(crate) clipboard: Box<dyn Clipboard>,
    persistence: Option<Box<dyn Persistence>>,
    pub(crate) prompt: Option<Prompt>,
    pub(crate) hooks: BufferHooks,
    sender: MutationSender,
    mutations: mpsc::UnboundedReceiver<Mutation>,
    quit_requested: bool,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("buffers", &self.buffers)
            .field("windows", &self.windows)
            .field("pending", &self.pending)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub const SCRATCH: &'static str = "*scratch*";

    /// An editor with one empty scratch buffer and the builtin modes,
    /// commands and bindings.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded();
        let scratch = Buffer::new(BufferId(0), TextStore::new(Self::SCRATCH));
        let mut editor = Self {
            windows: crate::window::WindowTree::new(scratch.id),
            buffers: vec![scratch],
            next_buffer: 1,
            modes: ModeRegistry::new(),
            commands: CommandRegistry::new(),
            ex_commands: ExCommands::builtin(),
            global: Mode::new("global", ModeCategory::Minor),
            settings: Settings::with_defaults(),
            pending: KeyChord::new(),
            last_keys: KeyChord::new(),
            message: None,
            search: Search::default(),
            clipboard: Box::new(Registers::new()),
            persistence: None,
            prompt: None,
            hooks: BufferHooks::new(),
            sender: MutationSender::new(tx),
            mutations: rx,
            quit_requested: false,
        };
        commands::register_builtins(&mut editor);
        editor
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn with_persistence(mut self, persistence: impl Persistence + 'static) -> Self {
        self.persistence = Some(Box::new(persistence));
        self
    }

    // Buffers

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.iter().find(|b| b.id == id)
    }

    pub fn buffer_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|b| b.id == id)
    }

    pub fn buffer_by_name(&self, name: &str) -> Option<BufferId> {
        self.buffers.iter().find(|b| b.name() == name).map(|b| b.id)
    }

    fn current_index(&self) -> usize {
        self.windows
            .focused_buffer()
            .and_then(|id| self.buffers.iter().position(|b| b.id == id))
            .unwrap_or(0)
    }

    /// The buffer of the focused window.
    pub fn current(&self) -> &Buffer {
        &self.buffers[self.current_index()]
    }

    pub fn current_mut(&mut self) -> &mut Buffer {
        let ix = self.current_index();
        &mut self.buffers[ix]
    }

    pub fn current_id(&self) -> BufferId {
        self.current().id
    }

    pub fn store(&self) -> &TextStore {
        &self.current().store
    }

    pub fn store_mut(&mut self) -> &mut TextStore {
        &mut self.current_mut().store
    }

    /// `name`, or `name` with the first free numeric suffix.
    fn unique_name(&self, name: &str) -> String {
        if self.buffer_by_name(name).is_none() {
            return name.to_string();
        }
        (1..)
            .map(|n| format!("{name} {n}"))
            .find(|candidate| self.buffer_by_name(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    /// Adds a buffer holding `store`. Its name is made unique.
    pub fn add_buffer(&mut self, mut store: TextStore) -> BufferId {
        let name = self.unique_name(store.name());
        store.set_name(name);
        let id = BufferId(self.next_buffer);
        self.next_buffer += 1;
        debug!(buffer = %id, name = store.name(), "new buffer");
        self.buffers.push(Buffer::new(id, store));
        id
    }

    pub fn new_buffer(&mut self, name: &str, text: &str) -> BufferId {
        self.add_buffer(TextStore::from_text(name, text))
    }

    /// Opens `path` into a new buffer named after the file. A missing file
    /// gives an empty buffer that saves to `path`.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> BufferId {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let loaded = match &self.persistence {
            Some(persistence) => persistence.load(path),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "no storage available",
            )),
        };
        let text = match loaded {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to load file");
                self.set_message(Message::error(format!("Error opening file: {err}")));
                String::new()
            },
        };
        let store = TextStore::from_text(name, &text).with_path(path);
        self.add_buffer(store)
    }

    /// Shows `id` in the focused window.
    pub fn show_buffer(&mut self, id: BufferId) -> bool {
        if self.buffer(id).is_none() {
            return false;
        }
        if let Some(leaf) = self.windows.focused_leaf_mut() {
            leaf.buffer = id;
            leaf.top_line = 0;
        }
        true
    }

    /// Writes the current buffer to its path.
    pub fn save_current(&mut self) -> bool {
        self.save_buffer(self.current_id())
    }

    /// Writes buffer `id` to its path, reporting the outcome as a message.
    pub fn save_buffer(&mut self, id: BufferId) -> bool {
        let Some(buffer) = self.buffer(id) else {
            return false;
        };
        let Some(path) = buffer.store.path().map(Path::to_path_buf) else {
            self.set_message(Message::error("Can't save a buffer without a path."));
            return false;
        };
        let contents = buffer.store.contents();
        let result = match self.persistence.as_mut() {
            Some(persistence) => persistence.save(&path, &contents),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "no storage available",
            )),
        };
        match result {
            Ok(()) => {
                if let Some(buffer) = self.buffer_mut(id) {
                    buffer.store.mark_saved();
                }
                info!(path = %path.display(), "buffer written");
                self.set_message(Message::info(format!(
                    "Buffer written to '{}'",
                    path.display()
                )));
                true
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to save buffer");
                self.set_message(Message::error(format!("Error saving buffer: {err}")));
                false
            },
        }
    }

    /// Closes a buffer. Windows showing it switch to another buffer; closing
    /// the last buffer asks the editor to quit.
    pub fn close_buffer(&mut self, id: BufferId, force: bool) -> bool {
        let Some(ix) = self.buffers.iter().position(|b| b.id == id) else {
            return false;
        };
        if self.buffers[ix].store.is_modified() && !force {
            self.set_message(Message::error("Save buffer before closing it."));
            return false;
        }
        if self.buffers.len() == 1 {
            self.quit_requested = true;
            return true;
        }
        self.buffers.remove(ix);
        let replacement = self.buffers[0].id;
        self.windows.retarget(id, replacement);
        debug!(buffer = %id, "closed buffer");
        true
    }

    // Modes and bindings

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn global_bindings(&self) -> &Mode {
        &self.global
    }

    pub fn define_mode(&mut self, name: &str, category: ModeCategory) -> Result<(), ModeError> {
        self.modes.define(name, category)
    }

    pub fn register_command(&mut self, name: &str, run: CommandFn) -> Result<(), CommandError> {
        self.commands.register(name, run)
    }

    /// Binds `pattern` in `mode` to a registered command.
    pub fn bind(&mut self, mode: &str, pattern: &str, command: &str) -> Result<(), BindError> {
        self.check_command(command)?;
        self.modes.bind(mode, pattern, command)?;
        Ok(())
    }

    /// Binds `pattern` in the layer searched after every mode.
    pub fn bind_global(&mut self, pattern: &str, command: &str) -> Result<(), BindError> {
        self.check_command(command)?;
        let chord = parse_pattern(pattern)?;
        self.global.bind(chord, command);
        Ok(())
    }

    /// Binds `pattern` for the current buffer only, ahead of its modes.
    pub fn bind_local(&mut self, pattern: &str, command: &str) -> Result<(), BindError> {
        self.check_command(command)?;
        let chord = parse_pattern(pattern)?;
        self.current_mut().local.bind(chord, command);
        Ok(())
    }

    fn check_command(&self, command: &str) -> Result<(), CommandError> {
        if self.commands.contains(command) {
            Ok(())
        } else {
            Err(CommandError::Unknown(command.into()))
        }
    }

    /// Activates a mode on the current buffer. Switching editing modes ends
    /// the current undo run.
    pub fn enter_mode(&mut self, name: &str) -> Result<(), ModeError> {
        let category = self
            .modes
            .category(name)
            .ok_or_else(|| ModeError::Unknown(name.into()))?;
        let buffer = self.current_mut();
        buffer.modes.add(name, category);
        if category == ModeCategory::Editing {
            buffer.store.history_mut().seal();
        }
        debug!(mode = name, %category, "entered mode");
        Ok(())
    }

    pub fn leave_mode(&mut self, name: &str) -> bool {
        self.current_mut().modes.remove(name)
    }

    /// The layers a key is looked up in, first match winning: the buffer's
    /// local bindings, its major, editing and minor modes, then the global
    /// bindings.
    pub(crate) fn layers(&self) -> Vec<&Mode> {
        let buffer = self.current();
        let mut layers = vec![&buffer.local];
        layers.extend(
            buffer
                .modes
                .search_order()
                .into_iter()
                .filter_map(|name| self.modes.get(name)),
        );
        layers.push(&self.global);
        layers
    }

    // Settings

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub(crate) fn setting_number(&self, name: &str, default: i64) -> i64 {
        self.settings.number(name).unwrap_or(default)
    }

    pub(crate) fn setting_bool(&self, name: &str, default: bool) -> bool {
        self.settings.bool(name).unwrap_or(default)
    }

    // Status

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn set_message(&mut self, message: Message) {
        debug!(kind = ?message.kind, text = %message.text, "message");
        self.message = Some(message);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn pending_keys(&self) -> &KeyChord {
        &self.pending
    }

    pub fn last_keys(&self) -> &KeyChord {
        &self.last_keys
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn windows(&self) -> &crate::window::WindowTree {
        &self.windows
    }

    pub fn clipboard(&self) -> &dyn Clipboard {
        self.clipboard.as_ref()
    }

    pub fn persistence(&self) -> Option<&dyn Persistence> {
        self.persistence.as_deref()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    // Mutation queue

    /// A handle other threads use to hand edits to this editor.
    pub fn mutation_sender(&self) -> MutationSender {
        self.sender.clone()
    }

    /// Applies every queued mutation, in order. Returns how many ran.
    pub fn drain_mutations(&mut self) -> usize {
        let mut count = 0;
        while let Some(Some(mutation)) = self.mutations.next().now_or_never() {
            self.apply_mutation(mutation);
            count += 1;
        }
        if count > 0 {
            debug!(count, "drained mutations");
        }
        count
    }

    fn apply_mutation(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Insert { buffer, text } => {
                self.edit_target(buffer.as_deref(), |store| store.insert(&text));
            },
            Mutation::Delete { buffer, count } => {
                self.edit_target(buffer.as_deref(), |store| {
                    store.delete(count);
                });
            },
            Mutation::SetSetting { name, value } => {
                if let Err(err) = self.settings.assign(&name, value) {
                    self.set_message(Message::error(err.to_string()));
                }
            },
            Mutation::Message(text) => self.set_message(Message::info(text)),
            Mutation::Apply(apply) => {
                let id = self.current_id();
                self.watching(id, apply);
            },
        }
    }

    /// Runs `edit` on the named buffer, or the current one.
    fn edit_target(&mut self, name: Option<&str>, edit: impl FnOnce(&mut TextStore)) {
        let id = match name {
            None => self.current_id(),
            Some(name) => match self.buffer_by_name(name) {
                Some(id) => id,
                None => {
                    warn!(buffer = name, "mutation for unknown buffer");
                    self.set_message(Message::error(format!("No buffer named '{name}'")));
                    return;
                },
            },
        };
        self.watching(id, |editor| {
            if let Some(buffer) = editor.buffer_mut(id) {
                edit(&mut buffer.store);
            }
        });
    }
}

fn parse_pattern(pattern: &str) -> Result<KeyChord, ModeError> {
    KeyChord::parse(pattern).map_err(|source| ModeError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn starts_with_scratch_in_normal_mode() {
        let editor = Editor::new();
        assert_eq!(editor.buffers().len(), 1);
        assert_eq!(editor.current().name(), Editor::SCRATCH);
        assert_eq!(editor.current().editing_mode(), Some("normal"));
    }

    #[test]
    fn buffer_names_are_unique() {
        let mut editor = Editor::new();
        let a = editor.new_buffer("notes", "");
        let b = editor.new_buffer("notes", "");
        let c = editor.new_buffer("notes", "");
        assert_eq!(editor.buffer(a).unwrap().name(), "notes");
        assert_eq!(editor.buffer(b).unwrap().name(), "notes 1");
        assert_eq!(editor.buffer(c).unwrap().name(), "notes 2");
        assert_eq!(editor.buffer_by_name("notes 1"), Some(b));
    }

    #[test]
    fn open_missing_file_gives_empty_buffer() {
        let mut editor =
            Editor::new().with_persistence(MemoryStorage::new().with_file("/tmp/a.txt", "alpha"));
        let a = editor.open_file("/tmp/a.txt");
        let b = editor.open_file("/tmp/b.txt");
        assert_eq!(editor.buffer(a).unwrap().store.contents(), "alpha");
        let missing = editor.buffer(b).unwrap();
        assert_eq!(missing.store.contents(), "");
        assert_eq!(missing.store.path(), Some(Path::new("/tmp/b.txt")));
        assert!(editor.message().is_none());
    }

    #[test]
    fn save_without_path_reports() {
        let mut editor = Editor::new();
        assert!(!editor.save_current());
        assert_eq!(
            editor.message(),
            Some(&Message::error("Can't save a buffer without a path."))
        );
    }

    #[test]
    fn close_modified_buffer_needs_force() {
        let mut editor = Editor::new();
        let other = editor.new_buffer("other", "");
        editor.show_buffer(other);
        editor.store_mut().insert("x");
        assert!(!editor.close_buffer(other, false));
        assert!(editor.close_buffer(other, true));
        assert_eq!(editor.current().name(), Editor::SCRATCH);
        assert!(!editor.quit_requested());
        let scratch = editor.current_id();
        assert!(editor.close_buffer(scratch, false));
        assert!(editor.quit_requested());
    }

    #[test]
    fn bind_checks_command_and_mode() {
        let mut editor = Editor::new();
        assert!(matches!(
            editor.bind("normal", "q", "no_such_command"),
            Err(BindError::Command(CommandError::Unknown(_)))
        ));
        assert!(matches!(
            editor.bind("no_such_mode", "q", "move_left"),
            Err(BindError::Mode(ModeError::Unknown(_)))
        ));
        editor.bind("normal", "q", "move_left").unwrap();
    }

    #[test]
    fn enter_mode_uses_registered_category() {
        let mut editor = Editor::new();
        editor.enter_mode("insert").unwrap();
        assert_eq!(editor.current().modes.names(), vec!["insert"]);
        assert_eq!(
            editor.enter_mode("nope"),
            Err(ModeError::Unknown("nope".into()))
        );
    }

    #[test]
    fn mutations_apply_in_order() {
        let mut editor = Editor::new();
        let sender = editor.mutation_sender();
        sender.insert(None, "hello").unwrap();
        sender.delete(None, 1).unwrap();
        sender.message("done").unwrap();
        sender
            .apply(|editor| editor.store_mut().set_cursor(0, 0))
            .unwrap();
        sender.insert(Some("missing"), "x").unwrap();
        assert_eq!(editor.drain_mutations(), 5);
        assert_eq!(editor.store().contents(), "hello");
        assert_eq!(editor.store().cursor(), ry_text::Location::new(0, 0));
        assert_eq!(
            editor.message(),
            Some(&Message::error("No buffer named 'missing'"))
        );
        assert_eq!(editor.drain_mutations(), 0);
    }
}
