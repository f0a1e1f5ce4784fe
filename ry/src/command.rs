use crate::{chord::KeyChord, editor::Editor};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

/// What a binding runs. Receives the keys that matched it, so `m $alpha`
/// can read the letter.
pub type CommandFn = fn(&mut Editor, &KeyChord);

#[derive(Clone)]
pub struct Command {
    pub name: SmolStr,
    pub run: CommandFn,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(SmolStr),
    #[error("Command '{0}' is already registered")]
    Duplicate(SmolStr),
}

/// Commands by name, so bindings and rc files can refer to them.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: FxHashMap<SmolStr, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, run: CommandFn) -> Result<(), CommandError> {
        if self.commands.contains_key(name) {
            return Err(CommandError::Duplicate(name.into()));
        }
        self.commands.insert(
            name.into(),
            Command {
                name: name.into(),
                run,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(SmolStr::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
