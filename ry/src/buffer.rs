use crate::mode::{Mode, ModeCategory, ModeStack};
use ry_text::{TextStore, TypingRuns};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of every buffer's local binding layer, as it appears in dispatch logs.
pub const LOCAL_MODE: &str = "local";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferId(pub usize);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A text store plus the modes active on it.
///
/// `local` holds bindings that only apply to this buffer. They are searched
/// before any mode.
#[derive(Debug)]
pub struct Buffer {
    pub id: BufferId,
    pub store: TextStore,
    pub modes: ModeStack,
    pub local: Mode,
}

impl Buffer {
    /// A buffer in normal mode. Typing runs merge into one undo step.
    pub fn new(id: BufferId, mut store: TextStore) -> Self {
        store.history_mut().set_policy(TypingRuns);
        let mut modes = ModeStack::new();
        modes.add("normal", ModeCategory::Editing);
        let local = Mode::new(LOCAL_MODE, ModeCategory::Minor);
        Self {
            id,
            store,
            modes,
            local,
        }
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn editing_mode(&self) -> Option<&str> {
        self.modes.editing()
    }

    pub fn is_in_mode(&self, name: &str) -> bool {
        self.modes.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_layer_name_survives_rename() {
        let mut buffer = Buffer::new(BufferId(1), TextStore::new("notes"));
        assert_eq!(buffer.local.name(), LOCAL_MODE);
        buffer.store.set_name("renamed");
        assert_eq!(buffer.name(), "renamed");
        assert_eq!(buffer.local.name(), LOCAL_MODE);
        assert_eq!(buffer.editing_mode(), Some("normal"));
    }
}
