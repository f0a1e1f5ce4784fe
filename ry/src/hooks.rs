//! Callbacks run when a buffer's text or cursor changes.
//!
//! Commands and queued mutations run under [`Editor::watching`], which
//! compares the buffer before and after and fires the matching
//! [`BufferEvent`]s. Window scrolling is itself a `moved` hook.

use crate::{buffer::BufferId, editor::Editor};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferEvent {
    /// The text changed.
    Modified,
    /// The cursor moved, or the buffer came into view.
    Moved,
}

impl fmt::Display for BufferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BufferEvent::Modified => "modified",
            BufferEvent::Moved => "moved",
        })
    }
}

/// Receives the buffer the event happened on.
pub type BufferHook = fn(&mut Editor, BufferId);

/// Hooks by event, in the order they were added.
#[derive(Clone, Default)]
pub struct BufferHooks {
    hooks: FxHashMap<BufferEvent, Vec<BufferHook>>,
}

impl fmt::Debug for BufferHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.hooks.iter().map(|(event, hooks)| (event, hooks.len())))
            .finish()
    }
}

impl BufferHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: BufferEvent, hook: BufferHook) {
        self.hooks.entry(event).or_default().push(hook);
    }

    pub fn get(&self, event: BufferEvent) -> &[BufferHook] {
        self.hooks.get(&event).map_or(&[], Vec::as_slice)
    }

    pub fn count(&self, event: BufferEvent) -> usize {
        self.get(event).len()
    }
}

/// What [`Editor::watching`] compares.
#[derive(Copy, Clone, PartialEq, Eq)]
struct BufferState {
    revision: u64,
    cursor: usize,
}

impl Editor {
    pub fn add_hook(&mut self, event: BufferEvent, hook: BufferHook) {
        self.hooks.add(event, hook);
    }

    pub fn hooks(&self) -> &BufferHooks {
        &self.hooks
    }

    /// Runs every hook added for `event` with `buffer`.
    pub fn trigger_hooks(&mut self, event: BufferEvent, buffer: BufferId) {
        let hooks = self.hooks.get(event).to_vec();
        trace!(%event, %buffer, count = hooks.len(), "buffer hooks");
        for hook in hooks {
            hook(self, buffer);
        }
    }

    fn buffer_state(&self, id: BufferId) -> Option<BufferState> {
        self.buffer(id).map(|buffer| BufferState {
            revision: buffer.store.revision(),
            cursor: buffer.store.cursor_offset(),
        })
    }

    /// Runs `change`, then fires `modified` if it edited buffer `id` and
    /// `moved` if it moved that buffer's cursor. A buffer that replaced the
    /// current one gets `moved` too.
    pub fn watching<R>(&mut self, id: BufferId, change: impl FnOnce(&mut Self) -> R) -> R {
        let shown = self.current_id();
        let before = self.buffer_state(id);
        let result = change(self);

        if let (Some(before), Some(after)) = (before, self.buffer_state(id)) {
            if after.revision != before.revision {
                self.trigger_hooks(BufferEvent::Modified, id);
            }
            if after.cursor != before.cursor {
                self.trigger_hooks(BufferEvent::Moved, id);
            }
        }
        let current = self.current_id();
        if current != shown && current != id {
            self.trigger_hooks(BufferEvent::Moved, current);
        }
        result
    }
}

/// Keeps the cursor of `buffer` in view in every window showing it.
pub(crate) fn scroll_to_cursor(editor: &mut Editor, buffer: BufferId) {
    let Some(line) = editor.buffer(buffer).map(|buffer| buffer.store.cursor().line) else {
        return;
    };
    editor.windows.scroll_to(buffer, line);
}
